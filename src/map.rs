//! Partition assignment model for a Kafka cluster.
//!
//! The serialized form is the partition reassignment JSON understood by the
//! Kafka tooling.
//!
//! # References
//! - <https://kafka.apache.org/documentation/#basic_ops_cluster_expansion>

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric ID of a broker, a cluster node hosting partition replicas.
pub type BrokerId = i32;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseError {
    #[error("Malformed assignment JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Duplicate entry for {topic}[{partition}]")]
    DuplicatePartition { topic: String, partition: i32 },

    #[error("Empty replica list for {topic}[{partition}]")]
    EmptyReplicas { topic: String, partition: i32 },

    #[error("Invalid broker ID {broker} in {topic}[{partition}]")]
    InvalidBrokerId {
        topic: String,
        partition: i32,
        broker: BrokerId,
    },

    #[error("Broker {broker} listed twice in {topic}[{partition}]")]
    DuplicateReplica {
        topic: String,
        partition: i32,
        broker: BrokerId,
    },
}

/// A single partition and the brokers assigned to it.
///
/// `replicas` is ordered: the first entry is the leader, every other entry a
/// follower. A broker appears at most once per partition.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Partition {
    /// The topic name.
    pub topic: String,

    /// The partition index within the topic.
    pub partition: i32,

    /// Brokers hosting a replica, leader first.
    pub replicas: Vec<BrokerId>,
}

impl Partition {
    /// The broker currently designated leader, if the replica list is
    /// populated.
    pub fn leader(&self) -> Option<BrokerId> {
        self.replicas.first().copied()
    }
}

/// A full cluster assignment snapshot.
///
/// Cloning a map yields a fully independent copy: the partition list and
/// every replica list get fresh backing storage, so a derived map can be
/// mutated freely without affecting its source.
///
/// Storage order of `partitions` carries no meaning; equality matches
/// entries by `(topic, partition)` identity. Use [`PartitionMap::sort`]
/// before serializing when deterministic output matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionMap {
    /// Assignment format version; `1` for every format Kafka currently
    /// accepts.
    pub version: i32,

    /// All partition assignments in the snapshot.
    pub partitions: Vec<Partition>,
}

/// The first difference found between two partition maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapDiff {
    /// The version fields differ.
    Version { left: i32, right: i32 },

    /// A partition identity exists in only one of the maps.
    Missing { topic: String, partition: i32 },

    /// Replica lists differ for the same partition identity.
    Replicas { topic: String, partition: i32 },
}

impl Display for MapDiff {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Version { left, right } => {
                write!(f, "version mismatch: {left} vs {right}")
            }
            Self::Missing { topic, partition } => {
                write!(f, "{topic}[{partition}] present in only one map")
            }
            Self::Replicas { topic, partition } => {
                write!(f, "replica lists differ for {topic}[{partition}]")
            }
        }
    }
}

impl PartitionMap {
    /// An empty map at the current assignment format version.
    pub fn new() -> Self {
        Self {
            version: 1,
            partitions: Vec::new(),
        }
    }

    /// Reports where this map first differs from `other`, or `None` if the
    /// maps are structurally equal.
    ///
    /// Comparison is keyed by `(topic, partition)` and ignores storage
    /// order; replica order within a partition is significant.
    pub fn diff(&self, other: &Self) -> Option<MapDiff> {
        if self.version != other.version {
            return Some(MapDiff::Version {
                left: self.version,
                right: other.version,
            });
        }

        let left = index(&self.partitions);
        let right = index(&other.partitions);

        for (&(topic, partition), p) in &left {
            match right.get(&(topic, partition)) {
                None => {
                    return Some(MapDiff::Missing {
                        topic: topic.to_string(),
                        partition,
                    })
                }
                Some(q) if p.replicas != q.replicas => {
                    return Some(MapDiff::Replicas {
                        topic: topic.to_string(),
                        partition,
                    })
                }
                Some(_) => {}
            }
        }

        for &(topic, partition) in right.keys() {
            if !left.contains_key(&(topic, partition)) {
                return Some(MapDiff::Missing {
                    topic: topic.to_string(),
                    partition,
                });
            }
        }

        None
    }

    /// The distinct topic names in this map, sorted.
    pub fn topics(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self.partitions.iter().map(|p| p.topic.as_str()).collect();
        names.into_iter().map(String::from).collect()
    }

    /// Orders partitions by topic and partition index for deterministic
    /// output.
    pub fn sort(&mut self) {
        self.partitions.sort();
    }

    /// Checks the structural invariants: unique `(topic, partition)`
    /// identities, non-empty replica lists, positive broker IDs, no broker
    /// repeated within a partition.
    pub fn validate(&self) -> Result<(), ParseError> {
        let mut seen = BTreeSet::new();

        for p in &self.partitions {
            if !seen.insert((p.topic.as_str(), p.partition)) {
                return Err(ParseError::DuplicatePartition {
                    topic: p.topic.clone(),
                    partition: p.partition,
                });
            }

            if p.replicas.is_empty() {
                return Err(ParseError::EmptyReplicas {
                    topic: p.topic.clone(),
                    partition: p.partition,
                });
            }

            let mut brokers = BTreeSet::new();
            for &id in &p.replicas {
                if id <= 0 {
                    return Err(ParseError::InvalidBrokerId {
                        topic: p.topic.clone(),
                        partition: p.partition,
                        broker: id,
                    });
                }
                if !brokers.insert(id) {
                    return Err(ParseError::DuplicateReplica {
                        topic: p.topic.clone(),
                        partition: p.partition,
                        broker: id,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for PartitionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PartitionMap {
    fn eq(&self, other: &Self) -> bool {
        self.diff(other).is_none()
    }
}

impl Eq for PartitionMap {}

impl FromStr for PartitionMap {
    type Err = ParseError;

    /// Parses the reassignment JSON and checks the structural invariants.
    /// No partial map is returned on failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pm: Self = serde_json::from_str(s)?;
        pm.validate()?;
        Ok(pm)
    }
}

impl Display for PartitionMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
        f.write_str(&json)
    }
}

fn index(partitions: &[Partition]) -> BTreeMap<(&str, i32), &Partition> {
    partitions
        .iter()
        .map(|p| ((p.topic.as_str(), p.partition), p))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn partition(topic: &str, partition: i32, replicas: &[BrokerId]) -> Partition {
        Partition {
            topic: topic.to_string(),
            partition,
            replicas: replicas.to_vec(),
        }
    }

    fn two_partition_map() -> PartitionMap {
        PartitionMap {
            version: 1,
            partitions: vec![
                partition("a", 0, &[1001, 1002]),
                partition("a", 1, &[1002, 1001]),
            ],
        }
    }

    #[test]
    fn parse_valid_map() {
        let s = r#"{"version":1,"partitions":[
            {"topic":"a","partition":0,"replicas":[1001,1002]},
            {"topic":"a","partition":1,"replicas":[1002,1001]}
        ]}"#;

        let pm: PartitionMap = s.parse().unwrap();
        assert_eq!(pm.version, 1);
        assert_eq!(pm.partitions.len(), 2);
        assert_eq!(pm.partitions[0].leader(), Some(1001));
        assert_eq!(pm.partitions[1].replicas, vec![1002, 1001]);
    }

    #[test]
    fn parse_malformed_json() {
        let err = "{\"version\":1".parse::<PartitionMap>().unwrap_err();
        assert_matches!(err, ParseError::Malformed(_));

        // Missing `replicas` field.
        let err = r#"{"version":1,"partitions":[{"topic":"a","partition":0}]}"#
            .parse::<PartitionMap>()
            .unwrap_err();
        assert_matches!(err, ParseError::Malformed(_));

        // Non-integer broker ID.
        let err = r#"{"version":1,"partitions":[{"topic":"a","partition":0,"replicas":["x"]}]}"#
            .parse::<PartitionMap>()
            .unwrap_err();
        assert_matches!(err, ParseError::Malformed(_));
    }

    #[test]
    fn parse_duplicate_partition() {
        let s = r#"{"version":1,"partitions":[
            {"topic":"a","partition":0,"replicas":[1001]},
            {"topic":"a","partition":0,"replicas":[1002]}
        ]}"#;

        let err = s.parse::<PartitionMap>().unwrap_err();
        assert_matches!(
            err,
            ParseError::DuplicatePartition { topic, partition: 0 } if topic == "a"
        );
    }

    #[test]
    fn parse_empty_replicas() {
        let s = r#"{"version":1,"partitions":[{"topic":"a","partition":3,"replicas":[]}]}"#;

        let err = s.parse::<PartitionMap>().unwrap_err();
        assert_matches!(
            err,
            ParseError::EmptyReplicas { topic, partition: 3 } if topic == "a"
        );
    }

    #[test]
    fn parse_invalid_broker_id() {
        for bad in ["0", "-1001"] {
            let s = format!(
                r#"{{"version":1,"partitions":[{{"topic":"a","partition":0,"replicas":[{bad}]}}]}}"#
            );

            let err = s.parse::<PartitionMap>().unwrap_err();
            assert_matches!(err, ParseError::InvalidBrokerId { .. });
        }
    }

    #[test]
    fn parse_duplicate_replica() {
        let s =
            r#"{"version":1,"partitions":[{"topic":"a","partition":0,"replicas":[1001,1001]}]}"#;

        let err = s.parse::<PartitionMap>().unwrap_err();
        assert_matches!(
            err,
            ParseError::DuplicateReplica { broker: 1001, .. }
        );
    }

    #[test]
    fn serialize_round_trip() {
        let pm = two_partition_map();

        let restored: PartitionMap = pm.to_string().parse().unwrap();
        assert_eq!(pm, restored);
    }

    #[test]
    fn clone_is_independent() {
        let pm = two_partition_map();

        let mut copy = pm.clone();
        copy.partitions[0].replicas[0] = 9999;
        copy.partitions.push(partition("b", 0, &[1003]));

        assert_eq!(pm.partitions.len(), 2);
        assert_eq!(pm.partitions[0].replicas[0], 1001);
    }

    #[test]
    fn equal_ignores_partition_order() {
        let pm = two_partition_map();

        let mut shuffled = pm.clone();
        shuffled.partitions.reverse();

        assert_eq!(pm, shuffled);
        assert_eq!(shuffled, pm);
        assert_eq!(pm.diff(&shuffled), None);
    }

    #[test]
    fn equal_is_sensitive_to_replica_order() {
        let pm = two_partition_map();

        let mut reordered = pm.clone();
        reordered.partitions[1].replicas.swap(0, 1);

        assert_ne!(pm, reordered);
        assert_eq!(
            pm.diff(&reordered),
            Some(MapDiff::Replicas {
                topic: "a".to_string(),
                partition: 1,
            })
        );
    }

    #[test]
    fn diff_reports_version_and_missing() {
        let pm = two_partition_map();

        let mut versioned = pm.clone();
        versioned.version = 2;
        assert_eq!(
            pm.diff(&versioned),
            Some(MapDiff::Version { left: 1, right: 2 })
        );

        let mut truncated = pm.clone();
        truncated.partitions.pop();
        assert_eq!(
            pm.diff(&truncated),
            Some(MapDiff::Missing {
                topic: "a".to_string(),
                partition: 1,
            })
        );
        // Symmetric: the extra entry is found from the other side too.
        assert_eq!(
            truncated.diff(&pm),
            Some(MapDiff::Missing {
                topic: "a".to_string(),
                partition: 1,
            })
        );
    }

    #[test]
    fn topics_are_unique_and_sorted() {
        let pm = PartitionMap {
            version: 1,
            partitions: vec![
                partition("b", 0, &[1001]),
                partition("a", 0, &[1001]),
                partition("a", 1, &[1002]),
            ],
        };

        assert_eq!(pm.topics(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn sort_orders_by_topic_then_partition() {
        let mut pm = PartitionMap {
            version: 1,
            partitions: vec![
                partition("b", 1, &[1001]),
                partition("a", 2, &[1001]),
                partition("a", 0, &[1002]),
            ],
        };

        pm.sort();

        let order: Vec<(&str, i32)> = pm
            .partitions
            .iter()
            .map(|p| (p.topic.as_str(), p.partition))
            .collect();
        assert_eq!(order, vec![("a", 0), ("a", 2), ("b", 1)]);
    }
}
