//! Broker-centric views of a [`PartitionMap`].

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::map::{BrokerId, Partition, PartitionMap};
use crate::meta::PartitionMetaMap;

#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingsError {
    #[error("No mappings for broker {0}")]
    NoMappings(BrokerId),
}

/// For each broker, the partitions it participates in, grouped by topic.
///
/// A partition is listed for a broker if the broker appears anywhere in its
/// replica list, leader or follower. The index is a point-in-time view:
/// rebuild it with [`Mappings::from_map`] whenever the source map changes,
/// it is not maintained incrementally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    by_broker: BTreeMap<BrokerId, BTreeMap<String, Vec<Partition>>>,
}

impl Mappings {
    /// Builds the index from every partition in `pm`.
    ///
    /// Per-broker/topic partition lists preserve the source map's order; a
    /// broker appears at most once per partition, so no deduplication is
    /// needed.
    pub fn from_map(pm: &PartitionMap) -> Self {
        let mut by_broker: BTreeMap<BrokerId, BTreeMap<String, Vec<Partition>>> = BTreeMap::new();

        for p in &pm.partitions {
            for &id in &p.replicas {
                by_broker
                    .entry(id)
                    .or_default()
                    .entry(p.topic.clone())
                    .or_default()
                    .push(p.clone());
            }
        }

        Self { by_broker }
    }

    /// All brokers present in the index, ascending.
    pub fn brokers(&self) -> impl Iterator<Item = BrokerId> + '_ {
        self.by_broker.keys().copied()
    }

    /// The per-topic partition lists for one broker.
    pub fn get(&self, id: BrokerId) -> Option<&BTreeMap<String, Vec<Partition>>> {
        self.by_broker.get(&id)
    }

    /// The `k` largest partitions hosted by broker `id`, size descending.
    ///
    /// Ties are broken by `(topic, partition)` ascending so results are
    /// deterministic. Partitions missing from `meta` rank as zero bytes.
    /// Fewer than `k` results are returned when the broker holds fewer
    /// partitions; a broker absent from the index is an error.
    pub fn largest_partitions(
        &self,
        id: BrokerId,
        k: usize,
        meta: &PartitionMetaMap,
    ) -> Result<Vec<Partition>, MappingsError> {
        let topics = self.by_broker.get(&id).ok_or(MappingsError::NoMappings(id))?;

        let mut sized: Vec<(u64, &Partition)> = Vec::new();
        for partitions in topics.values() {
            for p in partitions {
                let size = match meta.size(&p.topic, p.partition) {
                    Some(size) => size,
                    None => {
                        debug!(
                            topic = %p.topic,
                            partition = p.partition,
                            "No size metadata for partition, ranking as zero",
                        );
                        0
                    }
                };
                sized.push((size, p));
            }
        }

        sized.sort_by(|(size_a, a), (size_b, b)| {
            size_b
                .cmp(size_a)
                .then_with(|| a.topic.cmp(&b.topic))
                .then_with(|| a.partition.cmp(&b.partition))
        });

        Ok(sized.into_iter().take(k).map(|(_, p)| p.clone()).collect())
    }
}

impl PartitionMap {
    /// The broker-centric index over this map.
    pub fn mappings(&self) -> Mappings {
        Mappings::from_map(self)
    }
}
