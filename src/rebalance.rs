//! Assignment transformations for staged reassignments and leadership
//! moves.
//!
//! Every function here is a pure computation: inputs are never mutated and
//! the returned map shares no storage with its sources.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::map::{BrokerId, PartitionMap};

#[derive(Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvacuationError {
    /// Every replica of the partition belongs to the evacuated set, so no
    /// replacement leader exists.
    #[error("No replica of {topic}[{partition}] is outside the evacuated brokers")]
    NoEligibleLeader { topic: String, partition: i32 },
}

/// True iff `id` holds no replica in `replicas`, leader or follower.
///
/// Exact membership over the whole slice; the evacuation logic depends on
/// this not being a leader-only check.
pub fn not_in_replica_set(id: BrokerId, replicas: &[BrokerId]) -> bool {
    !replicas.contains(&id)
}

/// Stages a reassignment from `original` to `target` without moving
/// leadership.
///
/// The returned map has `target`'s replica-set membership for every
/// partition, but each partition's leader is forced back to its `original`
/// leader as long as that broker still appears in the target replica set
/// (the broker is moved to the front; follower relative order is
/// preserved). Once replica movement completes, a separate
/// leadership-transition step promotes the eventual target leader.
///
/// Partitions whose target leader already matches, partitions present only
/// in `target`, and partitions whose original leader is absent from the
/// target replica set (a full decommission) are emitted exactly as `target`
/// has them.
pub fn phased_reassignment(original: &PartitionMap, target: &PartitionMap) -> PartitionMap {
    let leaders: BTreeMap<(&str, i32), BrokerId> = original
        .partitions
        .iter()
        .filter_map(|p| p.leader().map(|id| ((p.topic.as_str(), p.partition), id)))
        .collect();

    let mut staged = target.clone();

    for p in &mut staged.partitions {
        let Some(&leader) = leaders.get(&(p.topic.as_str(), p.partition)) else {
            continue;
        };

        if p.leader() == Some(leader) {
            continue;
        }

        if let Some(at) = p.replicas.iter().position(|&id| id == leader) {
            p.replicas.remove(at);
            p.replicas.insert(0, leader);
            debug!(
                topic = %p.topic,
                partition = p.partition,
                leader,
                "Holding original leader through replica move",
            );
        }
    }

    staged
}

/// Moves leadership away from `problem_brokers` for partitions of the named
/// `topics`, without changing replica-set membership.
///
/// The first follower outside the problem set is swapped into the leader
/// position; the displaced leader takes that follower's slot. Partitions of
/// other topics, and partitions whose leader is not a problem broker, pass
/// through untouched.
///
/// Fails with [`EvacuationError::NoEligibleLeader`] if some affected
/// partition has every replica inside the problem set. The whole operation
/// aborts in that case and no partial map is returned; to skip such
/// partitions instead, evacuate topic subsets per call.
pub fn evacuate_leadership(
    pm: &PartitionMap,
    problem_brokers: &[BrokerId],
    topics: &[String],
) -> Result<PartitionMap, EvacuationError> {
    let mut out = pm.clone();

    for p in &mut out.partitions {
        if !topics.iter().any(|t| *t == p.topic) {
            continue;
        }

        let Some(leader) = p.leader() else {
            continue;
        };

        if not_in_replica_set(leader, problem_brokers) {
            continue;
        }

        let replacement = p.replicas[1..]
            .iter()
            .position(|&id| not_in_replica_set(id, problem_brokers));

        match replacement {
            Some(follower) => {
                let at = follower + 1;
                debug!(
                    topic = %p.topic,
                    partition = p.partition,
                    from = leader,
                    to = p.replicas[at],
                    "Moving leadership off evacuated broker",
                );
                p.replicas.swap(0, at);
            }
            None => {
                return Err(EvacuationError::NoEligibleLeader {
                    topic: p.topic.clone(),
                    partition: p.partition,
                });
            }
        }
    }

    Ok(out)
}
