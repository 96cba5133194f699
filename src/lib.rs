//! Partition placement and rebalance planning for Apache Kafka clusters.
//!
//! The crate models a cluster's partition→broker assignment
//! ([`map::PartitionMap`]), derives broker-centric views of it
//! ([`mappings::Mappings`]), ranks rebalance candidates by size, and
//! produces new assignment plans: phased reassignments that hold leadership
//! stable while replicas move, and leadership evacuations that drain
//! unhealthy brokers ([`rebalance`]). All planning is pure computation over
//! in-memory snapshots; fetching cluster state and applying plans belong to
//! the collaborators behind [`meta::MetadataSource`] and
//! [`admin::AdminTransport`].
//!
//! # Example
//!
//! ```
//! use partmap::map::PartitionMap;
//! use partmap::rebalance::evacuate_leadership;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let current: PartitionMap = r#"{"version":1,"partitions":[
//!     {"topic":"events","partition":0,"replicas":[1001,1002,1003]}
//! ]}"#
//! .parse()?;
//!
//! // Broker 1001 is being drained: move leadership off it while keeping
//! // the replica set intact.
//! let plan = evacuate_leadership(&current, &[1001], &["events".to_string()])?;
//!
//! assert_eq!(plan.partitions[0].replicas, vec![1002, 1001, 1003]);
//! println!("{plan}");
//! # Ok(())
//! # }
//! ```
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod admin;
pub mod map;
pub mod mappings;
pub mod meta;
pub mod rebalance;
