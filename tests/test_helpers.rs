use std::convert::Infallible;
use std::sync::Once;

use async_trait::async_trait;
use partmap::map::{Partition, PartitionMap};
use partmap::meta::{MetadataSource, PartitionMeta, PartitionMetaMap};

pub fn maybe_start_logging() {
    if std::env::var("TEST_LOG").is_ok() {
        start_logging()
    }
}

pub fn start_logging() {
    static START: Once = Once::new();

    START.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

/// In-memory stand-in for the cluster metadata service.
pub struct StubMetadata {
    map: PartitionMap,
    meta: PartitionMetaMap,
}

#[async_trait]
impl MetadataSource for StubMetadata {
    type Error = Infallible;

    async fn partition_map(&self, topics: &[String]) -> Result<PartitionMap, Self::Error> {
        let mut pm = PartitionMap::new();
        pm.version = self.map.version;
        pm.partitions = self
            .map
            .partitions
            .iter()
            .filter(|p| topics.contains(&p.topic))
            .cloned()
            .collect();
        Ok(pm)
    }

    async fn partition_meta(&self) -> Result<PartitionMetaMap, Self::Error> {
        Ok(self.meta.clone())
    }
}

/// A small two-topic cluster on brokers 1001-1004, with broker 1001
/// leading most of the load.
pub fn stub_cluster() -> StubMetadata {
    let assignments = [
        ("events", 0, vec![1001, 1002], 900),
        ("events", 1, vec![1001, 1003], 3000),
        ("events", 2, vec![1002, 1003], 1200),
        ("checkouts", 0, vec![1001, 1004], 2000),
        ("checkouts", 1, vec![1004, 1002], 600),
    ];

    let mut map = PartitionMap::new();
    let mut meta = PartitionMetaMap::new();

    for (topic, partition, replicas, size) in assignments {
        map.partitions.push(Partition {
            topic: topic.to_string(),
            partition,
            replicas,
        });
        meta.insert(topic, partition, PartitionMeta { size });
    }

    StubMetadata { map, meta }
}
