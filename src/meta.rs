//! Partition size metadata supplied by the cluster.
//!
//! The planning core never fetches anything itself: surrounding tooling
//! pulls complete snapshots through [`MetadataSource`] and hands them to the
//! analysis and transformation functions as read-only input.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::info;

use crate::map::PartitionMap;

/// Metadata the cluster reports for a single partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionMeta {
    /// On-disk size of the partition in bytes.
    pub size: u64,
}

/// Size metadata keyed by topic and partition index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionMetaMap(BTreeMap<String, BTreeMap<i32, PartitionMeta>>);

impl PartitionMetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records metadata for a partition, replacing any previous entry.
    pub fn insert(&mut self, topic: impl Into<String>, partition: i32, meta: PartitionMeta) {
        self.0.entry(topic.into()).or_default().insert(partition, meta);
    }

    pub fn get(&self, topic: &str, partition: i32) -> Option<&PartitionMeta> {
        self.0.get(topic)?.get(&partition)
    }

    /// Size in bytes for a partition; `None` if the cluster did not report
    /// it.
    pub fn size(&self, topic: &str, partition: i32) -> Option<u64> {
        self.get(topic, partition).map(|m| m.size)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of partitions with metadata, across all topics.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

/// Source of cluster state snapshots.
///
/// Implementations read from the live cluster. Both methods must return
/// complete snapshots taken at a single point in time; the planning core is
/// never allowed to observe a partially populated map or metadata table.
#[async_trait]
pub trait MetadataSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The current assignment for the named topics.
    async fn partition_map(&self, topics: &[String]) -> Result<PartitionMap, Self::Error>;

    /// Size metadata for every known partition.
    async fn partition_meta(&self) -> Result<PartitionMetaMap, Self::Error>;
}

/// Most recently fetched size metadata.
///
/// Refreshed wholesale whenever the previous snapshot is believed stale;
/// consumers take their own copy via [`MetaCache::snapshot`] so a refresh
/// never races an in-progress analysis.
#[derive(Debug, Default)]
pub struct MetaCache {
    inner: RwLock<PartitionMetaMap>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// An independent copy of the current snapshot.
    pub fn snapshot(&self) -> PartitionMetaMap {
        self.inner.read().clone()
    }

    /// Replaces the snapshot with freshly fetched metadata.
    pub fn update(&self, fresh: PartitionMetaMap) {
        let mut inner = self.inner.write();
        info!(
            previous = inner.len(),
            current = fresh.len(),
            "Partition metadata refresh",
        );
        *inner = fresh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_lookup() {
        let mut meta = PartitionMetaMap::new();
        meta.insert("a", 0, PartitionMeta { size: 1000 });
        meta.insert("a", 1, PartitionMeta { size: 2000 });
        meta.insert("b", 0, PartitionMeta { size: 3000 });

        assert_eq!(meta.size("a", 1), Some(2000));
        assert_eq!(meta.size("b", 0), Some(3000));
        assert_eq!(meta.size("a", 2), None);
        assert_eq!(meta.size("c", 0), None);
        assert_eq!(meta.len(), 3);
    }

    #[test]
    fn insert_replaces() {
        let mut meta = PartitionMetaMap::new();
        meta.insert("a", 0, PartitionMeta { size: 1 });
        meta.insert("a", 0, PartitionMeta { size: 2 });

        assert_eq!(meta.size("a", 0), Some(2));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn cache_snapshot_is_independent() {
        let cache = MetaCache::new();
        assert!(cache.is_empty());

        let mut meta = PartitionMetaMap::new();
        meta.insert("a", 0, PartitionMeta { size: 42 });
        cache.update(meta);

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.size("a", 0), Some(42));

        // A later refresh must not affect the copy already taken.
        cache.update(PartitionMetaMap::new());
        assert!(cache.is_empty());
        assert_eq!(snapshot.size("a", 0), Some(42));
    }
}
