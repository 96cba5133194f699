//! Read/write access to dynamic per-resource configuration.
//!
//! Placement tooling consults dynamic topic and broker settings (retention,
//! replication throttles) around a rebalance. [`ConfigClient`] validates
//! requests locally and shapes results; the actual cluster round trip lives
//! behind [`AdminTransport`], implemented elsewhere over a live admin
//! connection and stubbed out in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

pub mod messages;

pub use messages::{
    AlterConfig, AlterConfigOp, ConfigEntry, ConfigResource, ConfigSource, DescribeConfigsResult,
    InvalidResourceKind, ResourceKind,
};

/// Error produced by the underlying cluster transport.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The resource kind string is not `topic` or `broker`. Raised locally;
    /// no request is attempted.
    #[error(transparent)]
    InvalidResourceKind(#[from] InvalidResourceKind),

    #[error("Empty configuration entry name for resource {0:?}")]
    EmptyEntryName(String),

    /// Failure in the underlying cluster transport, surfaced unmodified.
    #[error("Cluster transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Transport over which configuration requests reach the cluster.
#[async_trait]
pub trait AdminTransport: Send + Sync {
    /// Reads every configuration entry for the given resources.
    async fn describe_configs(
        &self,
        resources: Vec<ConfigResource>,
    ) -> Result<Vec<DescribeConfigsResult>, TransportError>;

    /// Applies incremental configuration changes to one resource.
    async fn alter_configs(
        &self,
        resource: ConfigResource,
        changes: Vec<AlterConfig>,
    ) -> Result<(), TransportError>;
}

/// Dynamic configuration entries grouped by resource name.
///
/// `configs.entry("my_topic", "retention.ms")` yields the dynamic
/// `retention.ms` entry for `my_topic`, if one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceConfigs(BTreeMap<String, BTreeMap<String, ConfigEntry>>);

impl ResourceConfigs {
    /// Files `entry` under the named resource, replacing any previous entry
    /// with the same configuration key.
    pub fn add(&mut self, resource: impl Into<String>, entry: ConfigEntry) -> Result<(), Error> {
        let resource = resource.into();

        if entry.name.is_empty() {
            return Err(Error::EmptyEntryName(resource));
        }

        self.0
            .entry(resource)
            .or_default()
            .insert(entry.name.clone(), entry);

        Ok(())
    }

    /// All entries for one resource, keyed by configuration name.
    pub fn get(&self, resource: &str) -> Option<&BTreeMap<String, ConfigEntry>> {
        self.0.get(resource)
    }

    /// One entry for one resource.
    pub fn entry(&self, resource: &str, name: &str) -> Option<&ConfigEntry> {
        self.0.get(resource)?.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resources with at least one dynamic entry, ascending by name.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Client for dynamic configuration reads and writes.
#[derive(Debug)]
pub struct ConfigClient<T> {
    transport: T,
}

impl<T> ConfigClient<T>
where
    T: AdminTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The dynamically-set configuration entries for the named resources of
    /// one kind (`"topic"` or `"broker"`).
    ///
    /// Entries from any other source (static broker files, defaults, logger
    /// overrides) are dropped from the result.
    pub async fn dynamic_configs(
        &self,
        kind: &str,
        names: &[String],
    ) -> Result<ResourceConfigs, Error> {
        // Validate the kind before anything goes over the wire.
        let kind: ResourceKind = kind.parse()?;

        let resources = names
            .iter()
            .map(|name| ConfigResource {
                kind,
                name: name.clone(),
            })
            .collect();

        let results = self.transport.describe_configs(resources).await?;

        let mut configs = ResourceConfigs::default();
        for result in results {
            for entry in result.entries {
                if entry.source.is_dynamic() {
                    configs.add(result.resource.name.as_str(), entry)?;
                }
            }
        }

        debug!(
            %kind,
            requested = names.len(),
            populated = configs.resources().count(),
            "Collected dynamic configuration",
        );

        Ok(configs)
    }

    /// Applies incremental configuration changes to one resource of the
    /// given kind.
    pub async fn set_configs(
        &self,
        kind: &str,
        name: &str,
        changes: Vec<AlterConfig>,
    ) -> Result<(), Error> {
        let kind: ResourceKind = kind.parse()?;

        let resource = ConfigResource {
            kind,
            name: name.to_string(),
        };

        debug!(%kind, name, changes = changes.len(), "Applying configuration changes");

        self.transport.alter_configs(resource, changes).await?;

        Ok(())
    }
}
