//! Request and response shapes crossing the admin boundary.
//!
//! # References
//! - <https://kafka.apache.org/protocol#The_Messages_DescribeConfigs>
//! - <https://kafka.apache.org/protocol#The_Messages_IncrementalAlterConfigs>

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid resource kind: {0:?}")]
pub struct InvalidResourceKind(pub String);

/// The kind of cluster resource a configuration is attached to.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ResourceKind {
    Topic,
    Broker,
}

impl FromStr for ResourceKind {
    type Err = InvalidResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "topic" => Ok(Self::Topic),
            "broker" => Ok(Self::Broker),
            other => Err(InvalidResourceKind(other.to_string())),
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topic => f.write_str("topic"),
            Self::Broker => f.write_str("broker"),
        }
    }
}

impl From<ResourceKind> for i8 {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Topic => 2,
            ResourceKind::Broker => 4,
        }
    }
}

/// A resource whose configuration is being read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigResource {
    /// The resource kind.
    pub kind: ResourceKind,

    /// The resource name: a topic name, or a broker ID rendered in decimal.
    pub name: String,
}

/// Where a configuration entry's effective value came from.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub enum ConfigSource {
    /// Set dynamically for a specific topic.
    DynamicTopic,
    /// Set dynamically for a specific broker.
    DynamicBroker,
    /// Set dynamically as the default for all brokers.
    DynamicDefaultBroker,
    /// From the broker's server.properties.
    StaticBroker,
    /// The hardcoded broker default.
    Default,
    /// Dynamic log4j logger configuration.
    DynamicBrokerLogger,
    Unknown(i8),
}

impl ConfigSource {
    /// True for entries set dynamically on a specific topic or broker, the
    /// only entries the dynamic-config read path reports.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::DynamicTopic | Self::DynamicBroker)
    }
}

impl From<i8> for ConfigSource {
    fn from(code: i8) -> Self {
        match code {
            1 => Self::DynamicTopic,
            2 => Self::DynamicBroker,
            3 => Self::DynamicDefaultBroker,
            4 => Self::StaticBroker,
            5 => Self::Default,
            6 => Self::DynamicBrokerLogger,
            _ => Self::Unknown(code),
        }
    }
}

impl From<ConfigSource> for i8 {
    fn from(source: ConfigSource) -> Self {
        match source {
            ConfigSource::DynamicTopic => 1,
            ConfigSource::DynamicBroker => 2,
            ConfigSource::DynamicDefaultBroker => 3,
            ConfigSource::StaticBroker => 4,
            ConfigSource::Default => 5,
            ConfigSource::DynamicBrokerLogger => 6,
            ConfigSource::Unknown(code) => code,
        }
    }
}

/// A single configuration entry reported for a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The configuration key, e.g. `retention.ms`.
    pub name: String,

    /// The configuration value; `None` when null or redacted.
    pub value: Option<String>,

    /// Where the effective value came from.
    pub source: ConfigSource,

    /// True if the value is sensitive and has been omitted.
    pub is_sensitive: bool,

    /// True if the entry cannot be updated.
    pub read_only: bool,
}

/// Per-resource result of a describe-configs round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigsResult {
    /// The resource the entries belong to.
    pub resource: ConfigResource,

    /// Every configuration entry the cluster reported, dynamic or not.
    pub entries: Vec<ConfigEntry>,
}

/// The operation applied by an incremental configuration update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterConfigOp {
    /// Set the value.
    Set,
    /// Revert to the default.
    Delete,
    /// Append to a list-valued entry.
    Append,
    /// Remove from a list-valued entry.
    Subtract,
}

impl From<AlterConfigOp> for i8 {
    fn from(op: AlterConfigOp) -> Self {
        match op {
            AlterConfigOp::Set => 0,
            AlterConfigOp::Delete => 1,
            AlterConfigOp::Append => 2,
            AlterConfigOp::Subtract => 3,
        }
    }
}

/// One configuration change within an alter request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterConfig {
    /// The configuration key.
    pub name: String,

    /// The value; ignored for [`AlterConfigOp::Delete`].
    pub value: Option<String>,

    /// How the value is applied.
    pub op: AlterConfigOp,
}
