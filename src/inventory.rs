//! The instance inventory the cleaner reads from and acts on.
//!
//! [`Inventory`] is the only seam between the decision logic and the cloud
//! provider. The EC2 implementation lives in [`crate::ec2`]; tests use an
//! in-memory one.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub const DEFAULT_TAG_KEY: &str = "Workload";
pub const DEFAULT_TAG_VALUE: &str = "CI Runner";

/// Provider lifecycle state of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleState {
    Pending,
    Running,
    ShuttingDown,
    Stopping,
    Stopped,
    Terminated,
    /// A state name this crate does not know about.
    Other(String),
}

impl LifecycleState {
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::Pending => "pending",
            LifecycleState::Running => "running",
            LifecycleState::ShuttingDown => "shutting-down",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Terminated => "terminated",
            LifecycleState::Other(name) => name,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, LifecycleState::Terminated)
    }
}

impl From<&str> for LifecycleState {
    fn from(name: &str) -> Self {
        match name {
            "pending" => LifecycleState::Pending,
            "running" => LifecycleState::Running,
            "shutting-down" => LifecycleState::ShuttingDown,
            "stopping" => LifecycleState::Stopping,
            "stopped" => LifecycleState::Stopped,
            "terminated" => LifecycleState::Terminated,
            other => LifecycleState::Other(other.to_string()),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of one instance as returned by the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub id: String,
    pub launch_time: DateTime<Utc>,
    pub lifecycle_state: LifecycleState,
    pub tags: HashMap<String, String>,
}

/// Exact-match tag predicate applied by the inventory query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub key: String,
    pub value: String,
}

impl TagFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Default for TagFilter {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_KEY, DEFAULT_TAG_VALUE)
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Instance listing and termination.
#[allow(async_fn_in_trait)]
pub trait Inventory {
    /// All instances carrying `filter.key` with exactly `filter.value`.
    /// No match is an empty list, not an error.
    async fn list_instances_by_tag(&self, filter: &TagFilter) -> Result<Vec<InstanceRecord>>;

    /// Request termination and return the state the provider acknowledged.
    /// Terminating an instance that is already going away is not an error.
    async fn terminate_instance(&self, id: &str) -> Result<LifecycleState>;
}
