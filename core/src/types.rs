//! Wire types shared by several endpoints.
//!
//! # Design
//! These mirror the service's common schema objects. Optional fields,
//! collections included, are `Option`s skipped when absent, so an explicit
//! empty list stays distinct from a missing one and a value deserialized from
//! the wire serializes back to the same JSON.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A duration in the service's string form, e.g. `30s`, `1m`, `-1` or `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(String);

impl Time {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Time {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Time {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Which kinds of indices a wildcard pattern may expand to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandWildcard {
    All,
    Open,
    Closed,
    Hidden,
    None,
}

impl ExpandWildcard {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpandWildcard::All => "all",
            ExpandWildcard::Open => "open",
            ExpandWildcard::Closed => "closed",
            ExpandWildcard::Hidden => "hidden",
            ExpandWildcard::None => "none",
        }
    }
}

impl fmt::Display for ExpandWildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many shard copies must be active before an operation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaitForActiveShards {
    All,
    Count(u32),
}

impl fmt::Display for WaitForActiveShards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitForActiveShards::All => f.write_str("all"),
            WaitForActiveShards::Count(count) => write!(f, "{count}"),
        }
    }
}

impl From<u32> for WaitForActiveShards {
    fn from(count: u32) -> Self {
        WaitForActiveShards::Count(count)
    }
}

/// Per-shard outcome summary attached to broadcast operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShardStatistics {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failures: Option<Vec<ShardFailure>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardFailure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    pub reason: ErrorCause,
    pub shard: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCause,
    pub status: u16,
}

/// A (possibly nested) cause reported by the service.
///
/// Fields outside the common set (`index`, `resource.id`, ...) are kept in
/// `metadata`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorCause {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_cause: Option<Vec<ErrorCause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<Box<ErrorCause>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Render a list query parameter the way the service expects it.
pub(crate) fn join_list<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
