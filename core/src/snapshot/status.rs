//! `snapshot.status`: per-shard progress and size of running or finished
//! snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_body, path_encode, path_encode_list, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::snapshot::SnapshotShardsStatsSummaryItem;
use crate::types::Time;

const TYPE_NAME: &str = "SnapshotStatusRequest";

/// Without a repository the service reports every running snapshot; naming
/// snapshots requires naming their repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotStatusRequest {
    cluster_manager_timeout: Option<Time>,
    ignore_unavailable: Option<bool>,
    repository: Option<String>,
    snapshot: Vec<String>,
}

impl SnapshotStatusRequest {
    pub fn builder() -> SnapshotStatusRequestBuilder {
        SnapshotStatusRequestBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut SnapshotStatusRequestBuilder) -> &mut SnapshotStatusRequestBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn cluster_manager_timeout(&self) -> Option<&Time> {
        self.cluster_manager_timeout.as_ref()
    }

    pub fn ignore_unavailable(&self) -> Option<bool> {
        self.ignore_unavailable
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn snapshot(&self) -> &[String] {
        &self.snapshot
    }
}

#[derive(Debug, Default)]
pub struct SnapshotStatusRequestBuilder {
    cluster_manager_timeout: Option<Time>,
    ignore_unavailable: Option<bool>,
    repository: Option<String>,
    snapshot: Option<Vec<String>>,
    guard: SingleUse,
}

impl SnapshotStatusRequestBuilder {
    pub fn cluster_manager_timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.cluster_manager_timeout = Some(value.into());
        self
    }

    /// Skip snapshots that are missing instead of failing.
    pub fn ignore_unavailable(&mut self, value: bool) -> &mut Self {
        self.ignore_unavailable = Some(value);
        self
    }

    pub fn repository(&mut self, value: impl Into<String>) -> &mut Self {
        self.repository = Some(value.into());
        self
    }

    /// Adds one snapshot name.
    pub fn snapshot(&mut self, value: impl Into<String>) -> &mut Self {
        vec_add(&mut self.snapshot, value.into());
        self
    }

    /// Adds all snapshot names.
    pub fn snapshots<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        vec_add_all(&mut self.snapshot, values.into_iter().map(Into::into));
        self
    }

    pub fn build(&mut self) -> Result<SnapshotStatusRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let snapshot = self.snapshot.take().unwrap_or_default();
        if !snapshot.is_empty() && self.repository.is_none() {
            return Err(BuildError::MissingRequiredField {
                type_name: TYPE_NAME,
                field: "repository",
            });
        }
        Ok(SnapshotStatusRequest {
            cluster_manager_timeout: self.cluster_manager_timeout.take(),
            ignore_unavailable: self.ignore_unavailable.take(),
            repository: self.repository.take(),
            snapshot,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatusResponse {
    pub snapshots: Vec<SnapshotStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotStatus {
    pub snapshot: String,
    pub repository: String,
    pub uuid: String,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_global_state: Option<bool>,
    pub shards_stats: ShardsStats,
    pub stats: SnapshotStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<BTreeMap<String, SnapshotIndexStats>>,
}

/// Shard counts per snapshot stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardsStats {
    pub initializing: u32,
    pub started: u32,
    pub finalizing: u32,
    pub done: u32,
    pub failed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    /// Files copied by this snapshot.
    pub incremental: SnapshotShardsStatsSummaryItem,
    /// Files referenced by this snapshot, including reused ones.
    pub total: SnapshotShardsStatsSummaryItem,
    pub start_time_in_millis: u64,
    pub time_in_millis: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotIndexStats {
    pub shards_stats: ShardsStats,
    pub stats: SnapshotStats,
}

fn method(_request: &SnapshotStatusRequest) -> HttpMethod {
    HttpMethod::Get
}

fn path(request: &SnapshotStatusRequest) -> String {
    let mut buf = String::from("/_snapshot/");
    if let Some(repository) = &request.repository {
        path_encode(repository, &mut buf);
        buf.push('/');
        if !request.snapshot.is_empty() {
            path_encode_list(&request.snapshot, &mut buf);
            buf.push('/');
        }
    }
    buf.push_str("_status");
    buf
}

fn query_params(request: &SnapshotStatusRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    if let Some(value) = &request.cluster_manager_timeout {
        params.insert("cluster_manager_timeout".to_string(), value.to_string());
    }
    if let Some(value) = request.ignore_unavailable {
        params.insert("ignore_unavailable".to_string(), value.to_string());
    }
    params
}

pub static ENDPOINT: SimpleEndpoint<SnapshotStatusRequest, SnapshotStatusResponse> =
    SimpleEndpoint::new("snapshot.status", method, path, query_params, no_body);

impl ApiRequest for SnapshotStatusRequest {
    type Response = SnapshotStatusResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}
