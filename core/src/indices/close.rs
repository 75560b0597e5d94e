//! `indices.close`: block reads and writes on one or more indices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{require, vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_body, path_encode_list, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::indices::insert_index_options;
use crate::types::{ExpandWildcard, Time, WaitForActiveShards};

const TYPE_NAME: &str = "CloseIndexRequest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseIndexRequest {
    allow_no_indices: Option<bool>,
    cluster_manager_timeout: Option<Time>,
    expand_wildcards: Vec<ExpandWildcard>,
    ignore_unavailable: Option<bool>,
    index: Vec<String>,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
}

impl CloseIndexRequest {
    pub fn builder() -> CloseIndexRequestBuilder {
        CloseIndexRequestBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut CloseIndexRequestBuilder) -> &mut CloseIndexRequestBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    /// Indices to close; wildcards are expanded per `expand_wildcards`.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn expand_wildcards(&self) -> &[ExpandWildcard] {
        &self.expand_wildcards
    }

    pub fn timeout(&self) -> Option<&Time> {
        self.timeout.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct CloseIndexRequestBuilder {
    allow_no_indices: Option<bool>,
    cluster_manager_timeout: Option<Time>,
    expand_wildcards: Option<Vec<ExpandWildcard>>,
    ignore_unavailable: Option<bool>,
    index: Option<Vec<String>>,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
    guard: SingleUse,
}

impl CloseIndexRequestBuilder {
    pub fn allow_no_indices(&mut self, value: bool) -> &mut Self {
        self.allow_no_indices = Some(value);
        self
    }

    pub fn cluster_manager_timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.cluster_manager_timeout = Some(value.into());
        self
    }

    pub fn expand_wildcard(&mut self, value: ExpandWildcard) -> &mut Self {
        vec_add(&mut self.expand_wildcards, value);
        self
    }

    pub fn expand_wildcards(&mut self, values: impl IntoIterator<Item = ExpandWildcard>) -> &mut Self {
        vec_add_all(&mut self.expand_wildcards, values);
        self
    }

    pub fn ignore_unavailable(&mut self, value: bool) -> &mut Self {
        self.ignore_unavailable = Some(value);
        self
    }

    /// Required. Adds one index name or pattern.
    pub fn index(&mut self, value: impl Into<String>) -> &mut Self {
        vec_add(&mut self.index, value.into());
        self
    }

    /// Required. Adds all index names or patterns.
    pub fn indices<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        vec_add_all(&mut self.index, values.into_iter().map(Into::into));
        self
    }

    pub fn timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.timeout = Some(value.into());
        self
    }

    pub fn wait_for_active_shards(&mut self, value: impl Into<WaitForActiveShards>) -> &mut Self {
        self.wait_for_active_shards = Some(value.into());
        self
    }

    pub fn build(&mut self) -> Result<CloseIndexRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let index = require(self.index.take(), TYPE_NAME, "index")?;
        Ok(CloseIndexRequest {
            allow_no_indices: self.allow_no_indices.take(),
            cluster_manager_timeout: self.cluster_manager_timeout.take(),
            expand_wildcards: self.expand_wildcards.take().unwrap_or_default(),
            ignore_unavailable: self.ignore_unavailable.take(),
            index,
            timeout: self.timeout.take(),
            wait_for_active_shards: self.wait_for_active_shards.take(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseIndexResponse {
    pub acknowledged: bool,
    pub shards_acknowledged: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<BTreeMap<String, CloseIndexResult>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseIndexResult {
    pub closed: bool,
}

fn method(_request: &CloseIndexRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &CloseIndexRequest) -> String {
    let mut buf = String::from("/");
    path_encode_list(&request.index, &mut buf);
    buf.push_str("/_close");
    buf
}

fn query_params(request: &CloseIndexRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    insert_index_options(
        &mut params,
        request.allow_no_indices,
        &request.expand_wildcards,
        request.ignore_unavailable,
    );
    if let Some(value) = &request.cluster_manager_timeout {
        params.insert("cluster_manager_timeout".to_string(), value.to_string());
    }
    if let Some(value) = &request.timeout {
        params.insert("timeout".to_string(), value.to_string());
    }
    if let Some(value) = &request.wait_for_active_shards {
        params.insert("wait_for_active_shards".to_string(), value.to_string());
    }
    params
}

pub static ENDPOINT: SimpleEndpoint<CloseIndexRequest, CloseIndexResponse> =
    SimpleEndpoint::new("indices.close", method, path, query_params, no_body);

impl ApiRequest for CloseIndexRequest {
    type Response = CloseIndexResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}
