//! `indices.open`: reopen closed indices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{require, vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_body, path_encode_list, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::indices::insert_index_options;
use crate::types::{ExpandWildcard, Time, WaitForActiveShards};

const TYPE_NAME: &str = "OpenRequest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    allow_no_indices: Option<bool>,
    cluster_manager_timeout: Option<Time>,
    expand_wildcards: Vec<ExpandWildcard>,
    ignore_unavailable: Option<bool>,
    index: Vec<String>,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
}

impl OpenRequest {
    pub fn builder() -> OpenRequestBuilder {
        OpenRequestBuilder::default()
    }

    pub fn of(f: impl FnOnce(&mut OpenRequestBuilder) -> &mut OpenRequestBuilder) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }
}

#[derive(Debug, Default)]
pub struct OpenRequestBuilder {
    allow_no_indices: Option<bool>,
    cluster_manager_timeout: Option<Time>,
    expand_wildcards: Option<Vec<ExpandWildcard>>,
    ignore_unavailable: Option<bool>,
    index: Option<Vec<String>>,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
    guard: SingleUse,
}

impl OpenRequestBuilder {
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

    /// Required.
    pub fn index(&mut self, value: impl Into<String>) -> &mut Self {
        vec_add(&mut self.index, value.into());
        self
    }

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

    pub fn build(&mut self) -> Result<OpenRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let index = require(self.index.take(), TYPE_NAME, "index")?;
        Ok(OpenRequest {
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
pub struct OpenResponse {
    pub acknowledged: bool,
    pub shards_acknowledged: bool,
}

fn method(_request: &OpenRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &OpenRequest) -> String {
    let mut buf = String::from("/");
    path_encode_list(&request.index, &mut buf);
    buf.push_str("/_open");
    buf
}

fn query_params(request: &OpenRequest) -> BTreeMap<String, String> {
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

pub static ENDPOINT: SimpleEndpoint<OpenRequest, OpenResponse> =
    SimpleEndpoint::new("indices.open", method, path, query_params, no_body);

impl ApiRequest for OpenRequest {
    type Response = OpenResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;

    #[test]
    fn open_resolves_path_and_params() {
        let req = OpenRequest::of(|b| {
            b.index("logs")
                .ignore_unavailable(true)
                .allow_no_indices(false)
                .wait_for_active_shards(WaitForActiveShards::All)
        })
        .unwrap();
        assert_eq!(ENDPOINT.path(&req), "/logs/_open");

        let params = ENDPOINT.query_params(&req);
        assert_eq!(params["ignore_unavailable"], "true");
        assert_eq!(params["allow_no_indices"], "false");
        assert_eq!(params["wait_for_active_shards"], "all");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn index_is_required() {
        assert_eq!(OpenRequest::of(|b| b).unwrap_err().field(), Some("index"));
    }
}
