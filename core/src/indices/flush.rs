//! `indices.flush`: commit the transaction log of one, several or all indices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_body, path_encode_list, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::indices::insert_index_options;
use crate::types::{ExpandWildcard, ShardStatistics};

const TYPE_NAME: &str = "FlushRequest";

/// An empty index list flushes every index in the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushRequest {
    allow_no_indices: Option<bool>,
    expand_wildcards: Vec<ExpandWildcard>,
    force: Option<bool>,
    ignore_unavailable: Option<bool>,
    index: Vec<String>,
    wait_if_ongoing: Option<bool>,
}

impl FlushRequest {
    pub fn builder() -> FlushRequestBuilder {
        FlushRequestBuilder::default()
    }

    pub fn of(f: impl FnOnce(&mut FlushRequestBuilder) -> &mut FlushRequestBuilder) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn force(&self) -> Option<bool> {
        self.force
    }

    pub fn wait_if_ongoing(&self) -> Option<bool> {
        self.wait_if_ongoing
    }
}

#[derive(Debug, Default)]
pub struct FlushRequestBuilder {
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<Vec<ExpandWildcard>>,
    force: Option<bool>,
    ignore_unavailable: Option<bool>,
    index: Option<Vec<String>>,
    wait_if_ongoing: Option<bool>,
    guard: SingleUse,
}

impl FlushRequestBuilder {
    pub fn allow_no_indices(&mut self, value: bool) -> &mut Self {
        self.allow_no_indices = Some(value);
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

    /// Flush even when there are no uncommitted changes.
    pub fn force(&mut self, value: bool) -> &mut Self {
        self.force = Some(value);
        self
    }

    pub fn ignore_unavailable(&mut self, value: bool) -> &mut Self {
        self.ignore_unavailable = Some(value);
        self
    }

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

    /// Block until a concurrent flush finishes instead of returning early.
    pub fn wait_if_ongoing(&mut self, value: bool) -> &mut Self {
        self.wait_if_ongoing = Some(value);
        self
    }

    pub fn build(&mut self) -> Result<FlushRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        Ok(FlushRequest {
            allow_no_indices: self.allow_no_indices.take(),
            expand_wildcards: self.expand_wildcards.take().unwrap_or_default(),
            force: self.force.take(),
            ignore_unavailable: self.ignore_unavailable.take(),
            index: self.index.take().unwrap_or_default(),
            wait_if_ongoing: self.wait_if_ongoing.take(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlushResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardStatistics,
}

fn method(_request: &FlushRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &FlushRequest) -> String {
    let mut buf = String::from("/");
    if !request.index.is_empty() {
        path_encode_list(&request.index, &mut buf);
        buf.push('/');
    }
    buf.push_str("_flush");
    buf
}

fn query_params(request: &FlushRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    insert_index_options(
        &mut params,
        request.allow_no_indices,
        &request.expand_wildcards,
        request.ignore_unavailable,
    );
    if let Some(value) = request.force {
        params.insert("force".to_string(), value.to_string());
    }
    if let Some(value) = request.wait_if_ongoing {
        params.insert("wait_if_ongoing".to_string(), value.to_string());
    }
    params
}

pub static ENDPOINT: SimpleEndpoint<FlushRequest, FlushResponse> =
    SimpleEndpoint::new("indices.flush", method, path, query_params, no_body);

impl ApiRequest for FlushRequest {
    type Response = FlushResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Endpoint;
    use crate::http::HttpResponse;

    #[test]
    fn flush_all_indices() {
        let req = FlushRequest::of(|b| b).unwrap();
        assert_eq!(ENDPOINT.method(&req), HttpMethod::Post);
        assert_eq!(ENDPOINT.path(&req), "/_flush");
        assert!(ENDPOINT.query_params(&req).is_empty());
    }

    #[test]
    fn flush_named_indices_with_flags() {
        let req = FlushRequest::of(|b| b.indices(["a", "b"]).force(true).wait_if_ongoing(false)).unwrap();
        assert_eq!(ENDPOINT.path(&req), "/a%2Cb/_flush");
        let params = ENDPOINT.query_params(&req);
        assert_eq!(params["force"], "true");
        assert_eq!(params["wait_if_ongoing"], "false");
    }

    #[test]
    fn parse_shard_statistics() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"_shards":{"total":4,"successful":2,"failed":0}}"#.to_string(),
        };
        let parsed = ENDPOINT.parse_response(response).unwrap();
        assert_eq!(parsed.shards.total, 4);
        assert_eq!(parsed.shards.successful, 2);
    }
}
