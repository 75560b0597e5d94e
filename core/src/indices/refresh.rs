//! `indices.refresh`: make recent writes visible to search.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_body, path_encode_list, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::indices::insert_index_options;
use crate::types::{ExpandWildcard, ShardStatistics};

const TYPE_NAME: &str = "RefreshRequest";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    allow_no_indices: Option<bool>,
    expand_wildcards: Vec<ExpandWildcard>,
    ignore_unavailable: Option<bool>,
    index: Vec<String>,
}

impl RefreshRequest {
    pub fn builder() -> RefreshRequestBuilder {
        RefreshRequestBuilder::default()
    }

    pub fn of(f: impl FnOnce(&mut RefreshRequestBuilder) -> &mut RefreshRequestBuilder) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }
}

#[derive(Debug, Default)]
pub struct RefreshRequestBuilder {
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<Vec<ExpandWildcard>>,
    ignore_unavailable: Option<bool>,
    index: Option<Vec<String>>,
    guard: SingleUse,
}

impl RefreshRequestBuilder {
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

    pub fn build(&mut self) -> Result<RefreshRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        Ok(RefreshRequest {
            allow_no_indices: self.allow_no_indices.take(),
            expand_wildcards: self.expand_wildcards.take().unwrap_or_default(),
            ignore_unavailable: self.ignore_unavailable.take(),
            index: self.index.take().unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardStatistics,
}

fn method(_request: &RefreshRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &RefreshRequest) -> String {
    let mut buf = String::from("/");
    if !request.index.is_empty() {
        path_encode_list(&request.index, &mut buf);
        buf.push('/');
    }
    buf.push_str("_refresh");
    buf
}

fn query_params(request: &RefreshRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    insert_index_options(
        &mut params,
        request.allow_no_indices,
        &request.expand_wildcards,
        request.ignore_unavailable,
    );
    params
}

pub static ENDPOINT: SimpleEndpoint<RefreshRequest, RefreshResponse> =
    SimpleEndpoint::new("indices.refresh", method, path, query_params, no_body);

impl ApiRequest for RefreshRequest {
    type Response = RefreshResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}
