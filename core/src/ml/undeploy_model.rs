//! `ml.undeploy_model`: unload a model from the nodes serving it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::builder::{map_put, map_put_all, require, vec_add, vec_add_all, SingleUse};
use crate::endpoint::{no_params, path_encode, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;

const REQUEST_TYPE_NAME: &str = "UndeployModelRequest";
const NODE_TYPE_NAME: &str = "UndeployModelNode";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndeployModelRequest {
    model_id: String,
    node_ids: Option<Vec<String>>,
}

impl UndeployModelRequest {
    pub fn builder() -> UndeployModelRequestBuilder {
        UndeployModelRequestBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut UndeployModelRequestBuilder) -> &mut UndeployModelRequestBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Nodes to undeploy from; `None` means every node serving the model.
    pub fn node_ids(&self) -> Option<&[String]> {
        self.node_ids.as_deref()
    }
}

#[derive(Debug, Default)]
pub struct UndeployModelRequestBuilder {
    model_id: Option<String>,
    node_ids: Option<Vec<String>>,
    guard: SingleUse,
}

impl UndeployModelRequestBuilder {
    /// Required.
    pub fn model_id(&mut self, value: impl Into<String>) -> &mut Self {
        self.model_id = Some(value.into());
        self
    }

    pub fn node_id(&mut self, value: impl Into<String>) -> &mut Self {
        vec_add(&mut self.node_ids, value.into());
        self
    }

    pub fn node_ids<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        vec_add_all(&mut self.node_ids, values.into_iter().map(Into::into));
        self
    }

    pub fn build(&mut self) -> Result<UndeployModelRequest, BuildError> {
        self.guard.check(REQUEST_TYPE_NAME)?;
        let model_id = require(self.model_id.take(), REQUEST_TYPE_NAME, "model_id")?;
        Ok(UndeployModelRequest {
            model_id,
            node_ids: self.node_ids.take(),
        })
    }
}

/// Per-node outcome of an undeploy call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UndeployModelNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stats: Option<BTreeMap<String, Value>>,
}

impl UndeployModelNode {
    pub fn builder() -> UndeployModelNodeBuilder {
        UndeployModelNodeBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut UndeployModelNodeBuilder) -> &mut UndeployModelNodeBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    /// Model id to undeploy status, as reported by the node.
    pub fn stats(&self) -> Option<&BTreeMap<String, Value>> {
        self.stats.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct UndeployModelNodeBuilder {
    stats: Option<BTreeMap<String, Value>>,
    guard: SingleUse,
}

impl UndeployModelNodeBuilder {
    /// Adds all entries of `map` to `stats`.
    pub fn stats(&mut self, map: BTreeMap<String, Value>) -> &mut Self {
        map_put_all(&mut self.stats, map);
        self
    }

    /// Adds an entry to `stats`.
    pub fn stats_entry(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        map_put(&mut self.stats, key, value.into());
        self
    }

    pub fn build(&mut self) -> Result<UndeployModelNode, BuildError> {
        self.guard.check(NODE_TYPE_NAME)?;
        Ok(UndeployModelNode {
            stats: self.stats.take(),
        })
    }
}

/// Node id to that node's outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UndeployModelResponse {
    pub nodes: BTreeMap<String, UndeployModelNode>,
}

fn method(_request: &UndeployModelRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &UndeployModelRequest) -> String {
    let mut buf = String::from("/_plugins/_ml/models/");
    path_encode(&request.model_id, &mut buf);
    buf.push_str("/_undeploy");
    buf
}

fn body(request: &UndeployModelRequest) -> Result<Option<Value>, serde_json::Error> {
    Ok(request
        .node_ids
        .as_ref()
        .map(|node_ids| json!({ "node_ids": node_ids })))
}

pub static ENDPOINT: SimpleEndpoint<UndeployModelRequest, UndeployModelResponse> =
    SimpleEndpoint::new("ml.undeploy_model", method, path, no_params, body);

impl ApiRequest for UndeployModelRequest {
    type Response = UndeployModelResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}
