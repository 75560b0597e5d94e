//! `indices.clone`: copy an existing index into a new one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::builder::{map_put, map_put_all, require, SingleUse};
use crate::endpoint::{path_encode, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::types::{Time, WaitForActiveShards};

const TYPE_NAME: &str = "CloneIndexRequest";

/// Alias definition attached to the target index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_write_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_routing: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloneIndexRequest {
    aliases: Option<BTreeMap<String, Alias>>,
    cluster_manager_timeout: Option<Time>,
    index: String,
    settings: Option<BTreeMap<String, Value>>,
    target: String,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
}

impl CloneIndexRequest {
    pub fn builder() -> CloneIndexRequestBuilder {
        CloneIndexRequestBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut CloneIndexRequestBuilder) -> &mut CloneIndexRequestBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    pub fn aliases(&self) -> Option<&BTreeMap<String, Alias>> {
        self.aliases.as_ref()
    }

    /// Source index.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// `None` when never set; `Some` of an empty map when set to `{}`.
    pub fn settings(&self) -> Option<&BTreeMap<String, Value>> {
        self.settings.as_ref()
    }

    /// Index to create.
    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, Default)]
pub struct CloneIndexRequestBuilder {
    aliases: Option<BTreeMap<String, Alias>>,
    cluster_manager_timeout: Option<Time>,
    index: Option<String>,
    settings: Option<BTreeMap<String, Value>>,
    target: Option<String>,
    timeout: Option<Time>,
    wait_for_active_shards: Option<WaitForActiveShards>,
    guard: SingleUse,
}

impl CloneIndexRequestBuilder {
    /// Adds all entries of `map` to `aliases`.
    pub fn aliases(&mut self, map: BTreeMap<String, Alias>) -> &mut Self {
        map_put_all(&mut self.aliases, map);
        self
    }

    /// Adds one entry to `aliases`.
    pub fn alias(&mut self, name: impl Into<String>, alias: Alias) -> &mut Self {
        map_put(&mut self.aliases, name, alias);
        self
    }

    pub fn cluster_manager_timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.cluster_manager_timeout = Some(value.into());
        self
    }

    /// Required.
    pub fn index(&mut self, value: impl Into<String>) -> &mut Self {
        self.index = Some(value.into());
        self
    }

    /// Adds all entries of `map` to `settings`.
    pub fn settings(&mut self, map: BTreeMap<String, Value>) -> &mut Self {
        map_put_all(&mut self.settings, map);
        self
    }

    /// Adds one entry to `settings`.
    pub fn setting(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        map_put(&mut self.settings, key, value.into());
        self
    }

    /// Required.
    pub fn target(&mut self, value: impl Into<String>) -> &mut Self {
        self.target = Some(value.into());
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

    pub fn build(&mut self) -> Result<CloneIndexRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let index = require(self.index.take(), TYPE_NAME, "index")?;
        let target = require(self.target.take(), TYPE_NAME, "target")?;
        Ok(CloneIndexRequest {
            aliases: self.aliases.take(),
            cluster_manager_timeout: self.cluster_manager_timeout.take(),
            index,
            settings: self.settings.take(),
            target,
            timeout: self.timeout.take(),
            wait_for_active_shards: self.wait_for_active_shards.take(),
        })
    }
}

#[derive(Serialize)]
struct CloneIndexBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    aliases: Option<&'a BTreeMap<String, Alias>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<&'a BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneIndexResponse {
    pub acknowledged: bool,
    pub shards_acknowledged: bool,
    pub index: String,
}

fn method(_request: &CloneIndexRequest) -> HttpMethod {
    HttpMethod::Put
}

fn path(request: &CloneIndexRequest) -> String {
    let mut buf = String::from("/");
    path_encode(&request.index, &mut buf);
    buf.push_str("/_clone/");
    path_encode(&request.target, &mut buf);
    buf
}

fn query_params(request: &CloneIndexRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
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

fn body(request: &CloneIndexRequest) -> Result<Option<Value>, serde_json::Error> {
    let body = CloneIndexBody {
        aliases: request.aliases.as_ref(),
        settings: request.settings.as_ref(),
    };
    serde_json::to_value(body).map(Some)
}

pub static ENDPOINT: SimpleEndpoint<CloneIndexRequest, CloneIndexResponse> =
    SimpleEndpoint::new("indices.clone", method, path, query_params, body);

impl ApiRequest for CloneIndexRequest {
    type Response = CloneIndexResponse;

    fn endpoint() -> &'static SimpleEndpoint<Self, Self::Response> {
        &ENDPOINT
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::endpoint::Endpoint;
    use crate::transport::TransportOptions;

    #[test]
    fn clone_resolves_put_with_both_segments() {
        let req = CloneIndexRequest::of(|b| b.index("logs").target("logs-copy")).unwrap();
        assert_eq!(ENDPOINT.method(&req), HttpMethod::Put);
        assert_eq!(ENDPOINT.path(&req), "/logs/_clone/logs-copy");
        assert_eq!(ENDPOINT.body(&req).unwrap(), Some(json!({})));
    }

    #[test]
    fn required_fields_reported_in_declaration_order() {
        let err = CloneIndexRequest::of(|b| b).unwrap_err();
        assert_eq!(err.field(), Some("index"));

        let err = CloneIndexRequest::of(|b| b.index("logs")).unwrap_err();
        assert_eq!(err.field(), Some("target"));

        let err = CloneIndexRequest::of(|b| b.target("copy")).unwrap_err();
        assert_eq!(err.field(), Some("index"));
    }

    #[test]
    fn settings_merge_and_later_keys_win() {
        let req = CloneIndexRequest::of(|b| {
            b.index("logs")
                .target("copy")
                .setting("index.number_of_replicas", 1)
                .settings(BTreeMap::from([
                    ("index.number_of_replicas".to_string(), json!(0)),
                    ("index.refresh_interval".to_string(), json!("5s")),
                ]))
                .alias(
                    "recent",
                    Alias {
                        is_write_index: Some(true),
                        ..Alias::default()
                    },
                )
        })
        .unwrap();
        let settings = req.settings().unwrap();
        assert_eq!(settings["index.number_of_replicas"], json!(0));
        assert_eq!(settings.len(), 2);

        let http = ENDPOINT.build_request(&req, &TransportOptions::default()).unwrap();
        let body: Value = serde_json::from_str(http.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "aliases": {"recent": {"is_write_index": true}},
                "settings": {"index.number_of_replicas": 0, "index.refresh_interval": "5s"}
            })
        );
        assert_eq!(http.header("content-type"), Some("application/json"));
    }

    #[test]
    fn explicit_empty_settings_are_sent() {
        let unset = CloneIndexRequest::of(|b| b.index("logs").target("copy")).unwrap();
        let empty = CloneIndexRequest::of(|b| b.index("logs").target("copy").settings(BTreeMap::new())).unwrap();

        assert_eq!(unset.settings(), None);
        assert_eq!(empty.settings(), Some(&BTreeMap::new()));
        assert_ne!(unset, empty);
        assert_eq!(ENDPOINT.body(&unset).unwrap(), Some(json!({})));
        assert_eq!(ENDPOINT.body(&empty).unwrap(), Some(json!({"settings": {}})));

        let no_aliases = CloneIndexRequest::of(|b| b.index("logs").target("copy").aliases(BTreeMap::new())).unwrap();
        assert_eq!(ENDPOINT.body(&no_aliases).unwrap(), Some(json!({"aliases": {}})));
    }
}
