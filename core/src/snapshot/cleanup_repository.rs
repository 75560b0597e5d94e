//! `snapshot.cleanup_repository`: remove stale data from a repository.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::builder::{require, SingleUse};
use crate::endpoint::{no_body, path_encode, ApiRequest, SimpleEndpoint};
use crate::error::BuildError;
use crate::http::HttpMethod;
use crate::types::Time;

const TYPE_NAME: &str = "CleanupRepositoryRequest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRepositoryRequest {
    cluster_manager_timeout: Option<Time>,
    master_timeout: Option<Time>,
    repository: String,
    timeout: Option<Time>,
}

impl CleanupRepositoryRequest {
    pub fn builder() -> CleanupRepositoryRequestBuilder {
        CleanupRepositoryRequestBuilder::default()
    }

    pub fn of(
        f: impl FnOnce(&mut CleanupRepositoryRequestBuilder) -> &mut CleanupRepositoryRequestBuilder,
    ) -> Result<Self, BuildError> {
        f(&mut Self::builder()).build()
    }

    /// Operation timeout for the connection to the cluster-manager node.
    pub fn cluster_manager_timeout(&self) -> Option<&Time> {
        self.cluster_manager_timeout.as_ref()
    }

    #[deprecated(note = "use cluster_manager_timeout")]
    pub fn master_timeout(&self) -> Option<&Time> {
        self.master_timeout.as_ref()
    }

    /// Snapshot repository to clean up.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn timeout(&self) -> Option<&Time> {
        self.timeout.as_ref()
    }

    /// Start a new builder pre-populated from this request.
    pub fn to_builder(&self) -> CleanupRepositoryRequestBuilder {
        CleanupRepositoryRequestBuilder {
            cluster_manager_timeout: self.cluster_manager_timeout.clone(),
            master_timeout: self.master_timeout.clone(),
            repository: Some(self.repository.clone()),
            timeout: self.timeout.clone(),
            guard: SingleUse::default(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CleanupRepositoryRequestBuilder {
    cluster_manager_timeout: Option<Time>,
    master_timeout: Option<Time>,
    repository: Option<String>,
    timeout: Option<Time>,
    guard: SingleUse,
}

impl CleanupRepositoryRequestBuilder {
    pub fn cluster_manager_timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.cluster_manager_timeout = Some(value.into());
        self
    }

    #[deprecated(note = "use cluster_manager_timeout")]
    pub fn master_timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.master_timeout = Some(value.into());
        self
    }

    /// Required.
    pub fn repository(&mut self, value: impl Into<String>) -> &mut Self {
        self.repository = Some(value.into());
        self
    }

    pub fn timeout(&mut self, value: impl Into<Time>) -> &mut Self {
        self.timeout = Some(value.into());
        self
    }

    /// Snapshot of the in-flight state with a fresh single-use guard.
    pub fn copy(&self) -> Self {
        Self {
            cluster_manager_timeout: self.cluster_manager_timeout.clone(),
            master_timeout: self.master_timeout.clone(),
            repository: self.repository.clone(),
            timeout: self.timeout.clone(),
            guard: SingleUse::default(),
        }
    }

    pub fn build(&mut self) -> Result<CleanupRepositoryRequest, BuildError> {
        self.guard.check(TYPE_NAME)?;
        let repository = require(self.repository.take(), TYPE_NAME, "repository")?;
        Ok(CleanupRepositoryRequest {
            cluster_manager_timeout: self.cluster_manager_timeout.take(),
            master_timeout: self.master_timeout.take(),
            repository,
            timeout: self.timeout.take(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRepositoryResponse {
    pub results: CleanupRepositoryResults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupRepositoryResults {
    /// Number of binary large objects removed.
    pub deleted_blobs: u64,
    pub deleted_bytes: u64,
}

fn method(_request: &CleanupRepositoryRequest) -> HttpMethod {
    HttpMethod::Post
}

fn path(request: &CleanupRepositoryRequest) -> String {
    let mut buf = String::from("/_snapshot/");
    path_encode(&request.repository, &mut buf);
    buf.push_str("/_cleanup");
    buf
}

fn query_params(request: &CleanupRepositoryRequest) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    if let Some(value) = &request.cluster_manager_timeout {
        params.insert("cluster_manager_timeout".to_string(), value.to_string());
    }
    if let Some(value) = &request.master_timeout {
        params.insert("master_timeout".to_string(), value.to_string());
    }
    if let Some(value) = &request.timeout {
        params.insert("timeout".to_string(), value.to_string());
    }
    params
}

pub static ENDPOINT: SimpleEndpoint<CleanupRepositoryRequest, CleanupRepositoryResponse> =
    SimpleEndpoint::new("snapshot.cleanup_repository", method, path, query_params, no_body);

impl ApiRequest for CleanupRepositoryRequest {
    type Response = CleanupRepositoryResponse;

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
    fn only_repository_resolves_to_post_cleanup() {
        let req = CleanupRepositoryRequest::builder()
            .repository("my-repo")
            .build()
            .unwrap();
        assert_eq!(ENDPOINT.method(&req), HttpMethod::Post);
        assert_eq!(ENDPOINT.path(&req), "/_snapshot/my-repo/_cleanup");
        assert!(ENDPOINT.query_params(&req).is_empty());
        assert!(ENDPOINT.body(&req).unwrap().is_none());
    }

    #[test]
    fn missing_repository_is_reported() {
        let err = CleanupRepositoryRequest::builder()
            .timeout("30s")
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::MissingRequiredField {
                type_name: "CleanupRepositoryRequest",
                field: "repository"
            }
        );
    }

    #[test]
    fn second_build_is_rejected() {
        let mut builder = CleanupRepositoryRequest::builder();
        builder.repository("my-repo");
        assert!(builder.build().is_ok());
        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::BuilderReused {
                type_name: "CleanupRepositoryRequest"
            }
        );
    }

    #[test]
    #[allow(deprecated)]
    fn set_timeouts_become_query_params() {
        let req = CleanupRepositoryRequest::of(|b| {
            b.repository("my-repo")
                .cluster_manager_timeout("1m")
                .master_timeout("2m")
                .timeout("30s")
        })
        .unwrap();
        let params = ENDPOINT.query_params(&req);
        assert_eq!(params.len(), 3);
        assert_eq!(params["cluster_manager_timeout"], "1m");
        assert_eq!(params["master_timeout"], "2m");
        assert_eq!(params["timeout"], "30s");
    }

    #[test]
    fn repository_with_slash_stays_one_segment() {
        let req = CleanupRepositoryRequest::of(|b| b.repository("team/backups")).unwrap();
        assert_eq!(ENDPOINT.path(&req), "/_snapshot/team%2Fbackups/_cleanup");
    }

    #[test]
    fn to_builder_derives_a_new_request() {
        let original = CleanupRepositoryRequest::of(|b| b.repository("a").timeout("5s")).unwrap();
        let derived = original.to_builder().repository("b").build().unwrap();
        assert_eq!(derived.repository(), "b");
        assert_eq!(derived.timeout(), Some(&Time::new("5s")));
        assert_eq!(original.repository(), "a");
    }

    #[test]
    fn copy_snapshots_in_flight_state() {
        let mut builder = CleanupRepositoryRequest::builder();
        builder.repository("a");
        let mut copy = builder.copy();
        builder.build().unwrap();
        let copied = copy.timeout("1s").build().unwrap();
        assert_eq!(copied.repository(), "a");
        assert_eq!(copied.timeout(), Some(&Time::new("1s")));
    }

    #[test]
    fn parse_cleanup_results() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"results":{"deleted_bytes":20,"deleted_blobs":5}}"#.to_string(),
        };
        let parsed = ENDPOINT.parse_response(response).unwrap();
        assert_eq!(parsed.results.deleted_blobs, 5);
        assert_eq!(parsed.results.deleted_bytes, 20);
    }
}
