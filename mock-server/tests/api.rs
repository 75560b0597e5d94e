use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    let builder = Request::builder().method(method).uri(uri);
    let builder = if body.is_empty() {
        builder
    } else {
        builder.header(http::header::CONTENT_TYPE, "application/json")
    };
    builder.body(body.to_string()).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(request(method, uri, body)).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

// --- snapshot ---

#[tokio::test]
async fn cleanup_unknown_repository_is_404() {
    let app = app();
    let (status, body) = call(&app, "POST", "/_snapshot/nope/_cleanup", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"]["type"], "repository_missing_exception");
    assert_eq!(body["error"]["root_cause"][0]["type"], "repository_missing_exception");
}

#[tokio::test]
async fn deleted_snapshot_leaves_stale_data_until_cleanup() {
    let app = app();
    call(&app, "PUT", "/logs", "").await;
    call(&app, "PUT", "/_snapshot/backups", r#"{"type":"fs"}"#).await;
    let (status, _) = call(&app, "PUT", "/_snapshot/backups/snap-1", r#"{"indices":"logs"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let (_, fresh) = call(&app, "POST", "/_snapshot/backups/_cleanup", "").await;
    assert_eq!(fresh, json!({"results": {"deleted_bytes": 0, "deleted_blobs": 0}}));

    call(&app, "DELETE", "/_snapshot/backups/snap-1", "").await;
    let (_, cleaned) = call(&app, "POST", "/_snapshot/backups/_cleanup", "").await;
    assert_eq!(cleaned["results"]["deleted_blobs"], 4);
    assert_eq!(cleaned["results"]["deleted_bytes"], 1024);
}

#[tokio::test]
async fn repository_name_with_encoded_slash() {
    let app = app();
    let (status, _) = call(&app, "PUT", "/_snapshot/team%2Fbackups", "").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "POST", "/_snapshot/team%2Fbackups/_cleanup", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["deleted_blobs"], 0);
}

#[tokio::test]
async fn snapshot_status_reports_per_index_stats() {
    let app = app();
    call(&app, "PUT", "/a", "").await;
    call(&app, "PUT", "/b", "").await;
    call(&app, "PUT", "/_snapshot/repo", "").await;
    call(&app, "PUT", "/_snapshot/repo/nightly", "").await;

    let (status, body) = call(&app, "GET", "/_snapshot/repo/nightly/_status", "").await;
    assert_eq!(status, StatusCode::OK);
    let snapshot = &body["snapshots"][0];
    assert_eq!(snapshot["state"], "SUCCESS");
    assert_eq!(snapshot["shards_stats"]["total"], 2);
    assert_eq!(snapshot["stats"]["total"]["file_count"], 8);
    assert_eq!(snapshot["indices"]["a"]["stats"]["total"]["size_in_bytes"], 1024);

    let (status, body) = call(&app, "GET", "/_snapshot/repo/nightly,missing/_status", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "snapshot_missing_exception");

    let (_, body) = call(&app, "GET", "/_snapshot/repo/nightly,missing/_status?ignore_unavailable=true", "").await;
    assert_eq!(body["snapshots"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn nothing_in_progress() {
    let app = app();
    let (_, body) = call(&app, "GET", "/_snapshot/_status", "").await;
    assert_eq!(body, json!({"snapshots": []}));
}

// --- indices ---

#[tokio::test]
async fn create_index_twice_is_rejected() {
    let app = app();
    let (status, body) = call(&app, "PUT", "/logs", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["index"], "logs");

    let (status, body) = call(&app, "PUT", "/logs", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "resource_already_exists_exception");
    assert_eq!(body["error"]["index"], "logs");
}

#[tokio::test]
async fn close_then_open() {
    let app = app();
    call(&app, "PUT", "/a", "").await;
    call(&app, "PUT", "/b", "").await;

    let (status, body) = call(&app, "POST", "/a,b/_close", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["indices"]["a"]["closed"], true);
    assert_eq!(body["indices"]["b"]["closed"], true);

    let (_, index) = call(&app, "GET", "/a", "").await;
    assert_eq!(index["a"]["state"], "close");

    let (status, body) = call(&app, "POST", "/a/_open", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"acknowledged": true, "shards_acknowledged": true}));
}

#[tokio::test]
async fn close_missing_index_is_404_unless_ignored() {
    let app = app();
    let (status, body) = call(&app, "POST", "/gone/_close", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "index_not_found_exception");

    let (status, body) = call(&app, "POST", "/gone/_close?ignore_unavailable=true", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["indices"], json!({}));
}

#[tokio::test]
async fn clone_copies_settings_and_merges_overrides() {
    let app = app();
    call(&app, "PUT", "/src", r#"{"settings":{"index.number_of_replicas":1}}"#).await;
    let (status, body) = call(
        &app,
        "PUT",
        "/src/_clone/dst",
        r#"{"settings":{"index.refresh_interval":"5s"},"aliases":{"current":{}}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["index"], "dst");

    let (_, index) = call(&app, "GET", "/dst", "").await;
    assert_eq!(index["dst"]["settings"]["index.number_of_replicas"], 1);
    assert_eq!(index["dst"]["settings"]["index.refresh_interval"], "5s");
    assert!(index["dst"]["aliases"]["current"].is_object());

    let (status, _) = call(&app, "PUT", "/src/_clone/dst", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn flush_and_refresh_count_open_indices() {
    let app = app();
    call(&app, "PUT", "/a", "").await;
    call(&app, "PUT", "/b", "").await;
    call(&app, "POST", "/b/_close", "").await;

    let (_, body) = call(&app, "POST", "/_flush", "").await;
    assert_eq!(body["_shards"], json!({"total": 1, "successful": 1, "failed": 0}));

    let (_, body) = call(&app, "POST", "/a/_refresh", "").await;
    assert_eq!(body["_shards"]["successful"], 1);

    let (status, body) = call(&app, "POST", "/b/_refresh", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "index_closed_exception");
}

// --- ml ---

#[tokio::test]
async fn undeploy_from_one_node_then_the_rest() {
    let app = app();
    let (status, _) = call(&app, "POST", "/_plugins/_ml/models/m1/_deploy", "").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, "POST", "/_plugins/_ml/models/m1/_undeploy", r#"{"node_ids":["node-2"]}"#).await;
    assert_eq!(body, json!({"node-2": {"stats": {"m1": "undeployed"}}}));

    let (_, body) = call(&app, "POST", "/_plugins/_ml/models/m1/_undeploy", "").await;
    assert_eq!(body, json!({"node-1": {"stats": {"m1": "undeployed"}}}));

    let (_, body) = call(&app, "POST", "/_plugins/_ml/models/m1/_undeploy", "").await;
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn undeploy_unknown_model_is_404() {
    let app = app();
    let (status, body) = call(&app, "POST", "/_plugins/_ml/models/ghost/_undeploy", "").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "resource_not_found_exception");
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = app();
    let resp = app.oneshot(request("PUT", "/logs", "{not json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let bytes = body_bytes(resp).await;
    assert!(String::from_utf8_lossy(&bytes).contains("parse_exception"));
}
