//! In-memory stand-in for the search service's snapshot, index and ML
//! endpoints. State lives in one `Cluster` behind an `RwLock`; errors use the
//! service's `{"error": {...}, "status": N}` body.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

/// Nodes a deployed model is loaded on.
pub const NODES: [&str; 2] = ["node-1", "node-2"];

/// Files each index contributes to a snapshot.
const FILES_PER_INDEX: u64 = 4;
const BYTES_PER_FILE: u64 = 256;

#[derive(Debug, Default)]
pub struct Cluster {
    repositories: BTreeMap<String, Repository>,
    indices: BTreeMap<String, Index>,
    /// Model id to the nodes it is deployed on.
    models: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct Repository {
    snapshots: BTreeMap<String, Snapshot>,
    stale_blobs: u64,
    stale_bytes: u64,
}

#[derive(Debug, Clone)]
struct Snapshot {
    uuid: Uuid,
    indices: Vec<String>,
}

#[derive(Debug, Clone)]
struct Index {
    uuid: Uuid,
    open: bool,
    settings: Map<String, Value>,
    aliases: Map<String, Value>,
}

impl Index {
    fn new(settings: Map<String, Value>, aliases: Map<String, Value>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            open: true,
            settings,
            aliases,
        }
    }
}

pub type Db = Arc<RwLock<Cluster>>;

#[derive(Debug, Default, Deserialize)]
struct CreateIndex {
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    aliases: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct CreateSnapshot {
    indices: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Undeploy {
    node_ids: Option<Vec<String>>,
}

/// A rejected request, rendered as the service's error body.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    kind: &'static str,
    reason: String,
    metadata: Map<String, Value>,
}

impl Failure {
    fn new(status: StatusCode, kind: &'static str, reason: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            reason: reason.into(),
            metadata: Map::new(),
        }
    }

    fn with(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), Value::from(value));
        self
    }

    fn index_not_found(index: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "index_not_found_exception", format!("no such index [{index}]"))
            .with("index", index)
    }

    fn index_closed(index: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "index_closed_exception", "closed").with("index", index)
    }

    fn index_exists(index: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "resource_already_exists_exception",
            format!("index [{index}] already exists"),
        )
        .with("index", index)
    }

    fn repository_missing(repository: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "repository_missing_exception", format!("[{repository}] missing"))
    }

    fn snapshot_missing(repository: &str, snapshot: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "snapshot_missing_exception",
            format!("[{repository}:{snapshot}] is missing"),
        )
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let mut cause = self.metadata;
        cause.insert("type".to_string(), Value::from(self.kind));
        cause.insert("reason".to_string(), Value::from(self.reason));
        let mut error = cause.clone();
        error.insert("root_cause".to_string(), Value::Array(vec![Value::Object(cause)]));
        let body = json!({ "error": error, "status": self.status.as_u16() });
        (self.status, Json(body)).into_response()
    }
}

type Reply = Result<Json<Value>, Failure>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Cluster::default()));
    Router::new()
        .route("/_snapshot/_status", get(all_snapshot_status))
        .route("/_snapshot/{repository}", put(create_repository))
        .route("/_snapshot/{repository}/_cleanup", post(cleanup_repository))
        .route("/_snapshot/{repository}/_status", get(repository_status))
        .route("/_snapshot/{repository}/{snapshot}", put(create_snapshot).delete(delete_snapshot))
        .route("/_snapshot/{repository}/{snapshot}/_status", get(snapshot_status))
        .route("/_flush", post(flush_all))
        .route("/_refresh", post(refresh_all))
        .route("/_plugins/_ml/models/{model_id}/_deploy", post(deploy_model))
        .route("/_plugins/_ml/models/{model_id}/_undeploy", post(undeploy_model))
        .route("/{index}", get(get_index).put(create_index))
        .route("/{index}/_close", post(close_index))
        .route("/{index}/_open", post(open_index))
        .route("/{index}/_flush", post(flush_indices))
        .route("/{index}/_refresh", post(refresh_indices))
        .route("/{index}/_clone/{target}", put(clone_index))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// An empty body reads as `T::default()`.
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Failure> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| Failure::new(StatusCode::BAD_REQUEST, "parse_exception", e.to_string()))
}

fn flag(params: &HashMap<String, String>, name: &str) -> bool {
    params.get(name).is_some_and(|v| v == "true")
}

/// Expand a comma-separated index expression. `_all`, `*` and `prefix*`
/// patterns match existing indices; a missing concrete name is an error
/// unless `ignore_unavailable` is set.
fn resolve(cluster: &Cluster, expression: &str, ignore_unavailable: bool) -> Result<Vec<String>, Failure> {
    let mut names = Vec::new();
    for part in expression.split(',').filter(|p| !p.is_empty()) {
        if part == "_all" || part.ends_with('*') {
            let prefix = if part == "_all" { "" } else { part.trim_end_matches('*') };
            names.extend(cluster.indices.keys().filter(|k| k.starts_with(prefix)).cloned());
        } else if cluster.indices.contains_key(part) {
            names.push(part.to_string());
        } else if !ignore_unavailable {
            return Err(Failure::index_not_found(part));
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

fn summary(indices: u64) -> Value {
    json!({ "file_count": indices * FILES_PER_INDEX, "size_in_bytes": indices * FILES_PER_INDEX * BYTES_PER_FILE })
}

fn stage_counts(shards: u64) -> Value {
    json!({ "initializing": 0, "started": 0, "finalizing": 0, "done": shards, "failed": 0, "total": shards })
}

fn snapshot_stats(indices: u64) -> Value {
    json!({
        "incremental": summary(indices),
        "total": summary(indices),
        "start_time_in_millis": 0,
        "time_in_millis": 0,
    })
}

fn shards(count: usize) -> Value {
    json!({ "_shards": { "total": count, "successful": count, "failed": 0 } })
}

async fn create_repository(State(db): State<Db>, Path(repository): Path<String>) -> Json<Value> {
    let mut cluster = db.write().await;
    cluster.repositories.entry(repository.clone()).or_default();
    info!(%repository, "repository registered");
    Json(json!({ "acknowledged": true }))
}

async fn cleanup_repository(State(db): State<Db>, Path(repository): Path<String>) -> Reply {
    let mut cluster = db.write().await;
    let repo = cluster
        .repositories
        .get_mut(&repository)
        .ok_or_else(|| Failure::repository_missing(&repository))?;
    let deleted_blobs = std::mem::take(&mut repo.stale_blobs);
    let deleted_bytes = std::mem::take(&mut repo.stale_bytes);
    info!(%repository, deleted_blobs, deleted_bytes, "repository cleaned up");
    Ok(Json(json!({ "results": { "deleted_bytes": deleted_bytes, "deleted_blobs": deleted_blobs } })))
}

async fn create_snapshot(
    State(db): State<Db>,
    Path((repository, snapshot)): Path<(String, String)>,
    body: Bytes,
) -> Reply {
    let input: CreateSnapshot = parse_body(&body)?;
    let mut cluster = db.write().await;
    let indices = match input.indices.as_deref() {
        Some(expression) => resolve(&cluster, expression, false)?,
        None => cluster.indices.keys().cloned().collect(),
    };
    let repo = cluster
        .repositories
        .get_mut(&repository)
        .ok_or_else(|| Failure::repository_missing(&repository))?;
    if repo.snapshots.contains_key(&snapshot) {
        return Err(Failure::new(
            StatusCode::BAD_REQUEST,
            "invalid_snapshot_name_exception",
            format!("[{repository}:{snapshot}] Invalid snapshot name [{snapshot}], snapshot with the same name already exists"),
        ));
    }
    info!(%repository, %snapshot, indices = indices.len(), "snapshot taken");
    repo.snapshots.insert(
        snapshot,
        Snapshot {
            uuid: Uuid::new_v4(),
            indices,
        },
    );
    Ok(Json(json!({ "accepted": true })))
}

async fn delete_snapshot(State(db): State<Db>, Path((repository, snapshot)): Path<(String, String)>) -> Reply {
    let mut cluster = db.write().await;
    let repo = cluster
        .repositories
        .get_mut(&repository)
        .ok_or_else(|| Failure::repository_missing(&repository))?;
    let removed = repo
        .snapshots
        .remove(&snapshot)
        .ok_or_else(|| Failure::snapshot_missing(&repository, &snapshot))?;
    // Deleted snapshot files stay in the repository until cleanup.
    let files = removed.indices.len() as u64 * FILES_PER_INDEX;
    repo.stale_blobs += files;
    repo.stale_bytes += files * BYTES_PER_FILE;
    Ok(Json(json!({ "acknowledged": true })))
}

/// Snapshots complete immediately, so nothing is ever in progress.
async fn all_snapshot_status() -> Json<Value> {
    Json(json!({ "snapshots": [] }))
}

async fn repository_status(State(db): State<Db>, Path(repository): Path<String>) -> Reply {
    let cluster = db.read().await;
    if !cluster.repositories.contains_key(&repository) {
        return Err(Failure::repository_missing(&repository));
    }
    Ok(Json(json!({ "snapshots": [] })))
}

async fn snapshot_status(
    State(db): State<Db>,
    Path((repository, snapshots)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let cluster = db.read().await;
    let repo = cluster
        .repositories
        .get(&repository)
        .ok_or_else(|| Failure::repository_missing(&repository))?;
    let ignore_unavailable = flag(&params, "ignore_unavailable");
    let mut statuses = Vec::new();
    for name in snapshots.split(',') {
        let Some(snapshot) = repo.snapshots.get(name) else {
            if ignore_unavailable {
                continue;
            }
            return Err(Failure::snapshot_missing(&repository, name));
        };
        let count = snapshot.indices.len() as u64;
        let indices: Map<String, Value> = snapshot
            .indices
            .iter()
            .map(|index| {
                let stats = json!({ "shards_stats": stage_counts(1), "stats": snapshot_stats(1) });
                (index.clone(), stats)
            })
            .collect();
        statuses.push(json!({
            "snapshot": name,
            "repository": repository,
            "uuid": snapshot.uuid.to_string(),
            "state": "SUCCESS",
            "include_global_state": true,
            "shards_stats": stage_counts(count),
            "stats": snapshot_stats(count),
            "indices": indices,
        }));
    }
    Ok(Json(json!({ "snapshots": statuses })))
}

async fn create_index(State(db): State<Db>, Path(index): Path<String>, body: Bytes) -> Reply {
    let input: CreateIndex = parse_body(&body)?;
    let mut cluster = db.write().await;
    if cluster.indices.contains_key(&index) {
        return Err(Failure::index_exists(&index));
    }
    cluster.indices.insert(index.clone(), Index::new(input.settings, input.aliases));
    info!(%index, "index created");
    Ok(Json(json!({ "acknowledged": true, "shards_acknowledged": true, "index": index })))
}

async fn get_index(State(db): State<Db>, Path(index): Path<String>) -> Reply {
    let cluster = db.read().await;
    let found = cluster.indices.get(&index).ok_or_else(|| Failure::index_not_found(&index))?;
    let mut settings = found.settings.clone();
    settings.insert("index.uuid".to_string(), Value::from(found.uuid.to_string()));
    let state = if found.open { "open" } else { "close" };
    Ok(Json(json!({
        index: { "aliases": found.aliases, "settings": settings, "state": state }
    })))
}

async fn close_index(
    State(db): State<Db>,
    Path(expression): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let mut cluster = db.write().await;
    let names = resolve(&cluster, &expression, flag(&params, "ignore_unavailable"))?;
    let mut closed = Map::new();
    for name in names {
        if let Some(index) = cluster.indices.get_mut(&name) {
            index.open = false;
        }
        closed.insert(name, json!({ "closed": true }));
    }
    info!(%expression, count = closed.len(), "indices closed");
    Ok(Json(json!({ "acknowledged": true, "shards_acknowledged": true, "indices": closed })))
}

async fn open_index(
    State(db): State<Db>,
    Path(expression): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let mut cluster = db.write().await;
    let names = resolve(&cluster, &expression, flag(&params, "ignore_unavailable"))?;
    for name in &names {
        if let Some(index) = cluster.indices.get_mut(name) {
            index.open = true;
        }
    }
    info!(%expression, count = names.len(), "indices opened");
    Ok(Json(json!({ "acknowledged": true, "shards_acknowledged": true })))
}

async fn clone_index(State(db): State<Db>, Path((source, target)): Path<(String, String)>, body: Bytes) -> Reply {
    let input: CreateIndex = parse_body(&body)?;
    let mut cluster = db.write().await;
    let mut clone = cluster
        .indices
        .get(&source)
        .cloned()
        .ok_or_else(|| Failure::index_not_found(&source))?;
    if cluster.indices.contains_key(&target) {
        return Err(Failure::index_exists(&target));
    }
    clone.uuid = Uuid::new_v4();
    clone.open = true;
    clone.settings.extend(input.settings);
    clone.aliases = input.aliases;
    cluster.indices.insert(target.clone(), clone);
    info!(%source, %target, "index cloned");
    Ok(Json(json!({ "acknowledged": true, "shards_acknowledged": true, "index": target })))
}

/// One primary shard per open index; an explicitly named closed index fails.
fn touch_shards(cluster: &Cluster, expression: Option<&str>, ignore_unavailable: bool) -> Result<usize, Failure> {
    let Some(expression) = expression else {
        return Ok(cluster.indices.values().filter(|i| i.open).count());
    };
    let names = resolve(cluster, expression, ignore_unavailable)?;
    let mut count = 0;
    for name in &names {
        match cluster.indices.get(name) {
            Some(index) if index.open => count += 1,
            Some(_) if !expression.contains('*') && expression != "_all" => {
                return Err(Failure::index_closed(name));
            }
            _ => {}
        }
    }
    Ok(count)
}

async fn flush_all(State(db): State<Db>) -> Reply {
    let cluster = db.read().await;
    Ok(Json(shards(touch_shards(&cluster, None, false)?)))
}

async fn flush_indices(
    State(db): State<Db>,
    Path(expression): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let cluster = db.read().await;
    let count = touch_shards(&cluster, Some(&expression), flag(&params, "ignore_unavailable"))?;
    Ok(Json(shards(count)))
}

async fn refresh_all(State(db): State<Db>) -> Reply {
    let cluster = db.read().await;
    Ok(Json(shards(touch_shards(&cluster, None, false)?)))
}

async fn refresh_indices(
    State(db): State<Db>,
    Path(expression): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    let cluster = db.read().await;
    let count = touch_shards(&cluster, Some(&expression), flag(&params, "ignore_unavailable"))?;
    Ok(Json(shards(count)))
}

async fn deploy_model(State(db): State<Db>, Path(model_id): Path<String>) -> Json<Value> {
    let mut cluster = db.write().await;
    cluster
        .models
        .insert(model_id.clone(), NODES.iter().map(|n| n.to_string()).collect());
    info!(%model_id, "model deployed");
    Json(json!({ "task_id": Uuid::new_v4().to_string(), "task_type": "DEPLOY_MODEL", "status": "COMPLETED" }))
}

async fn undeploy_model(State(db): State<Db>, Path(model_id): Path<String>, body: Bytes) -> Reply {
    let input: Undeploy = parse_body(&body)?;
    let mut cluster = db.write().await;
    let deployed = cluster.models.get_mut(&model_id).ok_or_else(|| {
        Failure::new(
            StatusCode::NOT_FOUND,
            "resource_not_found_exception",
            format!("Failed to find model with id {model_id}"),
        )
    })?;
    let targets = input.node_ids.unwrap_or_else(|| deployed.clone());
    let mut nodes = Map::new();
    for node in targets {
        if let Some(pos) = deployed.iter().position(|n| *n == node) {
            deployed.remove(pos);
            nodes.insert(node, json!({ "stats": { model_id.clone(): "undeployed" } }));
        }
    }
    info!(%model_id, nodes = nodes.len(), "model undeployed");
    Ok(Json(Value::Object(nodes)))
}
