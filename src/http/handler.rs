//! HTTP handlers for the ArangoDB-compatible document API
//!
//! Responses follow the ArangoDB envelope: successful answers carry
//! `"error": false` and the HTTP code, failures carry `errorNum` and
//! `errorMessage`.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::store::{Collection, DatabaseUser, DocumentStore, StoreError, SYSTEM_DATABASE};

const DEFAULT_BATCH_SIZE: usize = 1000;
const COLLECTION_TYPE_DOCUMENT: u8 = 2;
const COLLECTION_STATUS_LOADED: u8 = 3;

/// Idle time after which an unfinished cursor is dropped
const DEFAULT_CURSOR_TTL: Duration = Duration::from_secs(30);
/// Unfinished cursors kept at most; the oldest is dropped first
pub(super) const MAX_PENDING_CURSORS: usize = 256;

/// Shared state of the HTTP API
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<DocumentStore>>,
    pub(super) cursors: Arc<Mutex<CursorRegistry>>,
}

impl AppState {
    pub fn new(store: Arc<RwLock<DocumentStore>>) -> Self {
        Self {
            store,
            cursors: Arc::new(Mutex::new(CursorRegistry::default())),
        }
    }
}

/// Rows of a cursor that did not fit in the batches fetched so far
pub(super) struct PendingCursor {
    rows: VecDeque<Value>,
    batch_size: usize,
    ttl: Duration,
    expires_at: Instant,
}

/// Unfinished cursors, oldest first
#[derive(Default)]
pub(super) struct CursorRegistry {
    next_id: u64,
    pub(super) pending: IndexMap<String, PendingCursor>,
}

impl CursorRegistry {
    fn register(&mut self, rows: VecDeque<Value>, batch_size: usize, ttl: Duration) -> String {
        self.purge_expired(Instant::now());
        while self.pending.len() >= MAX_PENDING_CURSORS {
            if let Some((id, _)) = self.pending.shift_remove_index(0) {
                debug!("dropping cursor {} to make room", id);
            }
        }

        self.next_id += 1;
        let id = self.next_id.to_string();
        let cursor = PendingCursor {
            rows,
            batch_size,
            ttl,
            expires_at: Instant::now() + ttl,
        };
        self.pending.insert(id.clone(), cursor);
        id
    }

    fn purge_expired(&mut self, now: Instant) {
        self.pending.retain(|_, cursor| cursor.expires_at > now);
    }

    /// Next batch of a live cursor and whether rows remain after it
    fn next_batch(&mut self, id: &str) -> Option<(Vec<Value>, bool)> {
        let now = Instant::now();
        self.purge_expired(now);
        let cursor = self.pending.get_mut(id)?;

        let take = cursor.batch_size.min(cursor.rows.len());
        let batch: Vec<Value> = cursor.rows.drain(..take).collect();
        let has_more = !cursor.rows.is_empty();
        if has_more {
            cursor.expires_at = now + cursor.ttl;
        } else {
            self.pending.shift_remove(id);
        }
        Some((batch, has_more))
    }

    fn remove(&mut self, id: &str) -> bool {
        self.purge_expired(Instant::now());
        self.pending.shift_remove(id).is_some()
    }
}

fn cursor_not_found(id: &str) -> ApiError {
    ApiError::new(
        StatusCode::NOT_FOUND,
        1600,
        format!("cursor not found: {}", id),
    )
}

/// Error answer in the ArangoDB envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error_num: u32,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, error_num: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            error_num,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::DuplicateName(_) | StoreError::DuplicateKey { .. } => StatusCode::CONFLICT,
            StoreError::DatabaseNotFound(_) | StoreError::CollectionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            StoreError::InvalidName(_) | StoreError::InvalidKey(_) | StoreError::InvalidDocument => {
                StatusCode::BAD_REQUEST
            }
        };
        Self::new(status, err.error_num(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": true,
            "code": self.status.as_u16(),
            "errorNum": self.error_num,
            "errorMessage": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult = Result<(StatusCode, Json<Value>), ApiError>;

fn ok(status: StatusCode, mut body: Map<String, Value>) -> ApiResult {
    body.insert("error".to_string(), Value::Bool(false));
    body.insert("code".to_string(), json!(status.as_u16()));
    Ok((status, Json(Value::Object(body))))
}

fn collection_info(collection: &Collection) -> Map<String, Value> {
    let mut info = Map::new();
    info.insert("name".to_string(), json!(collection.name()));
    info.insert("isSystem".to_string(), json!(collection.is_system()));
    info.insert("type".to_string(), json!(COLLECTION_TYPE_DOCUMENT));
    info.insert("status".to_string(), json!(COLLECTION_STATUS_LOADED));
    info
}

/// Handler for server version
pub async fn version_handler() -> Json<Value> {
    Json(json!({
        "server": "project-graph",
        "version": crate::VERSION,
        "license": "community",
    }))
}

/// List databases; only available through `_system`
pub async fn list_databases_handler(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> ApiResult {
    if db != SYSTEM_DATABASE {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            1230,
            "operation only allowed in system database",
        ));
    }
    let store = state.store.read().await;
    let mut body = Map::new();
    body.insert("result".to_string(), json!(store.database_names()));
    ok(StatusCode::OK, body)
}

#[derive(Deserialize)]
pub struct CreateDatabaseRequest {
    pub name: String,
    #[serde(default)]
    pub users: Vec<DatabaseUser>,
}

/// Create a database; only available through `_system`
pub async fn create_database_handler(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Json(request): Json<CreateDatabaseRequest>,
) -> ApiResult {
    if db != SYSTEM_DATABASE {
        return Err(ApiError::new(
            StatusCode::FORBIDDEN,
            1230,
            "operation only allowed in system database",
        ));
    }
    let mut store = state.store.write().await;
    store.create_database(&request.name, request.users)?;
    debug!("created database {}", request.name);

    let mut body = Map::new();
    body.insert("result".to_string(), Value::Bool(true));
    ok(StatusCode::CREATED, body)
}

#[derive(Deserialize)]
pub struct ListCollectionsParams {
    #[serde(rename = "excludeSystem", default)]
    pub exclude_system: bool,
}

/// List collections of a database
pub async fn list_collections_handler(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Query(params): Query<ListCollectionsParams>,
) -> ApiResult {
    let store = state.store.read().await;
    let database = store.database(&db)?;
    let result: Vec<Value> = database
        .collections()
        .filter(|c| !(params.exclude_system && c.is_system()))
        .map(|c| Value::Object(collection_info(c)))
        .collect();

    let mut body = Map::new();
    body.insert("result".to_string(), Value::Array(result));
    ok(StatusCode::OK, body)
}

#[derive(Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

/// Create a document collection
pub async fn create_collection_handler(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Json(request): Json<CreateCollectionRequest>,
) -> ApiResult {
    let mut store = state.store.write().await;
    let collection = store.database_mut(&db)?.create_collection(&request.name)?;
    debug!("created collection {}/{}", db, request.name);
    ok(StatusCode::OK, collection_info(collection))
}

/// Describe one collection
pub async fn get_collection_handler(
    State(state): State<AppState>,
    Path((db, name)): Path<(String, String)>,
) -> ApiResult {
    let store = state.store.read().await;
    let collection = store.database(&db)?.collection(&name)?;
    ok(StatusCode::OK, collection_info(collection))
}

/// Remove all documents of a collection
pub async fn truncate_collection_handler(
    State(state): State<AppState>,
    Path((db, name)): Path<(String, String)>,
) -> ApiResult {
    let mut store = state.store.write().await;
    let collection = store.database_mut(&db)?.collection_mut(&name)?;
    let removed = collection.truncate();
    debug!("truncated {}/{} ({} documents)", db, name, removed);
    ok(StatusCode::OK, collection_info(collection))
}

/// Number of documents in a collection
pub async fn count_collection_handler(
    State(state): State<AppState>,
    Path((db, name)): Path<(String, String)>,
) -> ApiResult {
    let store = state.store.read().await;
    let collection = store.database(&db)?.collection(&name)?;
    let mut body = collection_info(collection);
    body.insert("count".to_string(), json!(collection.count()));
    ok(StatusCode::OK, body)
}

/// Insert one document
pub async fn insert_document_handler(
    State(state): State<AppState>,
    Path((db, name)): Path<(String, String)>,
    Json(document): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let mut store = state.store.write().await;
    let collection = store.database_mut(&db)?.collection_mut(&name)?;
    let stored = collection.insert(document)?;
    Ok((StatusCode::ACCEPTED, Json(stored.meta_json())))
}

#[derive(Deserialize)]
pub struct CursorRequest {
    pub query: String,
    #[serde(rename = "bindVars", default)]
    pub bind_vars: Map<String, Value>,
    #[serde(rename = "batchSize")]
    pub batch_size: Option<usize>,
    /// Seconds an unfinished cursor may stay idle
    pub ttl: Option<f64>,
}

/// Run a query
///
/// Only full collection scans are understood: the collection comes from the
/// `@collection` bind parameter and an optional `limit` bind parameter caps
/// the number of rows.
pub async fn create_cursor_handler(
    State(state): State<AppState>,
    Path(db): Path<String>,
    Json(request): Json<CursorRequest>,
) -> ApiResult {
    if !request.query.trim_start().to_uppercase().starts_with("FOR ") {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            1501,
            format!("unsupported query: {}", request.query),
        ));
    }
    let Some(name) = request.bind_vars.get("@collection").and_then(Value::as_str) else {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            1551,
            "bind parameter '@collection' is missing",
        ));
    };
    let limit = request
        .bind_vars
        .get("limit")
        .and_then(Value::as_u64)
        .map(|l| l as usize);

    let mut rows: VecDeque<Value> = {
        let store = state.store.read().await;
        let collection = store.database(&db)?.collection(name)?;
        collection
            .documents()
            .take(limit.unwrap_or(usize::MAX))
            .map(|d| d.to_json())
            .collect()
    };

    let count = rows.len();
    let batch_size = request.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1);
    let ttl = request
        .ttl
        .filter(|t| t.is_finite() && *t > 0.0)
        .map_or(DEFAULT_CURSOR_TTL, Duration::from_secs_f64);
    let first: Vec<Value> = rows.drain(..batch_size.min(rows.len())).collect();

    let mut body = Map::new();
    body.insert("result".to_string(), Value::Array(first));
    body.insert("count".to_string(), json!(count));
    if rows.is_empty() {
        body.insert("hasMore".to_string(), Value::Bool(false));
    } else {
        let id = state.cursors.lock().await.register(rows, batch_size, ttl);
        body.insert("hasMore".to_string(), Value::Bool(true));
        body.insert("id".to_string(), Value::String(id));
    }
    ok(StatusCode::CREATED, body)
}

/// Fetch the next batch of a cursor
pub async fn next_batch_handler(
    State(state): State<AppState>,
    Path((_db, id)): Path<(String, String)>,
) -> ApiResult {
    let Some((batch, has_more)) = state.cursors.lock().await.next_batch(&id) else {
        return Err(cursor_not_found(&id));
    };

    let mut body = Map::new();
    body.insert("result".to_string(), Value::Array(batch));
    body.insert("hasMore".to_string(), Value::Bool(has_more));
    if has_more {
        body.insert("id".to_string(), Value::String(id));
    }
    ok(StatusCode::OK, body)
}

/// Drop an unfinished cursor
pub async fn delete_cursor_handler(
    State(state): State<AppState>,
    Path((_db, id)): Path<(String, String)>,
) -> ApiResult {
    if !state.cursors.lock().await.remove(&id) {
        return Err(cursor_not_found(&id));
    }
    let mut body = Map::new();
    body.insert("id".to_string(), Value::String(id));
    ok(StatusCode::ACCEPTED, body)
}
