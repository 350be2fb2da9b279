//! ArangoDB-compatible HTTP facade over the in-memory store
//!
//! Serves the document API subset used by the seeder: version, databases,
//! collections, truncate, count, document insert and collection-scan
//! cursors. Unfinished cursors expire after an idle TTL and can be deleted.
//! There is no authentication.

pub mod handler;
pub mod server;

pub use handler::AppState;
pub use server::{router, router_with_state, HttpServer};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DocumentStore;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    async fn call(
        store: &Arc<RwLock<DocumentStore>>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = router(Arc::clone(store)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn new_store() -> Arc<RwLock<DocumentStore>> {
        Arc::new(RwLock::new(DocumentStore::new()))
    }

    #[tokio::test]
    async fn test_version() {
        let store = new_store();
        let (status, body) = call(&store, Method::GET, "/_api/version", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["server"], "project-graph");
    }

    #[tokio::test]
    async fn test_create_database_conflict() {
        let store = new_store();
        let request = json!({"name": "project_graph", "users": [{"username": "root", "passwd": "pw"}]});

        let (status, body) = call(&store, Method::POST, "/_db/_system/_api/database", Some(request.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["result"], true);

        let (status, body) = call(&store, Method::POST, "/_db/_system/_api/database", Some(request)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errorNum"], 1207);
        assert_eq!(body["error"], true);

        let (_, body) = call(&store, Method::GET, "/_db/_system/_api/database", None).await;
        assert_eq!(body["result"], json!(["_system", "project_graph"]));
    }

    #[tokio::test]
    async fn test_database_api_requires_system_database() {
        let store = new_store();
        store.write().await.create_database("other", Vec::new()).unwrap();
        let (status, body) = call(&store, Method::GET, "/_db/other/_api/database", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["errorNum"], 1230);
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let store = new_store();
        store.write().await.create_database("project_graph", Vec::new()).unwrap();

        let (status, _) = call(&store, Method::GET, "/_db/project_graph/_api/collection/teams", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = call(
            &store,
            Method::POST,
            "/_db/project_graph/_api/collection",
            Some(json!({"name": "teams", "type": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "teams");
        assert_eq!(body["isSystem"], false);

        let (status, body) = call(
            &store,
            Method::POST,
            "/_db/project_graph/_api/document/teams",
            Some(json!({"_key": "team-dev", "name": "Development Team"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["_id"], "teams/team-dev");

        let (status, body) = call(
            &store,
            Method::POST,
            "/_db/project_graph/_api/document/teams",
            Some(json!({"_key": "team-dev"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["errorNum"], 1210);

        let (_, body) = call(&store, Method::GET, "/_db/project_graph/_api/collection/teams/count", None).await;
        assert_eq!(body["count"], 1);

        let (status, _) = call(&store, Method::PUT, "/_db/project_graph/_api/collection/teams/truncate", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(&store, Method::GET, "/_db/project_graph/_api/collection/teams/count", None).await;
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_unknown_database() {
        let store = new_store();
        let (status, body) = call(&store, Method::GET, "/_db/missing/_api/collection", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errorNum"], 1228);
    }

    #[tokio::test]
    async fn test_cursor_batches() {
        let store = new_store();
        {
            let mut guard = store.write().await;
            let tasks = guard
                .create_database("project_graph", Vec::new())
                .unwrap()
                .create_collection("tasks")
                .unwrap();
            for i in 0..5 {
                tasks.insert(json!({"_key": format!("task-{i}")})).unwrap();
            }
        }

        let query = json!({
            "query": "FOR doc IN @@collection RETURN doc",
            "bindVars": {"@collection": "tasks"},
            "batchSize": 2,
        });
        let (status, body) = call(&store, Method::POST, "/_db/project_graph/_api/cursor", Some(query)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["count"], 5);
        assert_eq!(body["hasMore"], true);
        assert_eq!(body["result"][0]["_key"], "task-0");
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_cursor_with_limit_and_paging() {
        let store = new_store();
        {
            let mut guard = store.write().await;
            let members = guard
                .create_database("project_graph", Vec::new())
                .unwrap()
                .create_collection("members")
                .unwrap();
            for i in 0..5 {
                members.insert(json!({"_key": format!("m{i}")})).unwrap();
            }
        }

        let app = router(Arc::clone(&store));
        let send = |method: Method, uri: String, body: Value| {
            let app = app.clone();
            async move {
                let request = Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap();
                let response = app.oneshot(request).await.unwrap();
                let bytes = response.into_body().collect().await.unwrap().to_bytes();
                serde_json::from_slice::<Value>(&bytes).unwrap()
            }
        };

        let first = send(
            Method::POST,
            "/_db/project_graph/_api/cursor".to_string(),
            json!({
                "query": "FOR doc IN @@collection LIMIT @limit RETURN doc",
                "bindVars": {"@collection": "members", "limit": 3},
                "batchSize": 2,
            }),
        )
        .await;
        assert_eq!(first["count"], 3);
        assert_eq!(first["result"].as_array().unwrap().len(), 2);
        let id = first["id"].as_str().unwrap().to_string();

        let next = send(
            Method::PUT,
            format!("/_db/project_graph/_api/cursor/{id}"),
            json!({}),
        )
        .await;
        assert_eq!(next["hasMore"], false);
        assert_eq!(next["result"], json!([{"_key": "m2", "_id": "members/m2", "_rev": "_00000003"}]));

        let gone = send(
            Method::PUT,
            format!("/_db/project_graph/_api/cursor/{id}"),
            json!({}),
        )
        .await;
        assert_eq!(gone["errorNum"], 1600);
    }

    fn store_with_members(count: usize) -> Arc<RwLock<DocumentStore>> {
        let mut store = DocumentStore::new();
        let members = store
            .create_database("project_graph", Vec::new())
            .unwrap()
            .create_collection("members")
            .unwrap();
        for i in 0..count {
            members.insert(json!({"_key": format!("m{i}")})).unwrap();
        }
        Arc::new(RwLock::new(store))
    }

    async fn send(app: &axum::Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn scan(batch_size: usize, ttl: Option<f64>) -> Value {
        let mut request = json!({
            "query": "FOR doc IN @@collection RETURN doc",
            "bindVars": {"@collection": "members"},
            "batchSize": batch_size,
        });
        if let Some(ttl) = ttl {
            request["ttl"] = json!(ttl);
        }
        request
    }

    #[tokio::test]
    async fn test_abandoned_cursors_are_bounded() {
        let state = AppState::new(store_with_members(3));
        let app = router_with_state(state.clone());

        let mut last_id = String::new();
        for _ in 0..1000 {
            let (status, body) =
                send(&app, Method::POST, "/_db/project_graph/_api/cursor", scan(1, None)).await;
            assert_eq!(status, StatusCode::CREATED);
            last_id = body["id"].as_str().unwrap().to_string();
        }

        let pending = state.cursors.lock().await.pending.len();
        assert_eq!(pending, handler::MAX_PENDING_CURSORS);

        // The newest cursor survives eviction; the first one does not.
        let uri = format!("/_db/project_graph/_api/cursor/{last_id}");
        let (status, body) = send(&app, Method::PUT, &uri, json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["hasMore"], true);
        let (status, body) = send(&app, Method::PUT, "/_db/project_graph/_api/cursor/1", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errorNum"], 1600);
    }

    #[tokio::test]
    async fn test_idle_cursor_expires() {
        let state = AppState::new(store_with_members(3));
        let app = router_with_state(state.clone());

        let (_, body) =
            send(&app, Method::POST, "/_db/project_graph/_api/cursor", scan(1, Some(0.05))).await;
        let id = body["id"].as_str().unwrap().to_string();

        tokio::time::sleep(std::time::Duration::from_millis(150)).await;

        let uri = format!("/_db/project_graph/_api/cursor/{id}");
        let (status, body) = send(&app, Method::PUT, &uri, json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errorNum"], 1600);
        assert_eq!(state.cursors.lock().await.pending.len(), 0);
    }

    #[tokio::test]
    async fn test_delete_cursor() {
        let state = AppState::new(store_with_members(3));
        let app = router_with_state(state.clone());

        let (_, body) =
            send(&app, Method::POST, "/_db/project_graph/_api/cursor", scan(1, None)).await;
        let id = body["id"].as_str().unwrap().to_string();
        let uri = format!("/_db/project_graph/_api/cursor/{id}");

        let (status, body) = send(&app, Method::DELETE, &uri, json!({})).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["id"], id);
        assert_eq!(state.cursors.lock().await.pending.len(), 0);

        let (status, body) = send(&app, Method::PUT, &uri, json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errorNum"], 1600);

        let (status, _) = send(&app, Method::DELETE, &uri, json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cursor_requires_collection_bind_parameter() {
        let store = new_store();
        let (status, body) = call(
            &store,
            Method::POST,
            "/_db/_system/_api/cursor",
            Some(json!({"query": "FOR doc IN teams RETURN doc"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorNum"], 1551);
    }
}
