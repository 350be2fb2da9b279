//! RemoteClient against the HTTP facade of the in-memory store

use std::sync::Arc;

use project_graph::{DocumentStore, HttpServer};
use axum::http::StatusCode;
use axum::{Json, Router};
use project_graph_sdk::{
    load_collections, verify, DatabaseUser, Dataset, DocumentClient, EmbeddedClient, RemoteClient, SdkError,
    SeedError, Seeder, COLLECTIONS, DEFAULT_PAGE_SIZE,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

const DATABASE: &str = "project_graph";

/// Start a server on an ephemeral port and return a client for it
async fn start_server() -> (RemoteClient, Arc<RwLock<DocumentStore>>) {
    let store = Arc::new(RwLock::new(DocumentStore::new()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(Arc::clone(&store), addr.port());
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });

    let client = RemoteClient::new(&format!("http://{}", addr)).with_credentials("root", "");
    (client, store)
}

#[tokio::test]
async fn test_version() {
    let (client, _) = start_server().await;
    let version = client.version().await.unwrap();
    assert_eq!(version.server, "project-graph");
    assert_eq!(version.version, project_graph::VERSION);
}

#[tokio::test]
async fn test_seed_over_http() {
    let (client, store) = start_server().await;

    let report = Seeder::new(&client, DATABASE, DatabaseUser::new("root", "arango2rdb"))
        .run()
        .await
        .unwrap();
    assert!(report.database_created);
    assert_eq!(report.inserted(), 20);

    let mut counts = Vec::new();
    for name in COLLECTIONS {
        counts.push(client.count_documents(DATABASE, name).await.unwrap());
    }
    assert_eq!(counts, vec![2, 4, 2, 2, 4, 4, 2]);

    let report = verify(&client, DATABASE, &Dataset::sample()).await.unwrap();
    assert!(report.is_ok(), "{report:?}");

    assert_eq!(store.read().await.document_count(), 20);

    // The same store seen in-process holds what was sent over HTTP.
    let embedded = EmbeddedClient::with_store(store);
    let report = verify(&embedded, DATABASE, &Dataset::sample()).await.unwrap();
    assert!(report.is_ok(), "{report:?}");
}

#[tokio::test]
async fn test_second_run_over_http_is_idempotent() {
    let (client, _) = start_server().await;
    let seeder = Seeder::new(&client, DATABASE, DatabaseUser::new("root", "arango2rdb"));

    seeder.run().await.unwrap();
    client
        .insert_document(DATABASE, "tasks", &json!({"_key": "task-stale"}))
        .await
        .unwrap();

    let second = seeder.run().await.unwrap();
    assert!(!second.database_created);
    assert!(second.collections.iter().all(|c| !c.created));
    assert_eq!(second.removed(), 21);
    assert_eq!(client.count_documents(DATABASE, "tasks").await.unwrap(), 4);
}

#[tokio::test]
async fn test_typed_errors() {
    let (client, _) = start_server().await;

    client.create_database(DATABASE, &[]).await.unwrap();
    let err = client.create_database(DATABASE, &[]).await.unwrap_err();
    assert!(matches!(err, SdkError::DuplicateName(_)));

    let err = client.count_documents(DATABASE, "tasks").await.unwrap_err();
    assert!(matches!(err, SdkError::CollectionNotFound(_)));
    assert!(!client.collection_exists(DATABASE, "tasks").await.unwrap());

    let err = client.list_collections("missing").await.unwrap_err();
    assert!(matches!(err, SdkError::DatabaseNotFound(_)));

    client.create_collection(DATABASE, "teams").await.unwrap();
    let team = json!({"_key": "team-dev", "name": "Development Team"});
    client.insert_document(DATABASE, "teams", &team).await.unwrap();
    let err = client.insert_document(DATABASE, "teams", &team).await.unwrap_err();
    assert!(matches!(err, SdkError::DuplicateKey { ref key, .. } if key == "team-dev"));
}

#[tokio::test]
async fn test_read_documents_follows_cursor() {
    let (client, _) = start_server().await;
    client.create_database(DATABASE, &[]).await.unwrap();
    client.create_collection(DATABASE, "tasks").await.unwrap();
    for i in 0..1500 {
        client
            .insert_document(DATABASE, "tasks", &json!({"_key": format!("task-{i}")}))
            .await
            .unwrap();
    }

    let all = client.read_documents(DATABASE, "tasks", None).await.unwrap();
    assert_eq!(all.len(), 1500);
    assert_eq!(all[1499]["_key"], "task-1499");

    let some = client.read_documents(DATABASE, "tasks", Some(3)).await.unwrap();
    assert_eq!(some.len(), 3);
}

#[tokio::test]
async fn test_snapshots_over_http() {
    let (client, _) = start_server().await;
    Seeder::new(&client, DATABASE, DatabaseUser::new("root", "arango2rdb"))
        .run()
        .await
        .unwrap();

    let snapshots = load_collections(&client, DATABASE, Some("task"), DEFAULT_PAGE_SIZE)
        .await
        .unwrap();
    let names: Vec<&str> = snapshots.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["task_assignments", "tasks"]);
    assert_eq!(snapshots[1].total_count, 4);
    assert_eq!(&snapshots[1].columns[..3], &["_key", "_id", "_rev"]);
    assert!(!snapshots[1].has_more());
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = RemoteClient::new(&format!("http://{}", addr));
    let err = client.version().await.unwrap_err();
    assert!(matches!(err, SdkError::ConnectionError(_)));
}

/// Start a server that rejects every request with the given status
async fn start_rejecting_server(status: StatusCode, message: &'static str) -> RemoteClient {
    let app = Router::new().fallback(move || async move {
        let body = json!({
            "error": true,
            "code": status.as_u16(),
            "errorNum": 11,
            "errorMessage": message,
        });
        (status, Json(body))
    });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    RemoteClient::new(&format!("http://{}", addr)).with_credentials("root", "wrong")
}

#[tokio::test]
async fn test_rejected_credentials() {
    let message = "not authorized to execute this request";
    let client = start_rejecting_server(StatusCode::UNAUTHORIZED, message).await;

    let err = client.version().await.unwrap_err();
    assert!(matches!(err, SdkError::Unauthorized(ref m) if m == message), "{err}");

    let err = client.create_database(DATABASE, &[]).await.unwrap_err();
    assert!(matches!(err, SdkError::Unauthorized(ref m) if m == message), "{err}");
}

#[tokio::test]
async fn test_forbidden_aborts_seeding() {
    let message = "forbidden";
    let client = start_rejecting_server(StatusCode::FORBIDDEN, message).await;

    let err = Seeder::new(&client, DATABASE, DatabaseUser::new("root", "arango2rdb"))
        .run()
        .await
        .unwrap_err();
    match err {
        SeedError::Database { database, source } => {
            assert_eq!(database, DATABASE);
            assert!(matches!(source, SdkError::Unauthorized(ref m) if m == message));
        }
        other => panic!("unexpected error: {other}"),
    }
}
