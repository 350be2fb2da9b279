//! HTTP server exposing the in-memory store through the ArangoDB document API

use axum::{
    routing::{get, post, put},
    Router,
};
use crate::store::DocumentStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;
use super::handler::{
    count_collection_handler, create_collection_handler, create_cursor_handler,
    create_database_handler, delete_cursor_handler, get_collection_handler, insert_document_handler,
    list_collections_handler, list_databases_handler, next_batch_handler,
    truncate_collection_handler, version_handler, AppState,
};

/// Build the API router over a shared store
pub fn router(store: Arc<RwLock<DocumentStore>>) -> Router {
    router_with_state(AppState::new(store))
}

/// Build the API router over existing state
pub fn router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/_api/version", get(version_handler))
        .route("/_db/:db/_api/version", get(version_handler))
        .route(
            "/_db/:db/_api/database",
            get(list_databases_handler).post(create_database_handler),
        )
        .route(
            "/_db/:db/_api/collection",
            get(list_collections_handler).post(create_collection_handler),
        )
        .route("/_db/:db/_api/collection/:name", get(get_collection_handler))
        .route(
            "/_db/:db/_api/collection/:name/truncate",
            put(truncate_collection_handler),
        )
        .route(
            "/_db/:db/_api/collection/:name/count",
            get(count_collection_handler),
        )
        .route("/_db/:db/_api/document/:name", post(insert_document_handler))
        .route("/_db/:db/_api/cursor", post(create_cursor_handler))
        .route(
            "/_db/:db/_api/cursor/:id",
            put(next_batch_handler).delete(delete_cursor_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP server for local development and tests
pub struct HttpServer {
    store: Arc<RwLock<DocumentStore>>,
    port: u16,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(store: Arc<RwLock<DocumentStore>>, port: u16) -> Self {
        Self { store, port }
    }

    /// Bind to all interfaces on the configured port and serve forever
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr).await?;
        self.serve(listener).await?;
        Ok(())
    }

    /// Serve on an already bound listener
    pub async fn serve(&self, listener: TcpListener) -> std::io::Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!("Document API available at http://{}", addr);
        }
        axum::serve(listener, router(Arc::clone(&self.store))).await
    }
}
