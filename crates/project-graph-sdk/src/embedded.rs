//! EmbeddedClient: in-process document store client
//!
//! Uses DocumentStore directly, no network needed.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use project_graph::{DatabaseUser, DocumentStore};

use crate::client::DocumentClient;
use crate::error::SdkResult;
use crate::models::{CollectionInfo, DocumentMeta, ServerVersion};

/// In-process client that wraps a DocumentStore directly.
///
/// No network overhead; operations execute in the same process.
/// Ideal for tests and offline runs.
pub struct EmbeddedClient {
    pub(crate) store: Arc<RwLock<DocumentStore>>,
}

impl EmbeddedClient {
    /// Create a new EmbeddedClient with a fresh store
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(DocumentStore::new())),
        }
    }

    /// Create an EmbeddedClient wrapping an existing store
    pub fn with_store(store: Arc<RwLock<DocumentStore>>) -> Self {
        Self { store }
    }

    /// Acquire a read lock on the store.
    pub async fn store_read(&self) -> tokio::sync::RwLockReadGuard<'_, DocumentStore> {
        self.store.read().await
    }

    /// Acquire a write lock on the store.
    ///
    /// Use for direct mutation, e.g. planting stale documents in tests.
    pub async fn store_write(&self) -> tokio::sync::RwLockWriteGuard<'_, DocumentStore> {
        self.store.write().await
    }
}

impl Default for EmbeddedClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentClient for EmbeddedClient {
    async fn version(&self) -> SdkResult<ServerVersion> {
        Ok(ServerVersion {
            server: "project-graph-embedded".to_string(),
            version: project_graph::VERSION.to_string(),
            license: None,
        })
    }

    async fn list_databases(&self) -> SdkResult<Vec<String>> {
        let store = self.store.read().await;
        Ok(store.database_names().into_iter().map(String::from).collect())
    }

    async fn create_database(&self, name: &str, users: &[DatabaseUser]) -> SdkResult<()> {
        let mut store = self.store.write().await;
        store.create_database(name, users.to_vec())?;
        Ok(())
    }

    async fn list_collections(&self, database: &str) -> SdkResult<Vec<CollectionInfo>> {
        let store = self.store.read().await;
        Ok(store
            .database(database)?
            .collections()
            .filter(|c| !c.is_system())
            .map(|c| CollectionInfo {
                name: c.name().to_string(),
                is_system: false,
            })
            .collect())
    }

    async fn collection_exists(&self, database: &str, name: &str) -> SdkResult<bool> {
        let store = self.store.read().await;
        Ok(store.database(database)?.has_collection(name))
    }

    async fn create_collection(&self, database: &str, name: &str) -> SdkResult<()> {
        let mut store = self.store.write().await;
        store.database_mut(database)?.create_collection(name)?;
        Ok(())
    }

    async fn truncate_collection(&self, database: &str, name: &str) -> SdkResult<()> {
        let mut store = self.store.write().await;
        store.database_mut(database)?.collection_mut(name)?.truncate();
        Ok(())
    }

    async fn count_documents(&self, database: &str, name: &str) -> SdkResult<u64> {
        let store = self.store.read().await;
        Ok(store.database(database)?.collection(name)?.count() as u64)
    }

    async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> SdkResult<DocumentMeta> {
        let mut store = self.store.write().await;
        let stored = store
            .database_mut(database)?
            .collection_mut(collection)?
            .insert(document.clone())?;
        Ok(DocumentMeta {
            key: stored.key().to_string(),
            id: stored.id().to_string(),
            rev: stored.rev().to_string(),
        })
    }

    async fn read_documents(
        &self,
        database: &str,
        collection: &str,
        limit: Option<usize>,
    ) -> SdkResult<Vec<Value>> {
        let store = self.store.read().await;
        Ok(store
            .database(database)?
            .collection(collection)?
            .documents()
            .take(limit.unwrap_or(usize::MAX))
            .map(|d| d.to_json())
            .collect())
    }
}
