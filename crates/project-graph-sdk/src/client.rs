//! DocumentClient trait: the unified interface for embedded and remote modes

use async_trait::async_trait;
use project_graph::DatabaseUser;
use serde_json::Value;

use crate::error::SdkResult;
use crate::models::{CollectionInfo, DocumentMeta, ServerVersion};

/// Unified client interface for a graph-oriented document database.
///
/// Implemented by:
/// - `EmbeddedClient`: in-process store, no network (for tests and offline use)
/// - `RemoteClient`: ArangoDB HTTP API
///
/// Creation methods are atomic: creating a database or collection that
/// already exists fails with [`SdkError::DuplicateName`](crate::SdkError::DuplicateName)
/// instead of racing a separate existence check.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Server identification
    async fn version(&self) -> SdkResult<ServerVersion>;

    /// Names of all databases
    async fn list_databases(&self) -> SdkResult<Vec<String>>;

    /// Create a database with its initial users
    async fn create_database(&self, name: &str, users: &[DatabaseUser]) -> SdkResult<()>;

    /// Non-system collections of a database
    async fn list_collections(&self, database: &str) -> SdkResult<Vec<CollectionInfo>>;

    /// Whether a collection exists
    async fn collection_exists(&self, database: &str, name: &str) -> SdkResult<bool>;

    /// Create a document collection
    async fn create_collection(&self, database: &str, name: &str) -> SdkResult<()>;

    /// Remove all documents of a collection, keeping the collection
    async fn truncate_collection(&self, database: &str, name: &str) -> SdkResult<()>;

    /// Number of documents in a collection
    async fn count_documents(&self, database: &str, name: &str) -> SdkResult<u64>;

    /// Insert one document; its `_key` must be unused
    async fn insert_document(
        &self,
        database: &str,
        collection: &str,
        document: &Value,
    ) -> SdkResult<DocumentMeta>;

    /// Read documents of a collection, at most `limit` when given
    async fn read_documents(
        &self,
        database: &str,
        collection: &str,
        limit: Option<usize>,
    ) -> SdkResult<Vec<Value>>;
}
