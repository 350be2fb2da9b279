//! Error types for the project graph SDK

use project_graph::{DatasetError, StoreError};
use thiserror::Error;

/// Errors that can occur when talking to a document database
#[derive(Error, Debug)]
pub enum SdkError {
    /// Server unreachable (remote mode)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Credentials rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A database or collection with that name already exists
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// A document with that key already exists in the collection
    #[error("Duplicate key {key} in collection {collection}")]
    DuplicateKey { collection: String, key: String },

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Any other error answer of the server
    #[error("Server error {code} ({error_num}): {message}")]
    ServerError {
        code: u16,
        error_num: u32,
        message: String,
    },

    /// Request rejected by the embedded store
    #[error("Store error: {0}")]
    StoreError(StoreError),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<StoreError> for SdkError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateName(name) => SdkError::DuplicateName(name),
            StoreError::DuplicateKey { collection, key } => SdkError::DuplicateKey { collection, key },
            StoreError::DatabaseNotFound(name) => SdkError::DatabaseNotFound(name),
            StoreError::CollectionNotFound(name) => SdkError::CollectionNotFound(name),
            other => SdkError::StoreError(other),
        }
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

/// Errors that abort a seeding run, tagged with the failing step
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Failed to ensure database {database}: {source}")]
    Database {
        database: String,
        #[source]
        source: SdkError,
    },

    #[error("Failed to prepare collection {collection}: {source}")]
    Collection {
        collection: String,
        #[source]
        source: SdkError,
    },

    #[error("Failed to insert {collection}/{key}: {source}")]
    Insert {
        collection: String,
        key: String,
        #[source]
        source: SdkError,
    },

    #[error("Invalid seed data: {0}")]
    Dataset(#[from] DatasetError),
}

pub type SeedResult<T> = Result<T, SeedError>;
