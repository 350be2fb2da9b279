//! In-memory document store
//!
//! Holds databases, each with its own collections. Mirrors the subset of
//! ArangoDB semantics the seeder relies on: databases and collections are
//! created atomically (a second create fails with a duplicate-name error),
//! truncation keeps the collection, and keys are unique per collection.

use indexmap::IndexMap;
use thiserror::Error;

use super::database::{Database, DatabaseUser};

/// Name of the database that always exists
pub const SYSTEM_DATABASE: &str = "_system";

const MAX_DATABASE_NAME_LEN: usize = 64;

/// Errors that can occur during store operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    #[error("illegal name: {0}")]
    InvalidName(String),

    #[error("database not found: {0}")]
    DatabaseNotFound(String),

    #[error("collection or view not found: {0}")]
    CollectionNotFound(String),

    #[error("unique constraint violated in {collection}: duplicate key {key}")]
    DuplicateKey { collection: String, key: String },

    #[error("illegal document key: {0}")]
    InvalidKey(String),

    #[error("document must be a JSON object")]
    InvalidDocument,
}

impl StoreError {
    /// ArangoDB error number for the same condition
    pub fn error_num(&self) -> u32 {
        match self {
            StoreError::DuplicateName(_) => 1207,
            StoreError::InvalidName(_) => 1208,
            StoreError::DatabaseNotFound(_) => 1228,
            StoreError::CollectionNotFound(_) => 1203,
            StoreError::DuplicateKey { .. } => 1210,
            StoreError::InvalidKey(_) => 1221,
            StoreError::InvalidDocument => 1227,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// In-memory storage for databases, collections and documents
#[derive(Debug)]
pub struct DocumentStore {
    databases: IndexMap<String, Database>,
}

impl DocumentStore {
    /// Create a store holding only the system database
    pub fn new() -> Self {
        let mut databases = IndexMap::new();
        databases.insert(
            SYSTEM_DATABASE.to_string(),
            Database::new(SYSTEM_DATABASE, Vec::new()),
        );
        Self { databases }
    }

    /// Database names in creation order
    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(String::as_str).collect()
    }

    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Create a database with its initial users
    pub fn create_database(
        &mut self,
        name: &str,
        users: Vec<DatabaseUser>,
    ) -> StoreResult<&mut Database> {
        if !is_valid_database_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if self.has_database(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        let database = self
            .databases
            .entry(name.to_string())
            .or_insert_with(|| Database::new(name, users));
        Ok(database)
    }

    pub fn database(&self, name: &str) -> StoreResult<&Database> {
        self.databases
            .get(name)
            .ok_or_else(|| StoreError::DatabaseNotFound(name.to_string()))
    }

    pub fn database_mut(&mut self, name: &str) -> StoreResult<&mut Database> {
        self.databases
            .get_mut(name)
            .ok_or_else(|| StoreError::DatabaseNotFound(name.to_string()))
    }

    /// Total number of documents across all databases
    pub fn document_count(&self) -> usize {
        self.databases
            .values()
            .flat_map(|db| db.collections())
            .map(|c| c.count())
            .sum()
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Database names start with a letter and continue with letters, digits,
/// `_` and `-`
pub fn is_valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && name.len() <= MAX_DATABASE_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
