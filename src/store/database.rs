//! Databases: named groups of collections with their users

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::memory::{StoreError, StoreResult};

const MAX_COLLECTION_NAME_LEN: usize = 256;

/// A user granted access to a database when it is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUser {
    pub username: String,
    /// Serialized as `passwd`, the attribute name of the database API
    #[serde(rename = "passwd", alias = "password", default)]
    pub password: String,
}

impl DatabaseUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A database and its collections
#[derive(Debug)]
pub struct Database {
    name: String,
    users: Vec<DatabaseUser>,
    collections: IndexMap<String, Collection>,
}

impl Database {
    pub(crate) fn new(name: impl Into<String>, users: Vec<DatabaseUser>) -> Self {
        Self {
            name: name.into(),
            users,
            collections: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Users created together with the database
    pub fn users(&self) -> &[DatabaseUser] {
        &self.users
    }

    /// Create an empty document collection
    pub fn create_collection(&mut self, name: &str) -> StoreResult<&mut Collection> {
        if !is_valid_collection_name(name) {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        if self.collections.contains_key(name) {
            return Err(StoreError::DuplicateName(name.to_string()));
        }
        let collection = self
            .collections
            .entry(name.to_string())
            .or_insert_with(|| Collection::new(name));
        Ok(collection)
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    pub fn collection(&self, name: &str) -> StoreResult<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    pub fn collection_mut(&mut self, name: &str) -> StoreResult<&mut Collection> {
        self.collections
            .get_mut(name)
            .ok_or_else(|| StoreError::CollectionNotFound(name.to_string()))
    }

    /// Collections in creation order
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }
}

/// Collection names start with a letter (or `_` for system collections)
/// followed by letters, digits, `_` and `-`
pub fn is_valid_collection_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && name.len() <= MAX_COLLECTION_NAME_LEN
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
