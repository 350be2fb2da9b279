//! Document collections

use indexmap::IndexMap;
use serde_json::Value;

use super::document::Document;
use super::memory::{StoreError, StoreResult};

const MAX_KEY_LEN: usize = 254;

/// A named container of documents keyed by `_key`
///
/// Documents keep their insertion order, which is also the order of
/// [`Collection::documents`].
#[derive(Debug)]
pub struct Collection {
    name: String,
    documents: IndexMap<String, Document>,
    /// Next generated key, for documents inserted without `_key`
    next_key: u64,
    /// Revision counter, never reset by truncate
    next_rev: u64,
}

impl Collection {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: IndexMap::new(),
            next_key: 1,
            next_rev: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// System collections start with an underscore
    pub fn is_system(&self) -> bool {
        self.name.starts_with('_')
    }

    /// Number of documents
    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by key
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.documents.get(key)
    }

    /// Documents in insertion order
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Insert a JSON object as a new document
    ///
    /// The key is taken from `_key` when present and generated otherwise.
    /// `_id` and `_rev` in the input are ignored.
    pub fn insert(&mut self, document: Value) -> StoreResult<&Document> {
        let Value::Object(mut body) = document else {
            return Err(StoreError::InvalidDocument);
        };
        body.remove("_id");
        body.remove("_rev");

        let key = match body.remove("_key") {
            Some(Value::String(key)) => {
                validate_key(&key)?;
                key
            }
            Some(other) => return Err(StoreError::InvalidKey(other.to_string())),
            None => self.generate_key(),
        };

        if self.documents.contains_key(&key) {
            return Err(StoreError::DuplicateKey {
                collection: self.name.clone(),
                key,
            });
        }

        let rev = format!("_{:08x}", self.next_rev);
        self.next_rev += 1;

        let doc = Document::new(&self.name, key.clone(), rev, body);
        let entry = self.documents.entry(key).or_insert(doc);
        Ok(&*entry)
    }

    /// Remove all documents, returning how many were removed
    pub fn truncate(&mut self) -> usize {
        let removed = self.documents.len();
        self.documents.clear();
        removed
    }

    fn generate_key(&mut self) -> String {
        loop {
            let key = self.next_key.to_string();
            self.next_key += 1;
            if !self.documents.contains_key(&key) {
                return key;
            }
        }
    }
}

/// Keys are 1-254 characters from a restricted ASCII set
fn validate_key(key: &str) -> StoreResult<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || "_-:.@()+,=;$!*'%".contains(c);
    if key.is_empty() || key.len() > MAX_KEY_LEN || !key.chars().all(allowed) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
