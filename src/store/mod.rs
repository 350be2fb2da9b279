//! In-memory document database
//!
//! A small stand-in for a graph-oriented document database:
//! - Databases, always including `_system`
//! - Document collections with per-collection unique keys
//! - Documents with `_key`, `_id` and `_rev` system attributes

pub mod collection;
pub mod database;
pub mod document;
pub mod memory;

pub use collection::Collection;
pub use database::{is_valid_collection_name, Database, DatabaseUser};
pub use document::Document;
pub use memory::{
    is_valid_database_name, DocumentStore, StoreError, StoreResult, SYSTEM_DATABASE,
};
