//! Project Graph
//!
//! Sample organization data for a graph-oriented document database
//! (teams, members, projects, project health, tasks, task assignments and
//! milestones), together with the pieces needed to work with it offline.
//!
//! # Modules
//!
//! - [`dataset`]: typed records, the literal sample dataset and integrity checks
//! - [`config`]: seeder configuration (connection, target database, bootstrap user)
//! - [`store`]: in-memory document store with ArangoDB-like semantics
//! - [`http`]: ArangoDB-compatible HTTP facade over the in-memory store
//!
//! Seeding itself lives in the `project-graph-sdk` crate, which talks to a
//! store through its `DocumentClient` trait.
//!
//! ## Example Usage
//!
//! ```rust
//! use project_graph::dataset::{integrity, Dataset, TEAMS};
//!
//! let dataset = Dataset::sample();
//! assert_eq!(dataset.count(TEAMS), Some(2));
//! assert!(integrity::check(&dataset).is_empty());
//! ```

#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod http;
pub mod store;

// Re-export main types for convenience
pub use config::{ArangoConfig, ConfigError, ConfigResult, SeedConfig, DEFAULT_DATABASE};
pub use dataset::{CollectionBatch, Dataset, DatasetError, DatasetResult, Record, COLLECTIONS};
pub use http::HttpServer;
pub use store::{
    Collection, Database, DatabaseUser, Document, DocumentStore, StoreError, StoreResult,
    SYSTEM_DATABASE,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
