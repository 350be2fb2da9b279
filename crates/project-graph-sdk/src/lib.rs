//! Project Graph SDK: seeding and inspection of the project graph database
//!
//! Provides two client implementations:
//!
//! - **`EmbeddedClient`**: in-process, no network. Uses the in-memory
//!   `DocumentStore` directly. Ideal for tests and offline runs.
//!
//! - **`RemoteClient`**: connects to a running ArangoDB server via its HTTP API.
//!
//! Both implement the `DocumentClient` trait, which the rest of the crate
//! is written against:
//! - **`Seeder`**: ensures the database and collections, then loads the sample data
//! - **`verify`**: compares a seeded database with the expected dataset
//! - **`load_collections`**: paged snapshots of collection contents
//!
//! # Quick Start
//!
//! ```rust
//! use project_graph_sdk::{DatabaseUser, DocumentClient, EmbeddedClient, Seeder};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = EmbeddedClient::new();
//!
//!     let report = Seeder::new(&client, "project_graph", DatabaseUser::new("root", "arango2rdb"))
//!         .run()
//!         .await
//!         .unwrap();
//!     assert_eq!(report.inserted(), 20);
//!
//!     let teams = client.count_documents("project_graph", "teams").await.unwrap();
//!     println!("Found {} teams", teams);
//! }
//! ```

pub mod client;
pub mod embedded;
pub mod error;
pub mod models;
pub mod remote;
pub mod seed;
pub mod snapshot;
pub mod verify;

// ============================================================
// Core SDK types
// ============================================================

pub use client::DocumentClient;
pub use embedded::EmbeddedClient;
pub use error::{SdkError, SdkResult, SeedError, SeedResult};
pub use models::{CollectionInfo, DocumentMeta, ServerVersion};
pub use remote::RemoteClient;

// ============================================================
// Seeding, verification and inspection
// ============================================================

pub use seed::{CollectionRef, CollectionReport, SeedReport, Seeder};
pub use snapshot::{
    load_collection, load_collections, normalize_limit, CollectionSnapshot, DEFAULT_PAGE_SIZE,
    PAGE_STEP,
};
pub use verify::{verify, CollectionCheck, VerifyReport};

// ============================================================
// Data and store types (re-exported from project-graph core)
// ============================================================

pub use project_graph::dataset::integrity::Violation;
pub use project_graph::{
    ArangoConfig, ConfigError, DatabaseUser, Dataset, DocumentStore, SeedConfig, COLLECTIONS,
    DEFAULT_DATABASE,
};
