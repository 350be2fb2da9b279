//! Seeder: loads the sample project graph into a database
//!
//! A run ensures the target database exists, then for each collection in
//! dependency order (teams, members, projects, project health, tasks,
//! assignments, milestones) ensures the collection exists, truncates it and
//! inserts the literal records. Any failure aborts the run.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, info, warn};

use project_graph::{CollectionBatch, DatabaseUser, Dataset};

use crate::client::DocumentClient;
use crate::error::{SdkError, SeedError, SeedResult};
use crate::models::DocumentMeta;

/// Handle to a collection that has been ensured and emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionRef<'a> {
    pub database: &'a str,
    pub name: &'a str,
}

/// What happened to one collection during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionReport {
    pub name: String,
    /// The collection did not exist before the run
    pub created: bool,
    /// Documents removed by the truncate
    pub removed: u64,
    /// Documents inserted
    pub inserted: usize,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub database: String,
    /// The database did not exist before the run
    pub database_created: bool,
    /// Collections in the order they were populated
    pub collections: Vec<CollectionReport>,
}

impl SeedReport {
    /// Total number of inserted documents
    pub fn inserted(&self) -> usize {
        self.collections.iter().map(|c| c.inserted).sum()
    }

    /// Total number of documents removed from earlier runs
    pub fn removed(&self) -> u64 {
        self.collections.iter().map(|c| c.removed).sum()
    }
}

/// Seeds a dataset into one database through any [`DocumentClient`]
pub struct Seeder<'a, C: DocumentClient + ?Sized> {
    client: &'a C,
    database: String,
    bootstrap_user: DatabaseUser,
    dataset: Dataset,
    progress: Option<Mutex<Box<dyn Write + Send>>>,
}

impl<'a, C: DocumentClient + ?Sized> Seeder<'a, C> {
    /// Seeder for the sample dataset
    pub fn new(client: &'a C, database: impl Into<String>, bootstrap_user: DatabaseUser) -> Self {
        Self {
            client,
            database: database.into(),
            bootstrap_user,
            dataset: Dataset::sample(),
            progress: None,
        }
    }

    /// Seed a different dataset
    pub fn with_dataset(mut self, dataset: Dataset) -> Self {
        self.dataset = dataset;
        self
    }

    /// Print progress lines on stdout
    pub fn with_progress(self, progress: bool) -> Self {
        if progress {
            self.with_progress_writer(io::stdout())
        } else {
            Self { progress: None, ..self }
        }
    }

    /// Write progress lines to `writer`
    pub fn with_progress_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.progress = Some(Mutex::new(Box::new(writer)));
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn progress(&self, line: &str) {
        let Some(sink) = &self.progress else {
            return;
        };
        if let Ok(mut out) = sink.lock() {
            if let Err(e) = writeln!(out, "{}", line) {
                warn!("cannot write progress: {}", e);
            }
        }
    }

    /// Create the target database unless it exists.
    ///
    /// Returns whether it was created. An existing database is left
    /// untouched, including its users.
    pub async fn ensure_database(&self) -> SeedResult<bool> {
        let users = std::slice::from_ref(&self.bootstrap_user);
        self.progress(&format!("creating new database: {}", self.database));
        match self.client.create_database(&self.database, users).await {
            Ok(()) => {
                info!("created database {}", self.database);
                self.progress("done");
                Ok(true)
            }
            Err(SdkError::DuplicateName(_)) => {
                debug!("database {} already exists", self.database);
                self.progress(&format!("database already exists: {}", self.database));
                Ok(false)
            }
            Err(source) => Err(SeedError::Database {
                database: self.database.clone(),
                source,
            }),
        }
    }

    /// Create the collection unless it exists, then remove all its documents
    pub async fn ensure_collection<'s>(
        &'s self,
        name: &'s str,
    ) -> SeedResult<(CollectionRef<'s>, CollectionReport)> {
        let fail = |source| SeedError::Collection {
            collection: name.to_string(),
            source,
        };

        let created = match self.client.create_collection(&self.database, name).await {
            Ok(()) => true,
            Err(SdkError::DuplicateName(_)) => false,
            Err(source) => return Err(fail(source)),
        };

        let removed = if created {
            0
        } else {
            let existing = self
                .client
                .count_documents(&self.database, name)
                .await
                .map_err(fail)?;
            self.client
                .truncate_collection(&self.database, name)
                .await
                .map_err(fail)?;
            existing
        };
        debug!(collection = name, created, removed, "collection ready");

        let handle = CollectionRef {
            database: &self.database,
            name,
        };
        let report = CollectionReport {
            name: name.to_string(),
            created,
            removed,
            inserted: 0,
        };
        Ok((handle, report))
    }

    /// Insert one record into an ensured collection
    pub async fn insert_record(
        &self,
        handle: &CollectionRef<'_>,
        record: &Value,
    ) -> SeedResult<DocumentMeta> {
        self.client
            .insert_document(handle.database, handle.name, record)
            .await
            .map_err(|source| SeedError::Insert {
                collection: handle.name.to_string(),
                key: record
                    .get("_key")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                source,
            })
    }

    async fn load_batch(&self, batch: &CollectionBatch) -> SeedResult<CollectionReport> {
        let (handle, mut report) = self.ensure_collection(batch.name).await?;
        for record in &batch.documents {
            self.insert_record(&handle, record).await?;
            report.inserted += 1;
        }
        self.progress(&format!(
            "{}: {} record(s) loaded",
            batch.name, report.inserted
        ));
        Ok(report)
    }

    /// Run the whole seeding procedure
    pub async fn run(&self) -> SeedResult<SeedReport> {
        let batches = self.dataset.batches()?;

        let database_created = self.ensure_database().await?;

        let mut collections = Vec::with_capacity(batches.len());
        for batch in &batches {
            collections.push(self.load_batch(batch).await?);
        }

        let report = SeedReport {
            database: self.database.clone(),
            database_created,
            collections,
        };
        info!(
            database = %report.database,
            inserted = report.inserted(),
            removed = report.removed(),
            "seeding finished"
        );
        self.progress("Sample project graph data loaded.");
        Ok(report)
    }
}
