//! Paged snapshots of collection contents, for inspection
//!
//! A snapshot holds the first `size` documents of a collection flattened
//! into rows, plus the paging figures needed to ask for a larger page.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::client::DocumentClient;
use crate::error::SdkResult;

/// Rows per snapshot when nothing else is asked for
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Growth of the page size between two snapshots
pub const PAGE_STEP: usize = 10;

const SYSTEM_COLUMNS: [&str; 3] = ["_key", "_id", "_rev"];

/// The first rows of one collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub name: String,
    /// Documents in the collection
    pub total_count: u64,
    /// Rows held by this snapshot
    pub size: usize,
    /// `_key`, `_id` and `_rev`, then attributes in first-seen order
    pub columns: Vec<String>,
    pub rows: Vec<IndexMap<String, Value>>,
    #[serde(skip)]
    step: usize,
}

impl CollectionSnapshot {
    /// Whether the collection holds more documents than this snapshot
    pub fn has_more(&self) -> bool {
        self.size > 0 && (self.size as u64) < self.total_count
    }

    /// Page size of the next, larger snapshot
    pub fn next_size(&self) -> usize {
        if !self.has_more() {
            return self.size;
        }
        let next = (self.size + self.step) as u64;
        next.min(self.total_count) as usize
    }

    /// Cell of a row as display text; absent attributes are empty
    pub fn cell(&self, row: usize, column: &str) -> String {
        match self.rows.get(row).and_then(|r| r.get(column)) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Rows to fetch for a requested page size.
///
/// `0` or a size past the end means the whole collection.
pub fn normalize_limit(requested: usize, total: u64) -> usize {
    if total == 0 {
        return 0;
    }
    if requested == 0 || requested as u64 >= total {
        return usize::try_from(total).unwrap_or(usize::MAX);
    }
    requested
}

/// Snapshot one collection
pub async fn load_collection<C: DocumentClient + ?Sized>(
    client: &C,
    database: &str,
    name: &str,
    requested_size: usize,
) -> SdkResult<CollectionSnapshot> {
    let total_count = client.count_documents(database, name).await?;
    let size = normalize_limit(requested_size, total_count);

    let mut columns: IndexSet<String> = SYSTEM_COLUMNS.iter().map(|c| c.to_string()).collect();
    let mut rows = Vec::new();

    if size > 0 {
        for document in client.read_documents(database, name, Some(size)).await? {
            let Value::Object(attributes) = document else {
                continue;
            };
            let mut row = IndexMap::with_capacity(attributes.len());
            for column in SYSTEM_COLUMNS {
                row.insert(
                    column.to_string(),
                    attributes.get(column).cloned().unwrap_or(Value::Null),
                );
            }
            for (attribute, value) in attributes {
                if SYSTEM_COLUMNS.contains(&attribute.as_str()) {
                    continue;
                }
                columns.insert(attribute.clone());
                row.insert(attribute, value);
            }
            rows.push(row);
        }
    }

    Ok(CollectionSnapshot {
        name: name.to_string(),
        total_count,
        size,
        columns: columns.into_iter().collect(),
        rows,
        step: PAGE_STEP,
    })
}

/// Snapshot every non-system collection of a database.
///
/// Collections are ordered by name ignoring case; `filter` keeps only names
/// containing it, ignoring case. A collection that fails to load is skipped.
pub async fn load_collections<C: DocumentClient + ?Sized>(
    client: &C,
    database: &str,
    filter: Option<&str>,
    page_size: usize,
) -> SdkResult<Vec<CollectionSnapshot>> {
    let filter = filter.map(str::to_lowercase);

    let mut names: Vec<String> = client
        .list_collections(database)
        .await?
        .into_iter()
        .map(|c| c.name)
        .filter(|name| !name.starts_with('_'))
        .filter(|name| match &filter {
            Some(f) => name.to_lowercase().contains(f.as_str()),
            None => true,
        })
        .collect();
    names.sort_by_key(|name| name.to_lowercase());

    let mut snapshots = Vec::with_capacity(names.len());
    for name in names {
        match load_collection(client, database, &name, page_size).await {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => warn!("Failed to load collection {}: {}", name, e),
        }
    }
    Ok(snapshots)
}
