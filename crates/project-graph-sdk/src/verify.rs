//! Verification of a seeded database
//!
//! Reads every collection back, compares it with the expected dataset and
//! runs the integrity checks on what was actually stored.

use tracing::{debug, warn};

use project_graph::dataset::integrity::{self, Violation};
use project_graph::{Dataset, DatasetError, COLLECTIONS};

use crate::client::DocumentClient;
use crate::error::{SdkError, SdkResult};

/// Comparison of one collection against the expected records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionCheck {
    pub name: String,
    pub expected: usize,
    /// Stored document count, `None` when the collection is missing
    pub actual: Option<u64>,
    /// Stored records equal the expected ones, ignoring order and revisions
    pub matches: bool,
}

/// Outcome of [`verify`]
#[derive(Debug, Default)]
pub struct VerifyReport {
    pub collections: Vec<CollectionCheck>,
    pub violations: Vec<Violation>,
    /// Stored documents that do not decode as records of their collection
    pub decode_errors: Vec<DatasetError>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.collections.iter().all(|c| c.matches)
            && self.violations.is_empty()
            && self.decode_errors.is_empty()
    }
}

/// Check that `database` holds exactly the `expected` records.
///
/// A missing collection is reported, not raised. A missing database is an
/// error.
pub async fn verify<C: DocumentClient + ?Sized>(
    client: &C,
    database: &str,
    expected: &Dataset,
) -> SdkResult<VerifyReport> {
    let mut report = VerifyReport::default();
    let mut stored = Dataset::default();

    for name in COLLECTIONS {
        let documents = match client.read_documents(database, name, None).await {
            Ok(documents) => documents,
            Err(SdkError::CollectionNotFound(_)) => {
                warn!("collection {} is missing from {}", name, database);
                report.collections.push(CollectionCheck {
                    name: name.to_string(),
                    expected: expected.count(name).unwrap_or(0),
                    actual: None,
                    matches: false,
                });
                continue;
            }
            Err(e) => return Err(e),
        };

        let actual = documents.len() as u64;
        let mut decoded_all = true;
        for document in documents {
            if let Err(e) = stored.push_document(name, document) {
                decoded_all = false;
                report.decode_errors.push(e);
            }
        }

        let matches = decoded_all && stored.same_collection(expected, name);
        debug!(collection = name, actual, matches, "collection checked");
        report.collections.push(CollectionCheck {
            name: name.to_string(),
            expected: expected.count(name).unwrap_or(0),
            actual: Some(actual),
            matches,
        });
    }

    report.violations = integrity::check(&stored);
    Ok(report)
}
