//! Integrity checks for a [`Dataset`]
//!
//! The document store does not enforce keys, references or date formats.
//! [`check`] reports every place where a dataset breaks one of them.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use super::model::{DateKind, Record};
use super::Dataset;

/// A broken invariant found in a dataset
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{collection}/{key}: {field} references missing {target_collection}/{target_key}")]
    DanglingReference {
        collection: &'static str,
        key: String,
        field: &'static str,
        target_collection: &'static str,
        target_key: String,
    },

    #[error("{collection}/{key}: key is used more than once")]
    DuplicateKey { collection: &'static str, key: String },

    #[error("{collection}/{key}: {field} is not an ISO-8601 date: {value:?}")]
    InvalidDate {
        collection: &'static str,
        key: String,
        field: &'static str,
        value: String,
    },
}

/// Check keys, references and dates of every record
pub fn check(dataset: &Dataset) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_records(dataset, &dataset.teams, &mut violations);
    check_records(dataset, &dataset.members, &mut violations);
    check_records(dataset, &dataset.projects, &mut violations);
    check_records(dataset, &dataset.project_health, &mut violations);
    check_records(dataset, &dataset.tasks, &mut violations);
    check_records(dataset, &dataset.task_assignments, &mut violations);
    check_records(dataset, &dataset.milestones, &mut violations);
    violations
}

fn check_records<R: Record>(dataset: &Dataset, records: &[R], violations: &mut Vec<Violation>) {
    let mut seen = HashSet::new();
    for record in records {
        if !seen.insert(record.key()) {
            violations.push(Violation::DuplicateKey {
                collection: R::COLLECTION,
                key: record.key().to_string(),
            });
        }

        for reference in record.references() {
            if !dataset.contains(reference.collection, reference.key) {
                violations.push(Violation::DanglingReference {
                    collection: R::COLLECTION,
                    key: record.key().to_string(),
                    field: reference.field,
                    target_collection: reference.collection,
                    target_key: reference.key.to_string(),
                });
            }
        }

        for date in record.dates() {
            if !is_valid_date(date.value, date.kind) {
                violations.push(Violation::InvalidDate {
                    collection: R::COLLECTION,
                    key: record.key().to_string(),
                    field: date.field,
                    value: date.value.to_string(),
                });
            }
        }
    }
}

fn is_valid_date(value: &str, kind: DateKind) -> bool {
    match kind {
        DateKind::Day => NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok(),
        DateKind::Timestamp => DateTime::parse_from_rfc3339(value).is_ok(),
    }
}
