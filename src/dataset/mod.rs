//! The project graph dataset
//!
//! [`Dataset`] groups the typed records of all seven collections. The
//! literal sample organization is available through [`Dataset::sample`];
//! a dataset can also be rebuilt from stored documents with
//! [`Dataset::push_document`] to compare what a database holds against it.

pub mod integrity;
pub mod model;
mod sample;

pub use model::{
    DateField, DateKind, HealthStatus, Member, Milestone, MilestoneStatus, Project, ProjectHealth,
    ProjectStatus, Record, Reference, Task, TaskAssignment, TaskStatus, Team, COLLECTIONS,
    MEMBERS, MILESTONES, PROJECTS, PROJECT_HEALTH, TASKS, TASK_ASSIGNMENTS, TEAMS,
};

use serde_json::Value;
use thiserror::Error;

/// Errors raised while converting between records and JSON documents
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Cannot decode document {key} of collection {collection}: {source}")]
    Decode {
        collection: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot encode records of collection {collection}: {source}")]
    Encode {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type DatasetResult<T> = Result<T, DatasetError>;

/// Documents destined for one collection, ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionBatch {
    pub name: &'static str,
    pub documents: Vec<Value>,
}

/// Typed records of every collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub teams: Vec<Team>,
    pub members: Vec<Member>,
    pub projects: Vec<Project>,
    pub project_health: Vec<ProjectHealth>,
    pub tasks: Vec<Task>,
    pub task_assignments: Vec<TaskAssignment>,
    pub milestones: Vec<Milestone>,
}

impl Dataset {
    /// The sample organization
    pub fn sample() -> Self {
        sample::sample_dataset()
    }

    /// One batch per collection, in population order
    pub fn batches(&self) -> DatasetResult<Vec<CollectionBatch>> {
        Ok(vec![
            batch(&self.teams)?,
            batch(&self.members)?,
            batch(&self.projects)?,
            batch(&self.project_health)?,
            batch(&self.tasks)?,
            batch(&self.task_assignments)?,
            batch(&self.milestones)?,
        ])
    }

    /// Number of records held for a collection, `None` for unknown names
    pub fn count(&self, collection: &str) -> Option<usize> {
        let n = match collection {
            TEAMS => self.teams.len(),
            MEMBERS => self.members.len(),
            PROJECTS => self.projects.len(),
            PROJECT_HEALTH => self.project_health.len(),
            TASKS => self.tasks.len(),
            TASK_ASSIGNMENTS => self.task_assignments.len(),
            MILESTONES => self.milestones.len(),
            _ => return None,
        };
        Some(n)
    }

    /// Record counts per collection, in population order
    pub fn counts(&self) -> Vec<(&'static str, usize)> {
        COLLECTIONS
            .iter()
            .map(|name| (*name, self.count(name).unwrap_or(0)))
            .collect()
    }

    /// Total number of records
    pub fn len(&self) -> usize {
        self.counts().iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a key is present in a collection
    pub fn contains(&self, collection: &str, key: &str) -> bool {
        match collection {
            TEAMS => has_key(&self.teams, key),
            MEMBERS => has_key(&self.members, key),
            PROJECTS => has_key(&self.projects, key),
            PROJECT_HEALTH => has_key(&self.project_health, key),
            TASKS => has_key(&self.tasks, key),
            TASK_ASSIGNMENTS => has_key(&self.task_assignments, key),
            MILESTONES => has_key(&self.milestones, key),
            _ => false,
        }
    }

    /// Decode a stored document and append it to the matching collection
    pub fn push_document(&mut self, collection: &str, document: Value) -> DatasetResult<()> {
        match collection {
            TEAMS => self.teams.push(decode(document)?),
            MEMBERS => self.members.push(decode(document)?),
            PROJECTS => self.projects.push(decode(document)?),
            PROJECT_HEALTH => self.project_health.push(decode(document)?),
            TASKS => self.tasks.push(decode(document)?),
            TASK_ASSIGNMENTS => self.task_assignments.push(decode(document)?),
            MILESTONES => self.milestones.push(decode(document)?),
            other => return Err(DatasetError::UnknownCollection(other.to_string())),
        }
        Ok(())
    }

    /// Whether both datasets hold the same records for a collection,
    /// ignoring record order
    pub fn same_collection(&self, other: &Dataset, collection: &str) -> bool {
        match collection {
            TEAMS => same_records(&self.teams, &other.teams),
            MEMBERS => same_records(&self.members, &other.members),
            PROJECTS => same_records(&self.projects, &other.projects),
            PROJECT_HEALTH => same_records(&self.project_health, &other.project_health),
            TASKS => same_records(&self.tasks, &other.tasks),
            TASK_ASSIGNMENTS => same_records(&self.task_assignments, &other.task_assignments),
            MILESTONES => same_records(&self.milestones, &other.milestones),
            _ => false,
        }
    }
}

fn batch<R: Record>(records: &[R]) -> DatasetResult<CollectionBatch> {
    let documents = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| DatasetError::Encode {
            collection: R::COLLECTION.to_string(),
            source,
        })?;
    Ok(CollectionBatch {
        name: R::COLLECTION,
        documents,
    })
}

fn decode<R: Record>(document: Value) -> DatasetResult<R> {
    let key = document
        .get("_key")
        .and_then(Value::as_str)
        .unwrap_or("<no key>")
        .to_string();
    serde_json::from_value(document).map_err(|source| DatasetError::Decode {
        collection: R::COLLECTION.to_string(),
        key,
        source,
    })
}

fn has_key<R: Record>(records: &[R], key: &str) -> bool {
    records.iter().any(|r| r.key() == key)
}

fn same_records<R: Record>(left: &[R], right: &[R]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut left: Vec<&R> = left.iter().collect();
    let mut right: Vec<&R> = right.iter().collect();
    left.sort_by(|a, b| a.key().cmp(b.key()));
    right.sort_by(|a, b| a.key().cmp(b.key()));
    left == right
}
