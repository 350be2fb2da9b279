//! Record types of the project graph
//!
//! Every record is a flat JSON document keyed by `_key`. References between
//! records are plain string fields holding the key of the target record;
//! nothing in the store enforces them (see [`super::integrity`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Collection holding [`Team`] records
pub const TEAMS: &str = "teams";
/// Collection holding [`Member`] records
pub const MEMBERS: &str = "members";
/// Collection holding [`Project`] records
pub const PROJECTS: &str = "projects";
/// Collection holding [`ProjectHealth`] records
pub const PROJECT_HEALTH: &str = "project_health";
/// Collection holding [`Task`] records
pub const TASKS: &str = "tasks";
/// Collection holding [`TaskAssignment`] records
pub const TASK_ASSIGNMENTS: &str = "task_assignments";
/// Collection holding [`Milestone`] records
pub const MILESTONES: &str = "milestones";

/// All collections, in the order they are populated
pub const COLLECTIONS: [&str; 7] = [
    TEAMS,
    MEMBERS,
    PROJECTS,
    PROJECT_HEALTH,
    TASKS,
    TASK_ASSIGNMENTS,
    MILESTONES,
];

/// A reference from one record to another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference<'a> {
    /// Attribute holding the reference
    pub field: &'static str,
    /// Collection the referenced record lives in
    pub collection: &'static str,
    /// Key of the referenced record
    pub key: &'a str,
}

/// How a date attribute is formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    /// Calendar date, `YYYY-MM-DD`
    Day,
    /// RFC 3339 timestamp
    Timestamp,
}

/// A date-valued attribute of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateField<'a> {
    pub field: &'static str,
    pub value: &'a str,
    pub kind: DateKind,
}

/// A record stored in one of the project graph collections
pub trait Record: Serialize + DeserializeOwned + Clone + PartialEq {
    /// Name of the collection the record belongs to
    const COLLECTION: &'static str;

    /// Document key
    fn key(&self) -> &str;

    /// Outgoing references to other records
    fn references(&self) -> Vec<Reference<'_>> {
        Vec::new()
    }

    /// Date-valued attributes
    fn dates(&self) -> Vec<DateField<'_>> {
        Vec::new()
    }
}

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Active,
    Planning,
}

/// Health assessment of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    AtRisk,
    OnTrack,
}

/// Progress state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    InProgress,
    NotStarted,
    InReview,
}

/// State of a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MilestoneStatus {
    Planned,
}

/// A team of members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_key")]
    pub key: String,
    pub name: String,
    pub lead_member_id: String,
}

impl Record for Team {
    const COLLECTION: &'static str = TEAMS;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![Reference {
            field: "leadMemberId",
            collection: MEMBERS,
            key: &self.lead_member_id,
        }]
    }
}

/// A person belonging to a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(rename = "_key")]
    pub key: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: String,
    pub team_id: String,
}

impl Record for Member {
    const COLLECTION: &'static str = MEMBERS;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![Reference {
            field: "teamId",
            collection: TEAMS,
            key: &self.team_id,
        }]
    }
}

/// A project owned by a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_key")]
    pub key: String,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub team_id: String,
    pub start_date: String,
    pub end_date: String,
}

impl Record for Project {
    const COLLECTION: &'static str = PROJECTS;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![Reference {
            field: "teamId",
            collection: TEAMS,
            key: &self.team_id,
        }]
    }

    fn dates(&self) -> Vec<DateField<'_>> {
        vec![
            DateField { field: "startDate", value: &self.start_date, kind: DateKind::Day },
            DateField { field: "endDate", value: &self.end_date, kind: DateKind::Day },
        ]
    }
}

/// Latest health assessment of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectHealth {
    #[serde(rename = "_key")]
    pub key: String,
    pub project_id: String,
    pub status: HealthStatus,
    pub updated_at: String,
}

impl Record for ProjectHealth {
    const COLLECTION: &'static str = PROJECT_HEALTH;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![Reference {
            field: "projectId",
            collection: PROJECTS,
            key: &self.project_id,
        }]
    }

    fn dates(&self) -> Vec<DateField<'_>> {
        vec![DateField {
            field: "updatedAt",
            value: &self.updated_at,
            kind: DateKind::Timestamp,
        }]
    }
}

/// A unit of work inside a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(rename = "_key")]
    pub key: String,
    pub project_id: String,
    pub name: String,
    pub status: TaskStatus,
    pub due_date: String,
    pub assigned_team_id: String,
}

impl Record for Task {
    const COLLECTION: &'static str = TASKS;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![
            Reference { field: "projectId", collection: PROJECTS, key: &self.project_id },
            Reference { field: "assignedTeamId", collection: TEAMS, key: &self.assigned_team_id },
        ]
    }

    fn dates(&self) -> Vec<DateField<'_>> {
        vec![DateField { field: "dueDate", value: &self.due_date, kind: DateKind::Day }]
    }
}

/// Hours a member spends on a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    #[serde(rename = "_key")]
    pub key: String,
    pub task_id: String,
    pub member_id: String,
    pub hours_planned: u32,
    pub hours_actual: u32,
}

impl TaskAssignment {
    /// Planned hours not yet spent; zero once the plan is exceeded
    pub fn hours_remaining(&self) -> u32 {
        self.hours_planned.saturating_sub(self.hours_actual)
    }
}

impl Record for TaskAssignment {
    const COLLECTION: &'static str = TASK_ASSIGNMENTS;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![
            Reference { field: "taskId", collection: TASKS, key: &self.task_id },
            Reference { field: "memberId", collection: MEMBERS, key: &self.member_id },
        ]
    }
}

/// A dated checkpoint of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    #[serde(rename = "_key")]
    pub key: String,
    pub project_id: String,
    pub name: String,
    pub target_date: String,
    pub status: MilestoneStatus,
}

impl Record for Milestone {
    const COLLECTION: &'static str = MILESTONES;

    fn key(&self) -> &str {
        &self.key
    }

    fn references(&self) -> Vec<Reference<'_>> {
        vec![Reference {
            field: "projectId",
            collection: PROJECTS,
            key: &self.project_id,
        }]
    }

    fn dates(&self) -> Vec<DateField<'_>> {
        vec![DateField { field: "targetDate", value: &self.target_date, kind: DateKind::Day }]
    }
}
