//! The literal sample organization: two teams, their members, projects,
//! tasks, assignments and milestones.

use super::model::*;
use super::Dataset;

pub(crate) fn sample_dataset() -> Dataset {
    Dataset {
        teams: teams(),
        members: members(),
        projects: projects(),
        project_health: project_health(),
        tasks: tasks(),
        task_assignments: task_assignments(),
        milestones: milestones(),
    }
}

fn teams() -> Vec<Team> {
    vec![
        Team {
            key: "team-dev".into(),
            name: "Development Team".into(),
            lead_member_id: "member-oliver".into(),
        },
        Team {
            key: "team-design".into(),
            name: "Design Team".into(),
            lead_member_id: "member-ava".into(),
        },
    ]
}

fn members() -> Vec<Member> {
    vec![
        Member {
            key: "member-oliver".into(),
            first_name: "Oliver".into(),
            last_name: "Mason".into(),
            email: "oliver.mason@example.com".into(),
            role: "Engineering Manager".into(),
            team_id: "team-dev".into(),
        },
        Member {
            key: "member-ava".into(),
            first_name: "Ava".into(),
            last_name: "Nguyen".into(),
            email: "ava.nguyen@example.com".into(),
            role: "Design Lead".into(),
            team_id: "team-design".into(),
        },
        Member {
            key: "member-liam".into(),
            first_name: "Liam".into(),
            last_name: "Garcia".into(),
            email: "liam.garcia@example.com".into(),
            role: "Backend Engineer".into(),
            team_id: "team-dev".into(),
        },
        Member {
            key: "member-sofia".into(),
            first_name: "Sofia".into(),
            last_name: "Khan".into(),
            email: "sofia.khan@example.com".into(),
            role: "Product Designer".into(),
            team_id: "team-design".into(),
        },
    ]
}

fn projects() -> Vec<Project> {
    vec![
        Project {
            key: "project-analytics".into(),
            name: "Analytics Platform Refresh".into(),
            description: "Rebuild the analytics data pipeline and dashboards.".into(),
            status: ProjectStatus::Active,
            team_id: "team-dev".into(),
            start_date: "2024-01-15".into(),
            end_date: "2024-12-15".into(),
        },
        Project {
            key: "project-mobile".into(),
            name: "Mobile App Redesign".into(),
            description: "Modernise the mobile application UX and UI with new onboarding flows."
                .into(),
            status: ProjectStatus::Planning,
            team_id: "team-design".into(),
            start_date: "2024-03-01".into(),
            end_date: "2024-09-30".into(),
        },
    ]
}

fn project_health() -> Vec<ProjectHealth> {
    vec![
        ProjectHealth {
            key: "health-project-analytics".into(),
            project_id: "project-analytics".into(),
            status: HealthStatus::AtRisk,
            updated_at: "2024-04-10T10:00:00Z".into(),
        },
        ProjectHealth {
            key: "health-project-mobile".into(),
            project_id: "project-mobile".into(),
            status: HealthStatus::OnTrack,
            updated_at: "2024-03-25T15:30:00Z".into(),
        },
    ]
}

fn tasks() -> Vec<Task> {
    vec![
        Task {
            key: "task-data-model".into(),
            project_id: "project-analytics".into(),
            name: "Define canonical data model".into(),
            status: TaskStatus::InProgress,
            due_date: "2024-04-30".into(),
            assigned_team_id: "team-dev".into(),
        },
        Task {
            key: "task-dashboard".into(),
            project_id: "project-analytics".into(),
            name: "Build executive dashboard".into(),
            status: TaskStatus::NotStarted,
            due_date: "2024-06-15".into(),
            assigned_team_id: "team-dev".into(),
        },
        Task {
            key: "task-onboarding-flow".into(),
            project_id: "project-mobile".into(),
            name: "Prototype onboarding flow".into(),
            status: TaskStatus::InReview,
            due_date: "2024-05-20".into(),
            assigned_team_id: "team-design".into(),
        },
        Task {
            key: "task-style-guide".into(),
            project_id: "project-mobile".into(),
            name: "Update mobile design system".into(),
            status: TaskStatus::InProgress,
            due_date: "2024-06-10".into(),
            assigned_team_id: "team-design".into(),
        },
    ]
}

fn task_assignments() -> Vec<TaskAssignment> {
    vec![
        TaskAssignment {
            key: "assign-data-model-liam".into(),
            task_id: "task-data-model".into(),
            member_id: "member-liam".into(),
            hours_planned: 40,
            hours_actual: 12,
        },
        TaskAssignment {
            key: "assign-dashboard-oliver".into(),
            task_id: "task-dashboard".into(),
            member_id: "member-oliver".into(),
            hours_planned: 24,
            hours_actual: 0,
        },
        TaskAssignment {
            key: "assign-onboarding-ava".into(),
            task_id: "task-onboarding-flow".into(),
            member_id: "member-ava".into(),
            hours_planned: 32,
            hours_actual: 18,
        },
        TaskAssignment {
            key: "assign-style-sofia".into(),
            task_id: "task-style-guide".into(),
            member_id: "member-sofia".into(),
            hours_planned: 28,
            hours_actual: 9,
        },
    ]
}

fn milestones() -> Vec<Milestone> {
    vec![
        Milestone {
            key: "milestone-analytics-alpha".into(),
            project_id: "project-analytics".into(),
            name: "Analytics alpha release".into(),
            target_date: "2024-08-01".into(),
            status: MilestoneStatus::Planned,
        },
        Milestone {
            key: "milestone-mobile-beta".into(),
            project_id: "project-mobile".into(),
            name: "Mobile beta handoff".into(),
            target_date: "2024-07-15".into(),
            status: MilestoneStatus::Planned,
        },
    ]
}
