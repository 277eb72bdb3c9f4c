//! Task data types.

use chrono::{DateTime, NaiveDate, Utc};
use fundtrack_shared::types::{ProjectId, TaskId};
use serde::{Deserialize, Serialize};

coded_enum! {
    /// Task execution state.
    pub enum TaskStatus {
        /// Not started yet.
        NotStarted => "not_started",
        /// Under way.
        InProgress => "in_progress",
        /// Done.
        Completed => "completed",
        /// Past its end date without being done.
        Delayed => "delayed",
    }
}

/// A node of a project's work breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTask {
    /// Task ID.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Parent task; `None` for top-level tasks.
    pub parent_id: Option<TaskId>,
    /// Depth in the hierarchy, 0 for top-level tasks.
    pub level: u32,
    /// Task name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Planned start.
    pub start_date: NaiveDate,
    /// Planned end.
    pub end_date: NaiveDate,
    /// Stored status.
    pub status: TaskStatus,
    /// Completion in percent, 0-100.
    pub progress: u8,
    /// Tasks that must finish first.
    pub dependencies: Vec<TaskId>,
    /// Person responsible.
    pub assignee: Option<String>,
    /// Project phase label.
    pub phase: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    /// Parent task.
    #[serde(default)]
    pub parent_id: Option<TaskId>,
    /// Task name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Planned start.
    pub start_date: NaiveDate,
    /// Planned end.
    pub end_date: NaiveDate,
    /// Status.
    #[serde(default = "default_status")]
    pub status: TaskStatus,
    /// Completion in percent.
    #[serde(default)]
    pub progress: u8,
    /// Tasks that must finish first.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Person responsible.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Project phase label.
    #[serde(default)]
    pub phase: Option<String>,
}

fn default_status() -> TaskStatus {
    TaskStatus::NotStarted
}
