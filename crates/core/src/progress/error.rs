//! Task error types.

use chrono::NaiveDate;
use fundtrack_shared::AppError;
use fundtrack_shared::types::TaskId;
use thiserror::Error;

/// Task-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressError {
    /// Name is required.
    #[error("task name is required")]
    EmptyName,

    /// Progress above 100 percent.
    #[error("progress {0}% exceeds 100%")]
    InvalidProgress(u8),

    /// End date before start date.
    #[error("end date {end} is before start date {start}")]
    DateOrder {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },

    /// Referenced task is not part of the project.
    #[error("task {0} does not belong to this project")]
    UnknownTask(TaskId),

    /// A task cannot depend on itself.
    #[error("a task cannot depend on itself")]
    SelfDependency,

    /// The dependency graph would contain a cycle.
    #[error("dependency on {0} would create a cycle")]
    DependencyCycle(TaskId),

    /// The parent chain would loop back to the task.
    #[error("task {0} cannot be moved under its own subtask")]
    ParentCycle(TaskId),
}

impl From<ProgressError> for AppError {
    fn from(err: ProgressError) -> Self {
        match err {
            ProgressError::UnknownTask(_) => Self::NotFound(err.to_string()),
            ProgressError::DependencyCycle(_) | ProgressError::ParentCycle(_) => {
                Self::BusinessRule(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
