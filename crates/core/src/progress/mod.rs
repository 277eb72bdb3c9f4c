//! Project tasks and the Gantt-style progress view.

pub mod error;
pub mod gantt;
pub mod service;
pub mod types;

pub use error::ProgressError;
pub use gantt::{GanttChart, GanttRow};
pub use service::{ProgressService, TaskNode};
pub use types::{ProjectTask, TaskInput, TaskStatus};
