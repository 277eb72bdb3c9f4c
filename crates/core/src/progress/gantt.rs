//! Gantt chart rows.

use chrono::NaiveDate;
use fundtrack_shared::types::TaskId;
use rust_decimal::Decimal;
use serde::Serialize;

use super::service::{ProgressService, TaskNode};
use super::types::{ProjectTask, TaskStatus};

/// One bar of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttRow {
    /// Task ID.
    pub id: TaskId,
    /// Task name.
    pub name: String,
    /// Depth in the hierarchy.
    pub level: u32,
    /// Days between the chart start and the task start.
    pub start_offset_days: i64,
    /// Inclusive duration in days.
    pub duration_days: i64,
    /// Completion in percent.
    pub progress: u8,
    /// Status on the reference day.
    pub status: TaskStatus,
    /// Tasks that must finish first.
    pub dependencies: Vec<TaskId>,
    /// Person responsible.
    pub assignee: Option<String>,
    /// Project phase.
    pub phase: Option<String>,
}

/// Chart for a whole project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GanttChart {
    /// Earliest task start.
    pub start: Option<NaiveDate>,
    /// Latest task end.
    pub end: Option<NaiveDate>,
    /// Duration-weighted progress of the leaf tasks, in percent.
    pub weighted_progress: Decimal,
    /// Rows in depth-first tree order.
    pub rows: Vec<GanttRow>,
}

impl GanttChart {
    /// Lays out `tasks` relative to the earliest start date.
    #[must_use]
    pub fn build(tasks: &[ProjectTask], today: NaiveDate) -> Self {
        let start = tasks.iter().map(|t| t.start_date).min();
        let end = tasks.iter().map(|t| t.end_date).max();

        let mut rows = Vec::with_capacity(tasks.len());
        let mut weighted = (0i64, 0i64);
        let tree = ProgressService::build_tree(tasks);
        let origin = start.unwrap_or(today);
        flatten(&tree, origin, today, &mut rows, &mut weighted);

        let (progress_days, total_days) = weighted;
        let weighted_progress = if total_days == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(progress_days) / Decimal::from(total_days)).round_dp(2)
        };

        Self {
            start,
            end,
            weighted_progress,
            rows,
        }
    }
}

fn flatten(
    nodes: &[TaskNode],
    origin: NaiveDate,
    today: NaiveDate,
    rows: &mut Vec<GanttRow>,
    weighted: &mut (i64, i64),
) {
    for node in nodes {
        let task = &node.task;
        let duration_days = (task.end_date - task.start_date).num_days() + 1;
        if node.children.is_empty() {
            weighted.0 += duration_days * i64::from(task.progress);
            weighted.1 += duration_days;
        }
        rows.push(GanttRow {
            id: task.id,
            name: task.name.clone(),
            level: task.level,
            start_offset_days: (task.start_date - origin).num_days(),
            duration_days,
            progress: task.progress,
            status: ProgressService::effective_status(task, today),
            dependencies: task.dependencies.clone(),
            assignee: task.assignee.clone(),
            phase: task.phase.clone(),
        });
        flatten(&node.children, origin, today, rows, weighted);
    }
}
