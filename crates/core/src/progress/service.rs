//! Task hierarchy and dependency rules.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use fundtrack_shared::types::TaskId;
use serde::Serialize;

use super::error::ProgressError;
use super::types::{ProjectTask, TaskInput, TaskStatus};
use crate::project::clean_optional;

/// A task with its subtasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskNode {
    /// The task.
    #[serde(flatten)]
    pub task: ProjectTask,
    /// Subtasks ordered by start date, then name.
    pub children: Vec<TaskNode>,
}

/// Task service for business logic.
pub struct ProgressService;

impl ProgressService {
    /// Validates a task input and trims its text fields.
    pub fn normalize(mut input: TaskInput) -> Result<TaskInput, ProgressError> {
        input.name = input.name.trim().to_string();
        if input.name.is_empty() {
            return Err(ProgressError::EmptyName);
        }
        if input.progress > 100 {
            return Err(ProgressError::InvalidProgress(input.progress));
        }
        if input.end_date < input.start_date {
            return Err(ProgressError::DateOrder {
                start: input.start_date,
                end: input.end_date,
            });
        }
        if input.progress == 100 {
            input.status = TaskStatus::Completed;
        }
        input.description = clean_optional(input.description);
        input.assignee = clean_optional(input.assignee);
        input.phase = clean_optional(input.phase);
        input.dependencies.sort();
        input.dependencies.dedup();
        Ok(input)
    }

    /// Checks the parent of `task_id` (or of a new task) and returns the
    /// task's level.
    ///
    /// `tasks` are all tasks of the project.
    pub fn resolve_level(
        tasks: &[ProjectTask],
        task_id: Option<TaskId>,
        parent_id: Option<TaskId>,
    ) -> Result<u32, ProgressError> {
        let Some(parent_id) = parent_id else {
            return Ok(0);
        };
        let by_id: HashMap<TaskId, &ProjectTask> = tasks.iter().map(|t| (t.id, t)).collect();
        let parent = by_id
            .get(&parent_id)
            .ok_or(ProgressError::UnknownTask(parent_id))?;

        if let Some(task_id) = task_id {
            let mut cursor = Some(parent_id);
            let mut seen = HashSet::new();
            while let Some(id) = cursor {
                if id == task_id {
                    return Err(ProgressError::ParentCycle(task_id));
                }
                if !seen.insert(id) {
                    break;
                }
                cursor = by_id.get(&id).and_then(|t| t.parent_id);
            }
        }

        Ok(parent.level + 1)
    }

    /// Checks that `dependencies` exist in the project and keep the
    /// dependency graph acyclic.
    pub fn validate_dependencies(
        tasks: &[ProjectTask],
        task_id: Option<TaskId>,
        dependencies: &[TaskId],
    ) -> Result<(), ProgressError> {
        let graph: HashMap<TaskId, &[TaskId]> = tasks
            .iter()
            .map(|t| (t.id, t.dependencies.as_slice()))
            .collect();

        for dep in dependencies {
            if Some(*dep) == task_id {
                return Err(ProgressError::SelfDependency);
            }
            if !graph.contains_key(dep) {
                return Err(ProgressError::UnknownTask(*dep));
            }
        }

        // A new task has no dependents, so it cannot close a cycle.
        let Some(task_id) = task_id else {
            return Ok(());
        };

        for dep in dependencies {
            let mut stack = vec![*dep];
            let mut seen = HashSet::new();
            while let Some(current) = stack.pop() {
                if current == task_id {
                    return Err(ProgressError::DependencyCycle(*dep));
                }
                if seen.insert(current) {
                    stack.extend(graph.get(&current).copied().unwrap_or_default());
                }
            }
        }
        Ok(())
    }

    /// Status as displayed on `today`: full progress completes a task and an
    /// unfinished task past its end date is delayed.
    #[must_use]
    pub fn effective_status(task: &ProjectTask, today: NaiveDate) -> TaskStatus {
        if task.progress >= 100 || task.status == TaskStatus::Completed {
            TaskStatus::Completed
        } else if task.end_date < today {
            TaskStatus::Delayed
        } else {
            task.status
        }
    }

    /// Nests tasks under their parents. Tasks whose parent is missing are
    /// treated as top-level.
    #[must_use]
    pub fn build_tree(tasks: &[ProjectTask]) -> Vec<TaskNode> {
        let ids: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();
        let mut children: HashMap<Option<TaskId>, Vec<&ProjectTask>> = HashMap::new();
        for task in tasks {
            let parent = task.parent_id.filter(|p| ids.contains(p) && *p != task.id);
            children.entry(parent).or_default().push(task);
        }
        for siblings in children.values_mut() {
            siblings.sort_by(|a, b| {
                a.start_date
                    .cmp(&b.start_date)
                    .then_with(|| a.name.cmp(&b.name))
            });
        }

        attach(None, &children, &mut HashSet::new())
    }

    /// Ids of `root` and all of its descendants.
    #[must_use]
    pub fn subtree_ids(tasks: &[ProjectTask], root: TaskId) -> Vec<TaskId> {
        let mut result = vec![root];
        let mut cursor = 0;
        while cursor < result.len() {
            let current = result[cursor];
            result.extend(
                tasks
                    .iter()
                    .filter(|t| t.parent_id == Some(current) && !result.contains(&t.id))
                    .map(|t| t.id)
                    .collect::<Vec<_>>(),
            );
            cursor += 1;
        }
        result
    }

    /// New levels for the descendants of `root` once `root` sits at
    /// `root_level`.
    #[must_use]
    pub fn relevel(tasks: &[ProjectTask], root: TaskId, root_level: u32) -> Vec<(TaskId, u32)> {
        let mut levels: HashMap<TaskId, u32> = HashMap::from([(root, root_level)]);
        let mut changes = Vec::new();
        for id in Self::subtree_ids(tasks, root).into_iter().skip(1) {
            let Some(task) = tasks.iter().find(|t| t.id == id) else {
                continue;
            };
            let parent_level = task
                .parent_id
                .and_then(|p| levels.get(&p).copied())
                .unwrap_or(root_level);
            let level = parent_level + 1;
            levels.insert(id, level);
            if task.level != level {
                changes.push((id, level));
            }
        }
        changes
    }

    /// Tasks whose dependency list mentions any of `removed`, with the list
    /// they should keep.
    #[must_use]
    pub fn strip_dependencies(
        tasks: &[ProjectTask],
        removed: &[TaskId],
    ) -> Vec<(TaskId, Vec<TaskId>)> {
        tasks
            .iter()
            .filter(|t| !removed.contains(&t.id))
            .filter(|t| t.dependencies.iter().any(|d| removed.contains(d)))
            .map(|t| {
                let kept = t
                    .dependencies
                    .iter()
                    .copied()
                    .filter(|d| !removed.contains(d))
                    .collect();
                (t.id, kept)
            })
            .collect()
    }
}

fn attach(
    parent: Option<TaskId>,
    children: &HashMap<Option<TaskId>, Vec<&ProjectTask>>,
    visited: &mut HashSet<TaskId>,
) -> Vec<TaskNode> {
    let mut nodes = Vec::new();
    for task in children.get(&parent).into_iter().flatten() {
        if !visited.insert(task.id) {
            continue;
        }
        nodes.push(TaskNode {
            task: (*task).clone(),
            children: attach(Some(task.id), children, visited),
        });
    }
    nodes
}
