//! Project task repository.

use chrono::{NaiveDate, Utc};
use fundtrack_core::audit::{ActionKind, ActivityEntry, EntityKind};
use fundtrack_core::progress::{
    GanttChart, ProgressService, ProjectTask, TaskInput, TaskNode, TaskStatus,
};
use fundtrack_shared::types::{ProjectId, TaskId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::activity_log::ActivityLogRepository;
use super::project::load_project;
use crate::codec::{decode, from_json, narrow, to_json};
use crate::entities::project_tasks;
use crate::error::RepositoryError;

/// Task repository.
#[derive(Debug, Clone)]
pub struct TaskRepository {
    db: DatabaseConnection,
}

impl TaskRepository {
    /// Creates a new task repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Tasks of a project ordered by start date, then name.
    pub async fn list(&self, project_id: ProjectId) -> Result<Vec<ProjectTask>, RepositoryError> {
        load_project(&self.db, project_id).await?;
        project_tasks_of(&self.db, project_id).await
    }

    /// Tasks of a project nested under their parents.
    pub async fn tree(&self, project_id: ProjectId) -> Result<Vec<TaskNode>, RepositoryError> {
        let tasks = self.list(project_id).await?;
        Ok(ProgressService::build_tree(&tasks))
    }

    /// Gantt rows of a project as seen on `today`.
    pub async fn gantt(
        &self,
        project_id: ProjectId,
        today: NaiveDate,
    ) -> Result<GanttChart, RepositoryError> {
        let tasks = self.list(project_id).await?;
        Ok(GanttChart::build(&tasks, today))
    }

    /// Gets a task by ID.
    pub async fn get(&self, id: TaskId) -> Result<ProjectTask, RepositoryError> {
        into_task(load_task(&self.db, id).await?).map_err(Into::into)
    }

    /// Adds a task. Its parent and dependencies must belong to the project.
    pub async fn create(
        &self,
        project_id: ProjectId,
        input: TaskInput,
        operator: &str,
    ) -> Result<ProjectTask, RepositoryError> {
        let input = ProgressService::normalize(input)?;

        let txn = self.db.begin().await?;
        load_project(&txn, project_id).await?;
        let tasks = project_tasks_of(&txn, project_id).await?;
        let level = ProgressService::resolve_level(&tasks, None, input.parent_id)?;
        ProgressService::validate_dependencies(&tasks, None, &input.dependencies)?;

        let now = Utc::now();
        let model = project_tasks::ActiveModel {
            id: Set(TaskId::new().into_inner()),
            project_id: Set(project_id.into_inner()),
            parent_id: Set(input.parent_id.map(TaskId::into_inner)),
            level: Set(narrow("level", level)?),
            name: Set(input.name),
            description: Set(input.description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            status: Set(input.status.as_str().to_string()),
            progress: Set(i32::from(input.progress)),
            dependencies: Set(to_json(&input.dependencies)?),
            assignee: Set(input.assignee),
            phase: Set(input.phase),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;
        let task = into_task(model)?;

        let entry = ActivityEntry::new(
            EntityKind::Task,
            ActionKind::Create,
            format!("added task '{}'", task.name),
        )
        .project(project_id)
        .by(operator)
        .after(&task);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(task)
    }

    /// Replaces a task's fields. Moving it under another parent re-levels its
    /// subtasks.
    pub async fn update(
        &self,
        id: TaskId,
        input: TaskInput,
        operator: &str,
    ) -> Result<ProjectTask, RepositoryError> {
        let input = ProgressService::normalize(input)?;

        let txn = self.db.begin().await?;
        let model = load_task(&txn, id).await?;
        let before = into_task(model.clone())?;
        let tasks = project_tasks_of(&txn, before.project_id).await?;
        let level = ProgressService::resolve_level(&tasks, Some(id), input.parent_id)?;
        ProgressService::validate_dependencies(&tasks, Some(id), &input.dependencies)?;

        let mut active: project_tasks::ActiveModel = model.into();
        active.parent_id = Set(input.parent_id.map(TaskId::into_inner));
        active.level = Set(narrow("level", level)?);
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.status = Set(input.status.as_str().to_string());
        active.progress = Set(i32::from(input.progress));
        active.dependencies = Set(to_json(&input.dependencies)?);
        active.assignee = Set(input.assignee);
        active.phase = Set(input.phase);
        active.updated_at = Set(Utc::now());
        let after = into_task(active.update(&txn).await?)?;

        for (child, child_level) in ProgressService::relevel(&tasks, id, level) {
            let model = load_task(&txn, child).await?;
            let mut active: project_tasks::ActiveModel = model.into();
            active.level = Set(narrow("level", child_level)?);
            active.update(&txn).await?;
        }

        let entry = ActivityEntry::new(
            EntityKind::Task,
            ActionKind::Update,
            format!("updated task '{}'", after.name),
        )
        .project(after.project_id)
        .by(operator)
        .before(&before)
        .after(&after);
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(after)
    }

    /// Deletes a task with its subtasks and drops them from the dependency
    /// lists of the remaining tasks.
    pub async fn delete(&self, id: TaskId, operator: &str) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let model = load_task(&txn, id).await?;
        let before = into_task(model.clone())?;
        let tasks = project_tasks_of(&txn, before.project_id).await?;
        let removed = ProgressService::subtree_ids(&tasks, id);

        for (task_id, kept) in ProgressService::strip_dependencies(&tasks, &removed) {
            let model = load_task(&txn, task_id).await?;
            let mut active: project_tasks::ActiveModel = model.into();
            active.dependencies = Set(to_json(&kept)?);
            active.update(&txn).await?;
        }
        // Subtasks follow through the parent_id cascade.
        project_tasks::Entity::delete_by_id(id.into_inner()).exec(&txn).await?;

        let entry = ActivityEntry::new(
            EntityKind::Task,
            ActionKind::Delete,
            format!("deleted task '{}'", before.name),
        )
        .project(before.project_id)
        .by(operator)
        .before(&before)
        .related(format!("{} task(s) removed", removed.len()));
        ActivityLogRepository::record(&txn, &entry).await?;
        txn.commit().await?;
        Ok(())
    }
}

async fn load_task<C: ConnectionTrait>(
    conn: &C,
    id: TaskId,
) -> Result<project_tasks::Model, RepositoryError> {
    project_tasks::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("task", id.into_inner()))
}

async fn project_tasks_of<C: ConnectionTrait>(
    conn: &C,
    project_id: ProjectId,
) -> Result<Vec<ProjectTask>, RepositoryError> {
    let models = project_tasks::Entity::find()
        .filter(project_tasks::Column::ProjectId.eq(project_id.into_inner()))
        .order_by_asc(project_tasks::Column::StartDate)
        .order_by_asc(project_tasks::Column::Name)
        .all(conn)
        .await?;
    models
        .into_iter()
        .map(|m| into_task(m).map_err(Into::into))
        .collect()
}

fn into_task(model: project_tasks::Model) -> Result<ProjectTask, DbErr> {
    Ok(ProjectTask {
        id: TaskId::from_uuid(model.id),
        project_id: ProjectId::from_uuid(model.project_id),
        parent_id: model.parent_id.map(TaskId::from_uuid),
        level: narrow("level", model.level)?,
        name: model.name,
        description: model.description,
        start_date: model.start_date,
        end_date: model.end_date,
        status: decode("status", &model.status, TaskStatus::parse)?,
        progress: narrow("progress", model.progress)?,
        dependencies: from_json(&model.dependencies)?,
        assignee: model.assignee,
        phase: model.phase,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
