//! Project task routes and the Gantt view.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
};
use chrono::{NaiveDate, Utc};
use fundtrack_core::progress::{GanttChart, ProjectTask, TaskInput, TaskNode};
use fundtrack_db::TaskRepository;
use fundtrack_shared::types::{ProjectId, TaskId};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the task routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/tasks",
            get(list_tasks).post(create_task),
        )
        .route("/projects/{project_id}/gantt", get(gantt))
        .route(
            "/tasks/{task_id}",
            put(update_task).get(get_task).delete(delete_task),
        )
}

/// Query string for task listings.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Nest subtasks under their parents.
    #[serde(default)]
    pub tree: bool,
}

/// Flat or nested task list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TaskList {
    /// Ordered by start date.
    Flat(Vec<ProjectTask>),
    /// Root tasks with their subtasks.
    Tree(Vec<TaskNode>),
}

/// Query string for the Gantt view.
#[derive(Debug, Default, Deserialize)]
pub struct GanttQuery {
    /// Reference day for overdue detection; defaults to today.
    pub today: Option<NaiveDate>,
}

/// GET `/projects/{project_id}/tasks`
async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<TaskList>> {
    let repo = TaskRepository::new(state.db.clone());
    let list = if query.tree {
        TaskList::Tree(repo.tree(project_id).await?)
    } else {
        TaskList::Flat(repo.list(project_id).await?)
    };
    Ok(Json(list))
}

/// POST `/projects/{project_id}/tasks`
async fn create_task(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<TaskInput>,
) -> ApiResult<(StatusCode, Json<ProjectTask>)> {
    let task = TaskRepository::new(state.db.clone())
        .create(project_id, input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET `/projects/{project_id}/gantt`
async fn gantt(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<GanttQuery>,
) -> ApiResult<Json<GanttChart>> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let chart = TaskRepository::new(state.db.clone())
        .gantt(project_id, today)
        .await?;
    Ok(Json(chart))
}

/// GET `/tasks/{task_id}`
async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> ApiResult<Json<ProjectTask>> {
    let task = TaskRepository::new(state.db.clone()).get(task_id).await?;
    Ok(Json(task))
}

/// PUT `/tasks/{task_id}`
async fn update_task(
    State(state): State<AppState>,
    operator: Operator,
    Path(task_id): Path<TaskId>,
    Json(input): Json<TaskInput>,
) -> ApiResult<Json<ProjectTask>> {
    let task = TaskRepository::new(state.db.clone())
        .update(task_id, input, operator.name())
        .await?;
    Ok(Json(task))
}

/// DELETE `/tasks/{task_id}`
///
/// Subtasks go with it.
async fn delete_task(
    State(state): State<AppState>,
    operator: Operator,
    Path(task_id): Path<TaskId>,
) -> ApiResult<StatusCode> {
    TaskRepository::new(state.db.clone())
        .delete(task_id, operator.name())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
