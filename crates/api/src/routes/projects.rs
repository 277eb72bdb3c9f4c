//! Project routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use fundtrack_core::project::{Project, ProjectInput, ProjectSummary};
use fundtrack_db::ProjectRepository;
use fundtrack_shared::types::ProjectId;
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{project_id}",
            get(get_project).put(update_project).delete(delete_project),
        )
}

/// GET `/projects`
async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectSummary>>> {
    let projects = ProjectRepository::new(state.db.clone()).list().await?;
    Ok(Json(projects))
}

/// POST `/projects`
async fn create_project(
    State(state): State<AppState>,
    operator: Operator,
    Json(input): Json<ProjectInput>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = ProjectRepository::new(state.db.clone())
        .create(input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET `/projects/{project_id}`
async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Json<Project>> {
    let project = ProjectRepository::new(state.db.clone()).get(project_id).await?;
    Ok(Json(project))
}

/// PUT `/projects/{project_id}`
async fn update_project(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<ProjectInput>,
) -> ApiResult<Json<Project>> {
    let project = ProjectRepository::new(state.db.clone())
        .update(project_id, input, operator.name())
        .await?;
    Ok(Json(project))
}

/// DELETE `/projects/{project_id}`
///
/// Removes the project with its budgets, expenses, tasks, outcomes and
/// documents, then their files.
async fn delete_project(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<StatusCode> {
    let keys = ProjectRepository::new(state.db.clone())
        .delete(project_id, operator.name())
        .await?;
    info!(project_id = %project_id, files = keys.len(), "project deleted");
    state.attachments(operator.name()).purge(keys).await;
    Ok(StatusCode::NO_CONTENT)
}
