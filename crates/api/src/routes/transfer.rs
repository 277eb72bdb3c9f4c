//! Project export/import as JSON bundles and budget workbooks.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use fundtrack_core::export::{ProjectBundle, budget_workbook};
use fundtrack_core::project::Project;
use fundtrack_db::{BudgetRepository, ExportRepository, ProjectRepository};
use fundtrack_shared::types::ProjectId;

use super::expenses::xlsx_response;
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the export/import routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects/import", post(import_project))
        .route("/projects/{project_id}/export", get(export_project))
        .route("/projects/{project_id}/budgets/export", get(export_budgets))
}

/// GET `/projects/{project_id}/export`
async fn export_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Json<ProjectBundle>> {
    let bundle = ExportRepository::new(state.db.clone())
        .export(project_id)
        .await?;
    Ok(Json(bundle))
}

/// POST `/projects/import`
///
/// Creates a new project from a bundle. Nothing is written if the bundle
/// is inconsistent.
async fn import_project(
    State(state): State<AppState>,
    operator: Operator,
    Json(bundle): Json<ProjectBundle>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = ExportRepository::new(state.db.clone())
        .import(bundle, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET `/projects/{project_id}/budgets/export`
async fn export_budgets(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Response> {
    let project = ProjectRepository::new(state.db.clone()).get(project_id).await?;
    let overview = BudgetRepository::new(state.db.clone())
        .overview(project_id)
        .await?;
    let bytes = budget_workbook(&project, &overview)?;
    let filename = format!("budget_{}.xlsx", project.project_code);
    Ok(xlsx_response(&filename, bytes))
}
