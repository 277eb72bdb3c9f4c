//! Budget routes: the total budget, annual budgets and their usage.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use fundtrack_core::budget::{
    AllocationInput, AnnualBudgetInput, Budget, BudgetUsage, ProjectBudgetOverview,
};
use fundtrack_db::BudgetRepository;
use fundtrack_shared::types::{BudgetId, ProjectId};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects/{project_id}/budgets", get(budget_overview))
        .route("/projects/{project_id}/budgets/total", put(update_total_budget))
        .route("/projects/{project_id}/budgets/annual", post(create_annual_budget))
        .route(
            "/budgets/{budget_id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/{budget_id}/usage", get(budget_usage))
}

/// GET `/projects/{project_id}/budgets`
async fn budget_overview(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> ApiResult<Json<ProjectBudgetOverview>> {
    let overview = BudgetRepository::new(state.db.clone()).overview(project_id).await?;
    Ok(Json(overview))
}

/// PUT `/projects/{project_id}/budgets/total`
async fn update_total_budget(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<AllocationInput>,
) -> ApiResult<Json<Budget>> {
    let budget = BudgetRepository::new(state.db.clone())
        .update_total(project_id, &input, operator.name())
        .await?;
    Ok(Json(budget))
}

/// POST `/projects/{project_id}/budgets/annual`
async fn create_annual_budget(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<AnnualBudgetInput>,
) -> ApiResult<(StatusCode, Json<Budget>)> {
    let budget = BudgetRepository::new(state.db.clone())
        .create_annual(project_id, &input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET `/budgets/{budget_id}`
async fn get_budget(
    State(state): State<AppState>,
    Path(budget_id): Path<BudgetId>,
) -> ApiResult<Json<Budget>> {
    let budget = BudgetRepository::new(state.db.clone()).get(budget_id).await?;
    Ok(Json(budget))
}

/// PUT `/budgets/{budget_id}`
async fn update_budget(
    State(state): State<AppState>,
    operator: Operator,
    Path(budget_id): Path<BudgetId>,
    Json(input): Json<AllocationInput>,
) -> ApiResult<Json<Budget>> {
    let budget = BudgetRepository::new(state.db.clone())
        .update_annual(budget_id, &input, operator.name())
        .await?;
    Ok(Json(budget))
}

/// DELETE `/budgets/{budget_id}`
///
/// Deleting the total budget removes every budget of the project.
async fn delete_budget(
    State(state): State<AppState>,
    operator: Operator,
    Path(budget_id): Path<BudgetId>,
) -> ApiResult<StatusCode> {
    let keys = BudgetRepository::new(state.db.clone())
        .delete_budget(budget_id, operator.name())
        .await?;
    info!(budget_id = %budget_id, vouchers = keys.len(), "budget deleted");
    state.attachments(operator.name()).purge(keys).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/budgets/{budget_id}/usage`
async fn budget_usage(
    State(state): State<AppState>,
    Path(budget_id): Path<BudgetId>,
) -> ApiResult<Json<BudgetUsage>> {
    let usage = BudgetRepository::new(state.db.clone()).get_usage(budget_id).await?;
    Ok(Json(usage))
}
