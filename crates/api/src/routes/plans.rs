//! Budget plan routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use fundtrack_core::plan::{BudgetPlan, BudgetPlanDetail, BudgetPlanInput};
use fundtrack_db::PlanRepository;
use fundtrack_shared::types::BudgetPlanId;

use crate::AppState;
use crate::error::ApiResult;

/// Creates the budget plan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/{plan_id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}

/// GET `/plans`
async fn list_plans(State(state): State<AppState>) -> ApiResult<Json<Vec<BudgetPlan>>> {
    let plans = PlanRepository::new(state.db.clone()).list().await?;
    Ok(Json(plans))
}

/// POST `/plans`
///
/// Category and plan totals are rolled up from the lines.
async fn create_plan(
    State(state): State<AppState>,
    Json(input): Json<BudgetPlanInput>,
) -> ApiResult<(StatusCode, Json<BudgetPlanDetail>)> {
    let plan = PlanRepository::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET `/plans/{plan_id}`
async fn get_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<BudgetPlanId>,
) -> ApiResult<Json<BudgetPlanDetail>> {
    let plan = PlanRepository::new(state.db.clone()).get(plan_id).await?;
    Ok(Json(plan))
}

/// PUT `/plans/{plan_id}`
async fn update_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<BudgetPlanId>,
    Json(input): Json<BudgetPlanInput>,
) -> ApiResult<Json<BudgetPlanDetail>> {
    let plan = PlanRepository::new(state.db.clone())
        .update(plan_id, input)
        .await?;
    Ok(Json(plan))
}

/// DELETE `/plans/{plan_id}`
async fn delete_plan(
    State(state): State<AppState>,
    Path(plan_id): Path<BudgetPlanId>,
) -> ApiResult<StatusCode> {
    PlanRepository::new(state.db.clone()).delete(plan_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
