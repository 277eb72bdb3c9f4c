//! Project outcome routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, put},
};
use fundtrack_core::attachment::AttachmentKind;
use fundtrack_core::records::{OutcomeInput, ProjectOutcome};
use fundtrack_db::OutcomeRepository;
use fundtrack_shared::types::{OutcomeId, ProjectId};

use super::RecordQuery;
use super::attachments::{self, AttachmentResponse};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the outcome routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/outcomes",
            get(list_outcomes).post(create_outcome),
        )
        .route(
            "/outcomes/{outcome_id}",
            get(get_outcome).put(update_outcome).delete(delete_outcome),
        )
        .route(
            "/outcomes/{outcome_id}/attachment",
            put(upload_attachment)
                .get(download_attachment)
                .delete(remove_attachment),
        )
}

/// GET `/projects/{project_id}/outcomes`
async fn list_outcomes(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Json<Vec<ProjectOutcome>>> {
    let outcomes = OutcomeRepository::new(state.db.clone())
        .list(project_id, &query.into())
        .await?;
    Ok(Json(outcomes))
}

/// POST `/projects/{project_id}/outcomes`
async fn create_outcome(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<OutcomeInput>,
) -> ApiResult<(StatusCode, Json<ProjectOutcome>)> {
    let outcome = OutcomeRepository::new(state.db.clone())
        .create(project_id, input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// GET `/outcomes/{outcome_id}`
async fn get_outcome(
    State(state): State<AppState>,
    Path(outcome_id): Path<OutcomeId>,
) -> ApiResult<Json<ProjectOutcome>> {
    let outcome = OutcomeRepository::new(state.db.clone()).get(outcome_id).await?;
    Ok(Json(outcome))
}

/// PUT `/outcomes/{outcome_id}`
async fn update_outcome(
    State(state): State<AppState>,
    operator: Operator,
    Path(outcome_id): Path<OutcomeId>,
    Json(input): Json<OutcomeInput>,
) -> ApiResult<Json<ProjectOutcome>> {
    let outcome = OutcomeRepository::new(state.db.clone())
        .update(outcome_id, input, operator.name())
        .await?;
    Ok(Json(outcome))
}

/// DELETE `/outcomes/{outcome_id}`
async fn delete_outcome(
    State(state): State<AppState>,
    operator: Operator,
    Path(outcome_id): Path<OutcomeId>,
) -> ApiResult<StatusCode> {
    let key = OutcomeRepository::new(state.db.clone())
        .delete(outcome_id, operator.name())
        .await?;
    state.attachments(operator.name()).purge(key).await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/outcomes/{outcome_id}/attachment`
async fn upload_attachment(
    State(state): State<AppState>,
    Path(outcome_id): Path<OutcomeId>,
    operator: Operator,
    multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    attachments::upload(
        &state,
        &operator,
        AttachmentKind::Outcome,
        outcome_id.into_inner(),
        multipart,
    )
    .await
}

/// GET `/outcomes/{outcome_id}/attachment`
async fn download_attachment(
    State(state): State<AppState>,
    Path(outcome_id): Path<OutcomeId>,
) -> ApiResult<Response> {
    attachments::download(&state, AttachmentKind::Outcome, outcome_id.into_inner()).await
}

/// DELETE `/outcomes/{outcome_id}/attachment`
async fn remove_attachment(
    State(state): State<AppState>,
    Path(outcome_id): Path<OutcomeId>,
    operator: Operator,
) -> ApiResult<StatusCode> {
    attachments::remove(&state, &operator, AttachmentKind::Outcome, outcome_id.into_inner()).await
}
