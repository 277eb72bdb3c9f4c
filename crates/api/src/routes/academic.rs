//! Academic activity routes. Activities are not tied to a project.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, put},
};
use fundtrack_core::attachment::AttachmentKind;
use fundtrack_core::records::{AcademicActivity, AcademicActivityInput};
use fundtrack_db::AcademicActivityRepository;
use fundtrack_shared::types::AcademicActivityId;

use super::RecordQuery;
use super::attachments::{self, AttachmentResponse};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the academic activity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/academic-activities",
            get(list_activities).post(create_activity),
        )
        .route(
            "/academic-activities/{activity_id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route(
            "/academic-activities/{activity_id}/attachment",
            put(upload_attachment)
                .get(download_attachment)
                .delete(remove_attachment),
        )
}

/// GET `/academic-activities`
async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Json<Vec<AcademicActivity>>> {
    let activities = AcademicActivityRepository::new(state.db.clone())
        .list(&query.into())
        .await?;
    Ok(Json(activities))
}

/// POST `/academic-activities`
async fn create_activity(
    State(state): State<AppState>,
    Json(input): Json<AcademicActivityInput>,
) -> ApiResult<(StatusCode, Json<AcademicActivity>)> {
    let activity = AcademicActivityRepository::new(state.db.clone()).create(input).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

/// GET `/academic-activities/{activity_id}`
async fn get_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
) -> ApiResult<Json<AcademicActivity>> {
    let activity = AcademicActivityRepository::new(state.db.clone()).get(activity_id).await?;
    Ok(Json(activity))
}

/// PUT `/academic-activities/{activity_id}`
async fn update_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
    Json(input): Json<AcademicActivityInput>,
) -> ApiResult<Json<AcademicActivity>> {
    let activity = AcademicActivityRepository::new(state.db.clone())
        .update(activity_id, input)
        .await?;
    Ok(Json(activity))
}

/// DELETE `/academic-activities/{activity_id}`
async fn delete_activity(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
) -> ApiResult<StatusCode> {
    let key = AcademicActivityRepository::new(state.db.clone()).delete(activity_id).await?;
    state.attachments(&state.config.operator.default_name).purge(key).await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/academic-activities/{activity_id}/attachment`
async fn upload_attachment(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
    operator: Operator,
    multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    attachments::upload(
        &state,
        &operator,
        AttachmentKind::Activity,
        activity_id.into_inner(),
        multipart,
    )
    .await
}

/// GET `/academic-activities/{activity_id}/attachment`
async fn download_attachment(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
) -> ApiResult<Response> {
    attachments::download(&state, AttachmentKind::Activity, activity_id.into_inner()).await
}

/// DELETE `/academic-activities/{activity_id}/attachment`
async fn remove_attachment(
    State(state): State<AppState>,
    Path(activity_id): Path<AcademicActivityId>,
    operator: Operator,
) -> ApiResult<StatusCode> {
    attachments::remove(&state, &operator, AttachmentKind::Activity, activity_id.into_inner()).await
}
