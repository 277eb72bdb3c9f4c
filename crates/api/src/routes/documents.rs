//! Project document routes.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, put},
};
use fundtrack_core::attachment::AttachmentKind;
use fundtrack_core::records::{DocumentInput, ProjectDocument};
use fundtrack_db::DocumentRepository;
use fundtrack_shared::types::{DocumentId, ProjectId};

use super::RecordQuery;
use super::attachments::{self, AttachmentResponse};
use crate::AppState;
use crate::error::ApiResult;
use crate::extractors::Operator;

/// Creates the document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects/{project_id}/documents",
            get(list_documents).post(create_document),
        )
        .route(
            "/documents/{document_id}",
            get(get_document).put(update_document).delete(delete_document),
        )
        .route(
            "/documents/{document_id}/file",
            put(upload_file).get(download_file).delete(remove_file),
        )
}

/// GET `/projects/{project_id}/documents`
async fn list_documents(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<RecordQuery>,
) -> ApiResult<Json<Vec<ProjectDocument>>> {
    let documents = DocumentRepository::new(state.db.clone())
        .list(project_id, &query.into())
        .await?;
    Ok(Json(documents))
}

/// POST `/projects/{project_id}/documents`
async fn create_document(
    State(state): State<AppState>,
    operator: Operator,
    Path(project_id): Path<ProjectId>,
    Json(input): Json<DocumentInput>,
) -> ApiResult<(StatusCode, Json<ProjectDocument>)> {
    let document = DocumentRepository::new(state.db.clone())
        .create(project_id, input, operator.name())
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET `/documents/{document_id}`
async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
) -> ApiResult<Json<ProjectDocument>> {
    let document = DocumentRepository::new(state.db.clone()).get(document_id).await?;
    Ok(Json(document))
}

/// PUT `/documents/{document_id}`
async fn update_document(
    State(state): State<AppState>,
    operator: Operator,
    Path(document_id): Path<DocumentId>,
    Json(input): Json<DocumentInput>,
) -> ApiResult<Json<ProjectDocument>> {
    let document = DocumentRepository::new(state.db.clone())
        .update(document_id, input, operator.name())
        .await?;
    Ok(Json(document))
}

/// DELETE `/documents/{document_id}`
async fn delete_document(
    State(state): State<AppState>,
    operator: Operator,
    Path(document_id): Path<DocumentId>,
) -> ApiResult<StatusCode> {
    let key = DocumentRepository::new(state.db.clone())
        .delete(document_id, operator.name())
        .await?;
    state.attachments(operator.name()).purge(key).await;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/documents/{document_id}/file`
///
/// Also stamps the document's upload time.
async fn upload_file(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    operator: Operator,
    multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    attachments::upload(
        &state,
        &operator,
        AttachmentKind::Document,
        document_id.into_inner(),
        multipart,
    )
    .await
}

/// GET `/documents/{document_id}/file`
async fn download_file(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
) -> ApiResult<Response> {
    attachments::download(&state, AttachmentKind::Document, document_id.into_inner()).await
}

/// DELETE `/documents/{document_id}/file`
async fn remove_file(
    State(state): State<AppState>,
    Path(document_id): Path<DocumentId>,
    operator: Operator,
) -> ApiResult<StatusCode> {
    attachments::remove(&state, &operator, AttachmentKind::Document, document_id.into_inner()).await
}
