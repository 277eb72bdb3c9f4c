//! Shared handlers for the single file attached to a record.
//!
//! Uploads are `multipart/form-data` with the file in a field named `file`.

use axum::{
    Json,
    body::Body,
    extract::Multipart,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use fundtrack_core::attachment::AttachmentKind;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::extractors::Operator;

/// Form field carrying the file.
pub const FILE_FIELD: &str = "file";

/// Response for a stored attachment.
#[derive(Debug, Serialize)]
pub struct AttachmentResponse {
    /// Storage key now recorded on the record.
    pub key: String,
    /// Uploaded size in bytes.
    pub size: usize,
}

/// Reads the `file` field of a multipart body.
async fn read_file(mut multipart: Multipart) -> ApiResult<(String, Bytes)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or("attachment")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        return Ok((filename, data));
    }
    Err(ApiError::bad_request(format!("multipart field '{FILE_FIELD}' is required")))
}

/// Stores the uploaded file on the record, replacing any previous one.
pub async fn upload(
    state: &AppState,
    operator: &Operator,
    kind: AttachmentKind,
    item_id: Uuid,
    multipart: Multipart,
) -> ApiResult<Json<AttachmentResponse>> {
    let (filename, data) = read_file(multipart).await?;
    let size = data.len();
    let key = state
        .attachments(operator.name())
        .upload(kind, item_id, &filename, data)
        .await?;
    Ok(Json(AttachmentResponse { key, size }))
}

/// Streams the record's file back with its content type.
pub async fn download(
    state: &AppState,
    kind: AttachmentKind,
    item_id: Uuid,
) -> ApiResult<Response> {
    let file = state
        .attachments(&state.config.operator.default_name)
        .download(kind, item_id)
        .await?;
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", file.filename))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(file.data),
    )
        .into_response())
}

/// Detaches and deletes the record's file.
pub async fn remove(
    state: &AppState,
    operator: &Operator,
    kind: AttachmentKind,
    item_id: Uuid,
) -> ApiResult<StatusCode> {
    state.attachments(operator.name()).remove(kind, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
