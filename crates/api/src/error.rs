//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fundtrack_shared::AppError;
use serde_json::json;

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler error rendered as `{"error": <code>, "message": <text>}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl<E> From<E> for ApiError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        // Internal details stay in the log.
        let message = match &self.0 {
            AppError::Database(_) | AppError::Internal(_) => "An internal error occurred",
            other => other.message(),
        };
        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = ApiError(err).into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AppError::NotFound("project x".into()), StatusCode::NOT_FOUND, "NOT_FOUND")]
    #[case(AppError::Validation("bad".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR")]
    #[case(
        AppError::BusinessRule("over".into()),
        StatusCode::UNPROCESSABLE_ENTITY,
        "BUSINESS_RULE_VIOLATION"
    )]
    #[case(AppError::Conflict("dup".into()), StatusCode::CONFLICT, "CONFLICT")]
    #[tokio::test]
    async fn test_status_and_body(
        #[case] err: AppError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let message = err.message().to_string();
        let (got_status, body) = render(err).await;
        assert_eq!(got_status, status);
        assert_eq!(body["error"], code);
        assert_eq!(body["message"], message);
    }

    #[tokio::test]
    async fn test_database_details_hidden() {
        let (status, body) = render(AppError::Database("disk I/O error".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
    }
}
