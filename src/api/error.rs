//! HTTP error responses

use crate::error::{ErrorKind, QueueError};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    suggestions: Vec<String>,
}

/// A [`QueueError`] on its way to becoming an HTTP response
#[derive(Debug)]
pub struct ApiError(pub QueueError);

impl From<QueueError> for ApiError {
    fn from(err: QueueError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(QueueError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self(QueueError::custom(format!("Request task failed: {err}")))
    }
}

const fn error_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "VALIDATION",
        ErrorKind::NotFound => "NOT_FOUND",
        ErrorKind::Conflict => "CONFLICT",
        ErrorKind::Concurrency => "CONCURRENT_UPDATE",
        ErrorKind::Forbidden => "FORBIDDEN",
        ErrorKind::Internal => "INTERNAL",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let kind = self.0.kind();

        // Internal details stay in the log
        let error = if kind == ErrorKind::Internal {
            tracing::error!(error = %self.0, "Internal server error");
            "An internal error occurred".to_string()
        } else {
            self.0.user_message()
        };

        let body = ErrorResponse {
            error,
            code: error_code(kind),
            suggestions: self.0.suggestions(),
        };
        (status, Json(body)).into_response()
    }
}
