//! HTTP mapping of domain failures

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::DomainError;

/// Error returned by every catalog handler.
///
/// Body shape: `{"errors": ["message", ...]}`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Duplicate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError(e)
    }
}

// Malformed bodies are a 400, never axum's default 422
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DomainError::validation(rejection.body_text()))
    }
}

// Unparsable path segments get the same JSON error body
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(DomainError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let errors = match &self.0 {
            DomainError::Database(detail) => {
                tracing::error!("Persistence failure: {}", detail);
                vec!["A problem happened while handling your request".to_string()]
            }
            other => {
                tracing::warn!(status = status.as_u16(), "Request rejected: {}", other);
                other.messages()
            }
        };

        (status, Json(json!({ "errors": errors }))).into_response()
    }
}
