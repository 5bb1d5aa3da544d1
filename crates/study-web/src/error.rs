//! Mapping of the error taxonomy onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use study_core::Error;

/// API-facing error wrapper.
///
/// Every response body is `{"msg": ...}` with an optional `details`
/// field. Internal failures are logged with full detail and surface only
/// a generic message.
pub struct ApiError {
    error: Error,
    details: Option<String>,
}

impl ApiError {
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self {
            error,
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self.error {
            Error::Validation(msg) | Error::Conflict(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            Error::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Storage(_) | Error::Io(_) | Error::Json(_) => {
                tracing::error!("internal error: {}", self.error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = match self.details {
            Some(details) => json!({ "msg": msg, "details": details }),
            None => json!({ "msg": msg }),
        };

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
