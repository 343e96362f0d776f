//! Application error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::RecordId;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "validation failed: unknown hotel field `stars`"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                |
/// |-----------|-----------------|----------------------------|
/// | 1000–1999 | Client input    | 400 Bad Request            |
/// | 2000–2999 | Not Found       | 404 Not Found              |
/// | 3000–3999 | Server          | 500 / 502                  |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request: unreadable form body, bad page token.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Submitted field set does not fit the record's columns.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Attached file cannot be accepted for upload.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// Record with the given ID does not exist.
    #[error("{kind} not found: {id}")]
    RecordNotFound {
        /// Record kind (`"hotel"` or `"customer"`).
        kind: &'static str,
        /// Requested identifier.
        id: RecordId,
    },

    /// Database failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Blob store rejected or failed the upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// Template rendering failure.
    #[error("render error: {0}")]
    Render(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Validation(_) => 1002,
            Self::InvalidUpload(_) => 1003,
            Self::RecordNotFound { .. } => 2001,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::Render(_) => 3002,
            Self::Upload(_) => 3003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Validation(_) | Self::InvalidUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::RecordNotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upload(_) => StatusCode::BAD_GATEWAY,
            Self::Persistence(_) | Self::Render(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
