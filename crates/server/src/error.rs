//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("authentication failed: {0}")]
    Auth(#[from] strongbox_core::AuthError),

    #[error("metadata error: {0}")]
    Metadata(#[from] strongbox_metadata::MetadataError),

    #[error("core error: {0}")]
    Core(#[from] strongbox_core::Error),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) | Self::Auth(_) => "unauthorized",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) | Self::Core(_) => "internal_error",
            Self::Metadata(e) => match e {
                strongbox_metadata::MetadataError::NotFound(_) => "not_found",
                strongbox_metadata::MetadataError::AlreadyExists(_) => "conflict",
                _ => "internal_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // All authentication failures map to one status: callers
            // must not be able to distinguish malformed, expired, and
            // unknown-subject tokens.
            Self::Unauthorized(_) | Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Metadata(e) => match e {
                strongbox_metadata::MetadataError::NotFound(_) => StatusCode::NOT_FOUND,
                strongbox_metadata::MetadataError::AlreadyExists(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Token failures get one generic body; the specific cause only
        // reaches the logs. Store-level failures likewise stay generic.
        let message = match &self {
            Self::Auth(e) => {
                tracing::debug!(error = %e, "request authentication failed");
                "invalid authentication credentials".to_string()
            }
            _ if status.is_server_error() => {
                tracing::error!(error = %self, "request failed");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse {
            code: self.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
