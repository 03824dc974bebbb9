//! Shared handler helpers.

use crate::error::{ApiError, ApiResult};
use axum::extract::Request;
use serde::de::DeserializeOwned;
use strongbox_core::{MIN_FILE_ID_LEN, MIN_PASSWORD_LEN};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Maximum accepted request body size in bytes.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Read and deserialize a JSON request body.
///
/// Used by handlers that also need the request extensions (auth), so
/// they take `Request` whole instead of a `Json<T>` extractor.
pub async fn read_json_body<T: DeserializeOwned>(req: Request) -> ApiResult<T> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_SIZE)
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read body: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

/// Format a timestamp for API responses.
pub fn format_timestamp(ts: OffsetDateTime) -> ApiResult<String> {
    ts.format(&Rfc3339)
        .map_err(|e| ApiError::Internal(format!("timestamp formatting failed: {e}")))
}

/// Validate an email address shape.
///
/// Intentionally loose: one '@' with non-empty local and domain parts.
/// The address is otherwise treated as an opaque, case-sensitive key.
pub fn validate_email(email: &str) -> ApiResult<()> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ApiError::BadRequest("invalid email address".to_string()));
    }
    Ok(())
}

/// Validate password length.
pub fn validate_password(password: &str) -> ApiResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a client-supplied file identifier.
pub fn validate_file_id(file_id: &str) -> ApiResult<()> {
    if file_id.len() < MIN_FILE_ID_LEN {
        return Err(ApiError::BadRequest(format!(
            "file_id must be at least {MIN_FILE_ID_LEN} characters"
        )));
    }
    Ok(())
}
