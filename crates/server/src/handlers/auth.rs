//! Account registration and login.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, validate_email, validate_password};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use strongbox_core::password;
use strongbox_metadata::models::UserRow;
use strongbox_metadata::MetadataError;
use time::OffsetDateTime;
use uuid::Uuid;

/// Request body for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Account email, used as the login identifier.
    pub email: String,
    /// Plaintext password. Never stored.
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub created_at: String,
}

impl UserResponse {
    fn from_row(user: &UserRow) -> ApiResult<Self> {
        Ok(Self {
            id: user.user_id.to_string(),
            email: user.email.clone(),
            created_at: format_timestamp(user.created_at)?,
        })
    }
}

/// Response for successful registration and login.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: &'static str,
}

impl SessionResponse {
    fn new(state: &AppState, user: &UserRow) -> ApiResult<Self> {
        let access_token = state.tokens().issue(&user.email)?;
        Ok(Self {
            user: UserResponse::from_row(user)?,
            access_token,
            token_type: "bearer",
        })
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<SessionResponse>)> {
    validate_email(&body.email)?;
    validate_password(&body.password)?;

    // Advisory pre-check for a friendly error; the unique index on
    // email is the real authority under concurrent registration.
    if state.metadata.find_user_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let user = UserRow {
        user_id: Uuid::new_v4(),
        email: body.email,
        password_hash: password::hash_password(&body.password)?,
        created_at: OffsetDateTime::now_utc(),
    };

    match state.metadata.create_user(&user).await {
        Ok(()) => {}
        Err(MetadataError::AlreadyExists(_)) => {
            return Err(ApiError::Conflict("email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(user_id = %user.user_id, "registered new account");

    let session = SessionResponse::new(&state, &user)?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> ApiResult<Json<SessionResponse>> {
    // One failure message for unknown email and wrong password alike.
    let invalid = || ApiError::Unauthorized("incorrect email or password".to_string());

    let user = state
        .metadata
        .find_user_by_email(&body.email)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&body.password, &user.password_hash) {
        return Err(invalid());
    }

    tracing::debug!(user_id = %user.user_id, "login succeeded");

    let session = SessionResponse::new(&state, &user)?;
    Ok(Json(session))
}
