//! Authentication middleware and request identity resolution.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use strongbox_core::token::TokenService;
use strongbox_core::AuthError;
use strongbox_metadata::models::UserRow;
use strongbox_metadata::MetadataStore;
use tracing::Instrument;
use uuid::Uuid;

/// Authenticated request extension.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    /// The account the bearer token resolved to.
    pub user: UserRow,
}

impl AuthenticatedUser {
    /// Get the account id.
    pub fn user_id(&self) -> Uuid {
        self.user.user_id
    }
}

/// Resolves bearer tokens to accounts.
///
/// Validation and directory lookup are a single step: a token whose
/// subject no longer exists is as invalid as a forged one.
#[derive(Clone)]
pub struct Authenticator {
    tokens: TokenService,
    metadata: Arc<dyn MetadataStore>,
}

impl Authenticator {
    /// Create a new authenticator.
    pub fn new(tokens: TokenService, metadata: Arc<dyn MetadataStore>) -> Self {
        Self { tokens, metadata }
    }

    /// Get the underlying token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Resolve a bearer token to the account it identifies.
    ///
    /// The token subject is the account email; a verified token whose
    /// subject has no account in the directory is rejected the same
    /// way a forged token is. Store failures surface separately.
    pub async fn resolve(&self, token: &str) -> ApiResult<AuthenticatedUser> {
        let subject = self.tokens.validate(token)?;

        let user = self
            .metadata
            .find_user_by_email(&subject)
            .await?
            .ok_or(ApiError::Auth(AuthError::UserNotFound))?;

        Ok(AuthenticatedUser { user })
    }
}

/// Extract bearer token from Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
fn extract_bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            if v.len() >= 7 && v[..7].eq_ignore_ascii_case("bearer ") {
                Some(&v[7..])
            } else {
                None
            }
        })
}

/// Authentication middleware.
///
/// A presented-but-invalid token fails the request here; an absent
/// token passes through so public routes keep working, and protected
/// handlers reject via [`require_auth`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    if let Some(token) = extract_bearer_token(&req) {
        let auth = state.authenticator.resolve(token).await?;
        req.extensions_mut().insert(auth);
    }

    let response = next
        .run(req)
        .instrument(tracing::info_span!("request", request_id = %request_id))
        .await;

    Ok(response)
}

/// Require authentication (token must be present and resolved).
pub fn require_auth(req: &Request) -> ApiResult<&AuthenticatedUser> {
    req.extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::Unauthorized("invalid authentication credentials".to_string()))
}
