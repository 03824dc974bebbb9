//! Application state shared across handlers.

use crate::auth::Authenticator;
use std::sync::Arc;
use strongbox_core::config::AppConfig;
use strongbox_core::token::TokenService;
use strongbox_metadata::MetadataStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Token validation and identity resolution.
    pub authenticator: Authenticator,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: AppConfig, metadata: Arc<dyn MetadataStore>) -> Self {
        let tokens = TokenService::new(&config.auth.jwt_secret, config.auth.token_ttl());
        let authenticator = Authenticator::new(tokens, metadata.clone());

        Self {
            config: Arc::new(config),
            metadata,
            authenticator,
        }
    }

    /// Get the token service used for issuing session tokens.
    pub fn tokens(&self) -> &TokenService {
        self.authenticator.tokens()
    }
}
