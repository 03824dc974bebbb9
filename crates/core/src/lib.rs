//! Core domain types and shared logic for the Strongbox metadata backend.
//!
//! This crate defines what the server and store crates share:
//! - Configuration model (server, auth, metadata backend)
//! - Credential hashing and verification
//! - Bearer token issuance and validation
//! - Authentication error taxonomy

pub mod config;
pub mod error;
pub mod password;
pub mod token;

pub use config::{AppConfig, AuthConfig, MetadataConfig, ServerConfig};
pub use error::{AuthError, Error, Result};
pub use token::TokenService;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum accepted file identifier length, in characters.
pub const MIN_FILE_ID_LEN: usize = 8;

/// Cipher name recorded when the client omits one. The server never
/// interprets it; it is stored and returned verbatim.
pub const DEFAULT_ALGORITHM: &str = "AES-GCM";
