//! Core error types.

use thiserror::Error;

/// Failures while resolving a request identity.
///
/// The HTTP layer surfaces all three variants uniformly as an
/// unauthorized response; the distinction exists for logging and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// The token could not be parsed, its signature did not verify,
    /// or its expiry has passed. Expiry is embedded in the signed
    /// payload and checked by the same verification step, so expired
    /// tokens fail here rather than through a separate variant.
    #[error("token is malformed or failed verification")]
    TokenMalformed,

    /// The signature verified but the payload carries no subject claim.
    #[error("token carries no subject claim")]
    TokenMissingSubject,

    /// The token subject does not match any account in the directory.
    /// Covers tokens issued for a since-removed account.
    #[error("no account matches the token subject")]
    UserNotFound,
}

/// Core operation errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("token encoding failed: {0}")]
    TokenEncoding(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
