//! Database models mapping to the metadata schema.

use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User account record.
///
/// Accounts are created only via registration and are never updated or
/// deleted by this core. `email` is the login handle and the token
/// subject claim; it is compared literally, with no case normalization.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub email: String,
    /// Argon2id PHC string. Never stored or transmitted in plain form.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Encrypted metadata record.
///
/// The payload columns (`ciphertext`, `salt`, `iv`, `algorithm`) are
/// opaque client artifacts; the server stores and returns them verbatim
/// and never decrypts or inspects them. `user_id` is set at creation
/// and every query must filter on it.
#[derive(Debug, Clone, FromRow)]
pub struct MetadataRecordRow {
    pub record_id: Uuid,
    pub user_id: Uuid,
    /// Client-supplied identifier of the external file, min length 8.
    /// Not unique: duplicates under one owner are allowed and resolved
    /// by most-recent-wins in single-record lookups.
    pub file_id: String,
    pub ciphertext: String,
    pub salt: String,
    pub iv: String,
    pub algorithm: String,
    pub created_at: OffsetDateTime,
    /// Set at creation and never mutated; there is no update endpoint.
    pub updated_at: OffsetDateTime,
}
