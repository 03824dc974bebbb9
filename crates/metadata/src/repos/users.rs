//! User directory repository.

use crate::error::MetadataResult;
use crate::models::UserRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for user accounts.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a new account.
    ///
    /// Fails with `AlreadyExists` when the email is already registered.
    /// Enforced by the store's unique index, not a prior existence
    /// check, so concurrent registrations with the same email cannot
    /// both commit.
    async fn create_user(&self, user: &UserRow) -> MetadataResult<()>;

    /// Exact-match lookup by email. No case normalization.
    async fn find_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>>;

    /// Lookup by id.
    async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>>;
}
