//! Encrypted metadata record repository.
//!
//! Every operation takes the owner's id as a mandatory filter. The
//! owner is always the resolved request identity, never client input;
//! this is the tenant-isolation invariant.

use crate::error::MetadataResult;
use crate::models::MetadataRecordRow;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository for encrypted metadata records.
#[async_trait]
pub trait RecordRepo: Send + Sync {
    /// Insert a record unconditionally. Duplicate `(owner, file_id)`
    /// pairs yield distinct records.
    async fn create_record(&self, record: &MetadataRecordRow) -> MetadataResult<()>;

    /// All records for the owner, newest first.
    async fn list_records(&self, user_id: Uuid) -> MetadataResult<Vec<MetadataRecordRow>>;

    /// Single record by file id. When duplicates exist the most recent
    /// `created_at` wins, with `record_id` as the final tie-break, so
    /// lookup and delete always agree on which record they touch.
    async fn get_record_by_file_id(
        &self,
        user_id: Uuid,
        file_id: &str,
    ) -> MetadataResult<Option<MetadataRecordRow>>;

    /// Delete at most one record: the same one `get_record_by_file_id`
    /// would return. Returns false when nothing matched.
    async fn delete_record(&self, user_id: Uuid, file_id: &str) -> MetadataResult<bool>;

    /// Delete every owned record whose file id is in the set; returns
    /// the count deleted. Absent ids contribute zero and are not errors.
    async fn delete_records(&self, user_id: Uuid, file_ids: &[String]) -> MetadataResult<u64>;

    /// Delete every record for the owner; returns the count deleted.
    async fn delete_all_records(&self, user_id: Uuid) -> MetadataResult<u64>;
}
