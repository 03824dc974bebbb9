//! Tenant-scoped metadata record handlers.
//!
//! Every operation here resolves the caller first and scopes all store
//! access to that account. Record payloads are opaque encrypted
//! artifacts produced client-side; the server never inspects them.

use crate::auth::require_auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{format_timestamp, read_json_body, validate_file_id};
use crate::state::AppState;
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use strongbox_core::DEFAULT_ALGORITHM;
use strongbox_metadata::models::MetadataRecordRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Client-produced encryption artifacts. Opaque to the server: stored
/// and returned verbatim, never decrypted or inspected.
#[derive(Debug, Serialize, Deserialize)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    /// Key-derivation salt.
    pub salt: String,
    /// Cipher initialization vector.
    pub iv: String,
    /// Encryption algorithm label.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

/// Request body for creating a metadata record.
#[derive(Debug, Deserialize)]
pub struct CreateMetadataRequest {
    /// Client-chosen identifier for the underlying file.
    pub file_id: String,
    pub encrypted_data: EncryptedPayload,
}

/// Request body for deleting a set of records.
#[derive(Debug, Deserialize)]
pub struct DeleteSelectedRequest {
    pub file_ids: Vec<String>,
}

/// Public view of a metadata record.
#[derive(Debug, Serialize)]
pub struct MetadataResponse {
    pub id: String,
    pub user_id: String,
    pub file_id: String,
    pub encrypted_data: EncryptedPayload,
    pub created_at: String,
    pub updated_at: String,
}

impl MetadataResponse {
    fn from_row(row: &MetadataRecordRow) -> ApiResult<Self> {
        Ok(Self {
            id: row.record_id.to_string(),
            user_id: row.user_id.to_string(),
            file_id: row.file_id.clone(),
            encrypted_data: EncryptedPayload {
                ciphertext: row.ciphertext.clone(),
                salt: row.salt.clone(),
                iv: row.iv.clone(),
                algorithm: row.algorithm.clone(),
            },
            created_at: format_timestamp(row.created_at)?,
            updated_at: format_timestamp(row.updated_at)?,
        })
    }
}

/// Response for listing records.
#[derive(Debug, Serialize)]
pub struct MetadataListResponse {
    pub items: Vec<MetadataResponse>,
    pub total: usize,
}

/// Response for bulk deletions.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

/// POST /metadata
pub async fn create_metadata(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<(StatusCode, Json<MetadataResponse>)> {
    let auth = require_auth(&req)?.clone();
    let body: CreateMetadataRequest = read_json_body(req).await?;

    validate_file_id(&body.file_id)?;

    let now = OffsetDateTime::now_utc();
    let record = MetadataRecordRow {
        record_id: Uuid::new_v4(),
        user_id: auth.user_id(),
        file_id: body.file_id,
        ciphertext: body.encrypted_data.ciphertext,
        salt: body.encrypted_data.salt,
        iv: body.encrypted_data.iv,
        algorithm: body.encrypted_data.algorithm,
        created_at: now,
        updated_at: now,
    };

    state.metadata.create_record(&record).await?;

    tracing::debug!(
        user_id = %record.user_id,
        file_id = %record.file_id,
        "stored metadata record"
    );

    Ok((StatusCode::CREATED, Json(MetadataResponse::from_row(&record)?)))
}

/// GET /metadata
pub async fn list_metadata(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<MetadataListResponse>> {
    let auth = require_auth(&req)?;

    let rows = state.metadata.list_records(auth.user_id()).await?;
    let items = rows
        .iter()
        .map(MetadataResponse::from_row)
        .collect::<ApiResult<Vec<_>>>()?;

    let total = items.len();
    Ok(Json(MetadataListResponse { items, total }))
}

/// GET /metadata/{file_id}
pub async fn get_metadata(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    req: Request,
) -> ApiResult<Json<MetadataResponse>> {
    let auth = require_auth(&req)?;

    let row = state
        .metadata
        .get_record_by_file_id(auth.user_id(), &file_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("metadata record not found".to_string()))?;

    Ok(Json(MetadataResponse::from_row(&row)?))
}

/// DELETE /metadata/{file_id}
pub async fn delete_metadata(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
    req: Request,
) -> ApiResult<StatusCode> {
    let auth = require_auth(&req)?;

    if state
        .metadata
        .delete_record(auth.user_id(), &file_id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("metadata record not found".to_string()))
    }
}

/// POST /metadata/delete-selected
pub async fn delete_selected_metadata(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<DeletedResponse>> {
    let auth = require_auth(&req)?.clone();
    let body: DeleteSelectedRequest = read_json_body(req).await?;

    let deleted = state
        .metadata
        .delete_records(auth.user_id(), &body.file_ids)
        .await?;

    tracing::debug!(user_id = %auth.user_id(), deleted, "deleted selected records");
    Ok(Json(DeletedResponse { deleted }))
}

/// DELETE /metadata/all
pub async fn delete_all_metadata(
    State(state): State<AppState>,
    req: Request,
) -> ApiResult<Json<DeletedResponse>> {
    let auth = require_auth(&req)?;

    let deleted = state.metadata.delete_all_records(auth.user_id()).await?;

    tracing::info!(user_id = %auth.user_id(), deleted, "deleted all records for account");
    Ok(Json(DeletedResponse { deleted }))
}
