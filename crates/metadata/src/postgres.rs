//! PostgreSQL-based metadata store implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{MetadataRecordRow, UserRow};
use crate::repos::{RecordRepo, UserRepo};
use crate::store::MetadataStore;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, Pool, Postgres};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQL schema (embedded).
const POSTGRES_SCHEMA: &str = include_str!("postgres_schema.sql");

/// Split the schema into individual statements, dropping comment-only blocks.
fn schema_statements(schema: &str) -> Vec<&str> {
    schema
        .split(';')
        .filter_map(|statement| {
            let trimmed = statement.trim();
            if trimmed.is_empty() {
                return None;
            }
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            has_sql.then_some(trimmed)
        })
        .collect()
}

/// PostgreSQL-based metadata store.
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Create a new PostgreSQL store from a connection URL.
    pub async fn from_url(
        url: &str,
        max_connections: u32,
        statement_timeout_ms: Option<u64>,
    ) -> MetadataResult<Self> {
        let opts = PgConnectOptions::from_str(url)
            .map_err(|e| MetadataError::Config(format!("invalid postgres url: {e}")))?;

        let mut pool_opts = PgPoolOptions::new().max_connections(max_connections);

        // Apply statement timeout on every pooled connection so long
        // queries are cancelled server-side.
        if let Some(timeout_ms) = statement_timeout_ms {
            pool_opts = pool_opts.after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(format!("SET statement_timeout = {timeout_ms}").as_str())
                        .await?;
                    Ok(())
                })
            });
        }

        let pool = pool_opts.connect_with(opts).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for PostgresStore {
    async fn migrate(&self) -> MetadataResult<()> {
        for statement in schema_statements(POSTGRES_SCHEMA) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl UserRepo for PostgresStore {
    async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
        sqlx::query(
            "INSERT INTO users (user_id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| MetadataError::from_insert(e, &format!("email '{}'", user.email)))?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> MetadataResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl RecordRepo for PostgresStore {
    async fn create_record(&self, record: &MetadataRecordRow) -> MetadataResult<()> {
        sqlx::query(
            r#"
            INSERT INTO metadata_records (
                record_id, user_id, file_id, ciphertext, salt, iv,
                algorithm, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.record_id)
        .bind(record.user_id)
        .bind(&record.file_id)
        .bind(&record.ciphertext)
        .bind(&record.salt)
        .bind(&record.iv)
        .bind(&record.algorithm)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_records(&self, user_id: Uuid) -> MetadataResult<Vec<MetadataRecordRow>> {
        let rows = sqlx::query_as::<_, MetadataRecordRow>(
            "SELECT * FROM metadata_records WHERE user_id = $1 \
             ORDER BY created_at DESC, record_id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_record_by_file_id(
        &self,
        user_id: Uuid,
        file_id: &str,
    ) -> MetadataResult<Option<MetadataRecordRow>> {
        let row = sqlx::query_as::<_, MetadataRecordRow>(
            "SELECT * FROM metadata_records WHERE user_id = $1 AND file_id = $2 \
             ORDER BY created_at DESC, record_id DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_record(&self, user_id: Uuid, file_id: &str) -> MetadataResult<bool> {
        // Deletes the record the lookup would return: same ordering.
        let result = sqlx::query(
            "DELETE FROM metadata_records WHERE record_id = ( \
                 SELECT record_id FROM metadata_records \
                 WHERE user_id = $1 AND file_id = $2 \
                 ORDER BY created_at DESC, record_id DESC LIMIT 1)",
        )
        .bind(user_id)
        .bind(file_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_records(&self, user_id: Uuid, file_ids: &[String]) -> MetadataResult<u64> {
        if file_ids.is_empty() {
            return Ok(0);
        }

        let result =
            sqlx::query("DELETE FROM metadata_records WHERE user_id = $1 AND file_id = ANY($2)")
                .bind(user_id)
                .bind(file_ids)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_records(&self, user_id: Uuid) -> MetadataResult<u64> {
        let result = sqlx::query("DELETE FROM metadata_records WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
