//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{RecordRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: UserRepo + RecordRepo + Send + Sync {
    /// Apply the database schema.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity.
    async fn health_check(&self) -> MetadataResult<()>;

    /// Close the connection pool, waiting for in-flight calls to drain.
    /// Called once on shutdown; the store is unusable afterwards.
    async fn close(&self);
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) and migrate a SQLite store.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // SQLite permits limited write concurrency; a single connection avoids
            // persistent "database is locked" failures under test/axum concurrency.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
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

// Repository implementations for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::{MetadataRecordRow, UserRow};
    use uuid::Uuid;

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user(&self, user: &UserRow) -> MetadataResult<()> {
            sqlx::query(
                "INSERT INTO users (user_id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
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
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn get_user(&self, user_id: Uuid) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }
    }

    #[async_trait]
    impl RecordRepo for SqliteStore {
        async fn create_record(&self, record: &MetadataRecordRow) -> MetadataResult<()> {
            sqlx::query(
                r#"
                INSERT INTO metadata_records (
                    record_id, user_id, file_id, ciphertext, salt, iv,
                    algorithm, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
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
                "SELECT * FROM metadata_records WHERE user_id = ? \
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
                "SELECT * FROM metadata_records WHERE user_id = ? AND file_id = ? \
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
                     WHERE user_id = ? AND file_id = ? \
                     ORDER BY created_at DESC, record_id DESC LIMIT 1)",
            )
            .bind(user_id)
            .bind(file_id)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        }

        async fn delete_records(
            &self,
            user_id: Uuid,
            file_ids: &[String],
        ) -> MetadataResult<u64> {
            if file_ids.is_empty() {
                return Ok(0);
            }

            let placeholders = vec!["?"; file_ids.len()].join(", ");
            let sql = format!(
                "DELETE FROM metadata_records WHERE user_id = ? AND file_id IN ({placeholders})"
            );

            let mut query = sqlx::query(&sql).bind(user_id);
            for file_id in file_ids {
                query = query.bind(file_id);
            }
            let result = query.execute(&self.pool).await?;
            Ok(result.rows_affected())
        }

        async fn delete_all_records(&self, user_id: Uuid) -> MetadataResult<u64> {
            let result = sqlx::query("DELETE FROM metadata_records WHERE user_id = ?")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        }
    }
}

/// SQLite schema (embedded).
const SCHEMA_SQL: &str = r#"
-- Accounts
CREATE TABLE IF NOT EXISTS users (
    user_id BLOB PRIMARY KEY,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);
-- The unique index is the authority for duplicate registration;
-- application pre-checks are advisory only.
CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email ON users(email);

-- Encrypted metadata records. Payload columns are opaque client artifacts.
CREATE TABLE IF NOT EXISTS metadata_records (
    record_id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(user_id),
    file_id TEXT NOT NULL,
    ciphertext TEXT NOT NULL,
    salt TEXT NOT NULL,
    iv TEXT NOT NULL,
    algorithm TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
-- Owner-scoped listing, newest first.
CREATE INDEX IF NOT EXISTS idx_metadata_records_owner ON metadata_records(user_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_metadata_records_file ON metadata_records(user_id, file_id);
"#;
