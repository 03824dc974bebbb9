//! Metadata store abstraction and implementations for Strongbox.
//!
//! This crate provides the control-plane data model:
//! - User accounts with store-enforced email uniqueness
//! - Per-user encrypted metadata records with owner-scoped access
//!
//! Two backends exist: SQLite (testing, single-node) and PostgreSQL
//! (production). The store is an explicitly constructed object passed
//! into the server at composition time; there is no global handle.

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use postgres::PostgresStore;
pub use store::{MetadataStore, SqliteStore};

use std::sync::Arc;
use strongbox_core::config::MetadataConfig;

/// Create a metadata store from configuration, migrated and ready.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            tracing::info!(path = %path.display(), "Opening SQLite metadata store");
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
        MetadataConfig::Postgres {
            url,
            max_connections,
            statement_timeout_ms,
        } => {
            tracing::info!("Connecting to PostgreSQL metadata store");
            let store = PostgresStore::from_url(url, *max_connections, *statement_timeout_ms).await?;
            store.migrate().await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
