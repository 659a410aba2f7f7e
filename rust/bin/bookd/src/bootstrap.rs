//! Bootstrap: startup checks and store selection.
//!
//! When bookd starts:
//! 1. Verify the configuration: refuse to start on an empty secret,
//!    an empty data dir, an out-of-range token TTL or an unknown backend.
//! 2. Open the configured backend and wrap it in a book store.

use std::sync::Arc;

use book::store::{BookStore, KvBookStore, SqlBookStore};
use bookshelf_core::{ServiceConfig, StorageBackend};
use tracing::info;

use crate::config::ServerConfig;

/// Upper bound on `jwt.access_token_ttl_minutes`: one leap year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 366 * 24 * 60;

/// Verify server configuration is usable.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    let ttl = config.jwt.access_token_ttl_minutes;
    if ttl <= 0 {
        anyhow::bail!("jwt.access_token_ttl_minutes must be positive.");
    }
    if ttl > MAX_TOKEN_TTL_MINUTES {
        anyhow::bail!(
            "jwt.access_token_ttl_minutes must not exceed {} (got {}).",
            MAX_TOKEN_TTL_MINUTES,
            ttl
        );
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if StorageBackend::parse(&config.storage.backend).is_none() {
        anyhow::bail!(
            "Unknown storage backend '{}' (expected 'sqlite' or 'redb').",
            config.storage.backend
        );
    }
    Ok(())
}

/// Token lifetime from a verified config.
pub fn token_ttl(config: &ServerConfig) -> chrono::Duration {
    chrono::Duration::minutes(config.jwt.access_token_ttl_minutes)
}

/// Resolve storage paths and the listen address from the server config.
pub fn service_config(config: &ServerConfig, listen: Option<String>) -> ServiceConfig {
    ServiceConfig {
        data_dir: Some(config.storage.data_dir.clone().into()),
        backend: StorageBackend::parse(&config.storage.backend).unwrap_or_default(),
        listen: listen.unwrap_or_else(|| config.server.listen.clone()),
        ..Default::default()
    }
}

/// Open the configured backend as a book store.
pub fn open_book_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn BookStore>> {
    match config.backend {
        StorageBackend::Sqlite => {
            let path = config.resolve_sqlite_path();
            let sql = bookshelf_sql::SqliteStore::open(&path)
                .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?;
            let store = SqlBookStore::new(Arc::new(sql))
                .map_err(|e| anyhow::anyhow!("failed to initialize books table: {}", e))?;
            info!(path = %path.display(), "using sqlite book store");
            Ok(Arc::new(store))
        }
        StorageBackend::Redb => {
            let path = config.resolve_db_path();
            let kv = bookshelf_kv::RedbStore::open(&path)
                .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?;
            info!(path = %path.display(), "using redb book store");
            Ok(Arc::new(KvBookStore::new(Arc::new(kv))))
        }
    }
}
