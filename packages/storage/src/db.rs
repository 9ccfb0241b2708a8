// ABOUTME: Database connection management and schema migrations
// ABOUTME: Builds the shared SQLite pool used by every storage layer

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::{DatabaseLocation, StorageConfig};
use crate::error::{StorageError, StorageResult};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open the configured database and bring its schema up to date
pub async fn connect(config: &StorageConfig) -> StorageResult<SqlitePool> {
    let (options, max_connections) = match &config.location {
        DatabaseLocation::File(path) => {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
                }
            }

            debug!("Connecting to database: {}", path.display());

            let journal_mode = if config.enable_wal {
                SqliteJournalMode::Wal
            } else {
                SqliteJournalMode::Delete
            };

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .foreign_keys(true)
                .journal_mode(journal_mode)
                .busy_timeout(Duration::from_secs(config.acquire_timeout_seconds));

            (options, config.max_connections)
        }
        DatabaseLocation::InMemory => {
            debug!("Connecting to in-memory database");

            let options = SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(StorageError::Sqlx)?
                .foreign_keys(true);

            // Every in-memory connection is its own database, so share one
            (options, 1)
        }
    };

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

    if config.location == DatabaseLocation::InMemory {
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    MIGRATOR
        .run(&pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations applied");

    Ok(pool)
}

/// Fresh in-memory database with the schema applied
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    connect(&StorageConfig::in_memory()).await
}
