// ABOUTME: Data layer and persistence for Folio
// ABOUTME: Owns the SQLite schema, connection pool setup and the shared storage error type

pub mod config;
pub mod db;
pub mod error;

pub use config::{
    ConfigError, DatabaseLocation, StorageConfig, ACQUIRE_TIMEOUT_VAR, DATABASE_PATH_VAR, IN_MEMORY,
    MAX_CONNECTIONS_VAR,
};
pub use db::{connect, connect_in_memory, MIGRATOR};
pub use error::{is_unique_violation, StorageError, StorageResult};
