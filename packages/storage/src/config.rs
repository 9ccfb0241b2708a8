// ABOUTME: Storage configuration loaded from environment variables
// ABOUTME: Database location and connection pool sizing

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "FOLIO_DATABASE_PATH";
pub const MAX_CONNECTIONS_VAR: &str = "FOLIO_DB_MAX_CONNECTIONS";
pub const ACQUIRE_TIMEOUT_VAR: &str = "FOLIO_DB_ACQUIRE_TIMEOUT_SECS";

/// Value of `FOLIO_DATABASE_PATH` selecting a throwaway in-memory database
pub const IN_MEMORY: &str = ":memory:";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid number for {var}: {source}")]
    InvalidNumber {
        var: &'static str,
        #[source]
        source: ParseIntError,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub location: DatabaseLocation,
    pub enable_wal: bool,
    pub max_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            location: DatabaseLocation::File(folio_core::database_file()),
            enable_wal: true,
            max_connections: 10,
            acquire_timeout_seconds: 30,
        }
    }
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self {
            location: DatabaseLocation::InMemory,
            enable_wal: false,
            max_connections: 1,
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let location = match env::var(DATABASE_PATH_VAR) {
            Ok(path) if path.trim() == IN_MEMORY => DatabaseLocation::InMemory,
            Ok(path) if !path.trim().is_empty() => DatabaseLocation::File(PathBuf::from(path.trim())),
            _ => defaults.location,
        };

        let max_connections = match env::var(MAX_CONNECTIONS_VAR) {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|source| ConfigError::InvalidNumber {
                    var: MAX_CONNECTIONS_VAR,
                    source,
                })?,
            Err(_) => defaults.max_connections,
        };
        if max_connections == 0 {
            return Err(ConfigError::Zero(MAX_CONNECTIONS_VAR));
        }

        let acquire_timeout_seconds = match env::var(ACQUIRE_TIMEOUT_VAR) {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|source| ConfigError::InvalidNumber {
                    var: ACQUIRE_TIMEOUT_VAR,
                    source,
                })?,
            Err(_) => defaults.acquire_timeout_seconds,
        };

        let enable_wal = matches!(location, DatabaseLocation::File(_));

        Ok(Self {
            location,
            enable_wal,
            max_connections,
            acquire_timeout_seconds,
        })
    }
}
