// ABOUTME: CLI configuration loaded from environment variables
// ABOUTME: Log level plus the storage settings shared with the library packages

use std::env;

use folio_storage::StorageConfig;
use thiserror::Error;

pub const LOG_LEVEL_VAR: &str = "FOLIO_LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level '{0}' (expected one of trace, debug, info, warn, error, off)")]
    InvalidLogLevel(String),
    #[error(transparent)]
    Storage(#[from] folio_storage::ConfigError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_level = env::var(LOG_LEVEL_VAR)
            .map(|level| level.trim().to_lowercase())
            .ok()
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        if !LOG_LEVELS.contains(&log_level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(log_level));
        }

        let storage = StorageConfig::from_env()?;

        Ok(Config { log_level, storage })
    }
}
