// ABOUTME: Folio command line library
// ABOUTME: Configuration, logging setup and the shared application context used by the binary

pub mod app;
pub mod config;
pub mod logging;

pub use app::App;
pub use config::{Config, ConfigError};
