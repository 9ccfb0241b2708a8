use std::env;
use std::path::PathBuf;

/// File name of the SQLite database inside the Folio directory
pub const DATABASE_FILE_NAME: &str = "folio.db";

/// Get the path to the Folio directory (~/.folio)
pub fn folio_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".folio")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".folio")
    }
}

/// Get the path to the default database file (~/.folio/folio.db)
pub fn database_file() -> PathBuf {
    folio_dir().join(DATABASE_FILE_NAME)
}
