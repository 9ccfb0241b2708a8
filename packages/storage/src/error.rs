// ABOUTME: Storage error type shared by every Folio storage layer
// ABOUTME: Wraps sqlx failures and maps integrity violations to domain errors

use folio_core::{UnknownObjectKind, ValidationError};
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate tag label: {0}")]
    DuplicateLabel(String),
    #[error("Duplicate username: {0}")]
    DuplicateUsername(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<ValidationError> for StorageError {
    fn from(err: ValidationError) -> Self {
        StorageError::InvalidInput(err.to_string())
    }
}

impl From<UnknownObjectKind> for StorageError {
    fn from(err: UnknownObjectKind) -> Self {
        StorageError::InvalidInput(err.to_string())
    }
}

/// True when the error is a UNIQUE constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_becomes_invalid_input() {
        let err: StorageError = ValidationError::EmptyLabel.into();
        match err {
            StorageError::InvalidInput(msg) => assert_eq!(msg, "Label is required"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_is_not_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
