// ABOUTME: Core types and utilities for Folio
// ABOUTME: Foundational package providing colors, validation and id helpers shared by all packages

pub mod color;
pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use color::{Color, ColorParseError};
pub use types::{ObjectKind, ObjectRef, UnknownObjectKind};

// Re-export constants
pub use constants::{database_file, folio_dir, DATABASE_FILE_NAME};

// Re-export utilities
pub use utils::generate_id;

// Re-export validation
pub use validation::{
    truncate, validate_label, validate_username, ValidationError, MAX_LABEL_LENGTH,
    MAX_USERNAME_LENGTH,
};
