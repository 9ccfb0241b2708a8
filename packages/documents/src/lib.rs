// ABOUTME: Document records that tags attach to
// ABOUTME: Provides types and storage for documents

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::DocumentStorage;
pub use types::{Document, DocumentCreateInput};
