// ABOUTME: Tag management system for organizing documents
// ABOUTME: Provides tag types, storage, save hooks and display helpers

pub mod hooks;
pub mod storage;
pub mod types;
pub mod widget;

// Re-export main types
pub use hooks::{PostSaveHook, TagEventHook};
pub use storage::TagStorage;
pub use types::{SaveKind, Tag, TagCreateInput, TagUpdateInput};
pub use widget::{render_tag, render_tags};
