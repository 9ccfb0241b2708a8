// ABOUTME: Event log for domain actions
// ABOUTME: Records who did what to which object, committed alongside the change itself

pub mod storage;
pub mod types;

pub use storage::EventStorage;
pub use types::{Event, EventQuery, EventType, NewEvent, UnknownEventType};
