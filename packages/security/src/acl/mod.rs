// ABOUTME: Access control list module
// ABOUTME: Permission grants and query restriction by viewer permission

pub mod storage;
pub mod types;

pub use storage::AccessControlList;
pub use types::{AclEntry, Permission, UnknownPermission};
