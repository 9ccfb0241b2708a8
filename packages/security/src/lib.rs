// ABOUTME: Users and access control for Folio
// ABOUTME: Provides user accounts and permission grants that filter what each user can see

pub mod acl;
pub mod users;

// Re-export main types for convenience
pub use acl::{AccessControlList, AclEntry, Permission, UnknownPermission};
pub use users::storage::UserStorage;
pub use users::{User, UserCreateInput};
