// ABOUTME: User type definitions
// ABOUTME: Accounts that act on documents and are granted permissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// Superusers bypass access control filtering
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreateInput {
    pub username: String,
    #[serde(default)]
    pub is_superuser: bool,
}
