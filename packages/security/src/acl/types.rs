// ABOUTME: Access control type definitions
// ABOUTME: Permissions and the grants that bind them to users and objects

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use folio_core::ObjectKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown permission: {0}")]
pub struct UnknownPermission(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "documents.document_view")]
    DocumentView,
    #[serde(rename = "tags.tag_view")]
    TagView,
}

impl Permission {
    pub const ALL: [Permission; 2] = [Permission::DocumentView, Permission::TagView];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentView => "documents.document_view",
            Self::TagView => "tags.tag_view",
        }
    }

    /// Kind of object this permission is granted over
    pub fn object_kind(&self) -> ObjectKind {
        match self {
            Self::DocumentView => ObjectKind::Document,
            Self::TagView => ObjectKind::Tag,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

/// A stored grant. `object_id` of `None` covers every object of `object_kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclEntry {
    pub id: String,
    pub user_id: String,
    pub permission: Permission,
    pub object_kind: ObjectKind,
    pub object_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
