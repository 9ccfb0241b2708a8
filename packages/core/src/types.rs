// ABOUTME: Shared object references used by access control and events
// ABOUTME: Identifies a tag, document or user by kind and id

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown object kind: {0}")]
pub struct UnknownObjectKind(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Tag,
    Document,
    User,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Document => "document",
            Self::User => "user",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = UnknownObjectKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tag" => Ok(Self::Tag),
            "document" => Ok(Self::Document),
            "user" => Ok(Self::User),
            _ => Err(UnknownObjectKind(s.to_string())),
        }
    }
}

/// Reference to a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: String,
}

impl ObjectRef {
    pub fn new(kind: ObjectKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    pub fn tag(id: impl Into<String>) -> Self {
        Self::new(ObjectKind::Tag, id)
    }

    pub fn document(id: impl Into<String>) -> Self {
        Self::new(ObjectKind::Document, id)
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(ObjectKind::User, id)
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_kind_round_trip() {
        for kind in [ObjectKind::Tag, ObjectKind::Document, ObjectKind::User] {
            assert_eq!(kind.as_str().parse::<ObjectKind>().unwrap(), kind);
        }
        assert_eq!(
            "folder".parse::<ObjectKind>(),
            Err(UnknownObjectKind("folder".to_string()))
        );
    }

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::document("doc-1").to_string(), "document:doc-1");
    }
}
