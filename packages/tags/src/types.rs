// ABOUTME: Tag type definitions
// ABOUTME: Structures for tags used to mark documents

use std::fmt;

use chrono::{DateTime, Utc};
use folio_core::Color;
use serde::{Deserialize, Serialize};

/// A labeled, colored marker that can be attached to documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub label: String,
    pub color: Color,
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Route of the page listing this tag's documents
    pub fn absolute_url(&self) -> String {
        format!("/tags/{}/documents/", self.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub label: String,
    pub color: Color,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub label: Option<String>,
    pub color: Option<Color>,
}

/// Whether a save inserted a new tag or changed an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveKind {
    Created,
    Edited,
}
