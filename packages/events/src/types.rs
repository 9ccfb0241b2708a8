// ABOUTME: Event type definitions
// ABOUTME: Event kinds, stored event records and the builder used to commit them

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use folio_core::ObjectRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown event type: {0}")]
pub struct UnknownEventType(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "tags.tag_created")]
    TagCreated,
    #[serde(rename = "tags.tag_edited")]
    TagEdited,
    #[serde(rename = "tags.tag_attached")]
    TagAttached,
    #[serde(rename = "tags.tag_removed")]
    TagRemoved,
}

impl EventType {
    pub const ALL: [EventType; 4] = [
        EventType::TagCreated,
        EventType::TagEdited,
        EventType::TagAttached,
        EventType::TagRemoved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TagCreated => "tags.tag_created",
            Self::TagEdited => "tags.tag_edited",
            Self::TagAttached => "tags.tag_attached",
            Self::TagRemoved => "tags.tag_removed",
        }
    }

    /// Human readable description
    pub fn label(&self) -> &'static str {
        match self {
            Self::TagCreated => "Tag created",
            Self::TagEdited => "Tag edited",
            Self::TagAttached => "Tag attached to document",
            Self::TagRemoved => "Tag removed from document",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// A committed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub event_type: EventType,
    pub actor_id: Option<String>,
    pub action_object: Option<ObjectRef>,
    pub target: ObjectRef,
    pub created_at: DateTime<Utc>,
}

/// An event waiting to be committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub actor_id: Option<String>,
    pub action_object: Option<ObjectRef>,
    pub target: ObjectRef,
}

impl NewEvent {
    pub fn new(event_type: EventType, target: ObjectRef) -> Self {
        Self {
            event_type,
            actor_id: None,
            action_object: None,
            target,
        }
    }

    pub fn with_actor(mut self, actor_id: Option<&str>) -> Self {
        self.actor_id = actor_id.map(str::to_string);
        self
    }

    pub fn with_action_object(mut self, action_object: ObjectRef) -> Self {
        self.action_object = Some(action_object);
        self
    }
}

/// Filters for listing events; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQuery {
    pub event_type: Option<EventType>,
    pub actor_id: Option<String>,
    pub target: Option<ObjectRef>,
    pub action_object: Option<ObjectRef>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
