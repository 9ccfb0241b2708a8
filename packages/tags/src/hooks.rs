// ABOUTME: Post-save hooks run by the tag storage layer
// ABOUTME: The default hook commits tag created/edited events in the save transaction

use async_trait::async_trait;
use folio_core::ObjectRef;
use folio_events::{EventStorage, EventType, NewEvent};
use folio_security::User;
use folio_storage::StorageError;
use sqlx::SqliteConnection;

use crate::types::{SaveKind, Tag};

/// Runs after a tag row is written, on the connection of the save
/// transaction. An error rolls the save back.
#[async_trait]
pub trait PostSaveHook: Send + Sync {
    async fn after_save(
        &self,
        conn: &mut SqliteConnection,
        tag: &Tag,
        kind: SaveKind,
        actor: Option<&User>,
    ) -> Result<(), StorageError>;
}

/// Commits `tags.tag_created` / `tags.tag_edited` targeting the tag
pub struct TagEventHook;

#[async_trait]
impl PostSaveHook for TagEventHook {
    async fn after_save(
        &self,
        conn: &mut SqliteConnection,
        tag: &Tag,
        kind: SaveKind,
        actor: Option<&User>,
    ) -> Result<(), StorageError> {
        let event_type = match kind {
            SaveKind::Created => EventType::TagCreated,
            SaveKind::Edited => EventType::TagEdited,
        };

        let event = NewEvent::new(event_type, ObjectRef::tag(&tag.id))
            .with_actor(actor.map(|user| user.id.as_str()));

        EventStorage::commit(conn, &event).await?;
        Ok(())
    }
}
