// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Handles tag CRUD, document attachment and access-filtered document queries

use std::sync::Arc;

use chrono::Utc;
use folio_core::{generate_id, validate_label, Color, ObjectRef};
use folio_documents::storage::row_to_document;
use folio_documents::Document;
use folio_events::{EventStorage, EventType, NewEvent};
use folio_security::{AccessControlList, Permission, User};
use folio_storage::{is_unique_violation, StorageError};
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use super::hooks::{PostSaveHook, TagEventHook};
use super::types::{SaveKind, Tag, TagCreateInput, TagUpdateInput};

pub struct TagStorage {
    pool: SqlitePool,
    hooks: Vec<Arc<dyn PostSaveHook>>,
}

impl TagStorage {
    /// Tag storage with the event-committing save hook installed
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            hooks: vec![Arc::new(TagEventHook)],
        }
    }

    /// Register an additional post-save hook, run after the installed ones
    pub fn with_hook(mut self, hook: Arc<dyn PostSaveHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    // ==================== Tags ====================

    /// List all tags ordered by label
    pub async fn list_tags(&self) -> Result<Vec<Tag>, StorageError> {
        let (tags, _) = self.list_tags_paginated(None, None).await?;
        Ok(tags)
    }

    /// List tags ordered by label, with the total tag count
    pub async fn list_tags_paginated(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Tag>, i64), StorageError> {
        debug!("Fetching tags (limit: {:?}, offset: {:?})", limit, offset);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        // LIMIT -1 is unbounded in SQLite
        let rows = sqlx::query("SELECT * FROM tags ORDER BY label LIMIT ? OFFSET ?")
            .bind(limit.unwrap_or(-1))
            .bind(offset.unwrap_or(0))
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let tags = rows.iter().map(row_to_tag).collect::<Result<Vec<_>, _>>()?;

        Ok((tags, count))
    }

    /// List the tags `user` may view, ordered by label
    pub async fn list_tags_for_user(&self, user: &User) -> Result<Vec<Tag>, StorageError> {
        debug!("Fetching tags visible to user: {}", user.id);

        let mut query = QueryBuilder::<Sqlite>::new("SELECT t.* FROM tags t WHERE 1 = 1");
        AccessControlList::restrict(&mut query, "t.id", Permission::TagView, user);
        query.push(" ORDER BY t.label");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Get a single tag by ID
    pub async fn get_tag(&self, tag_id: &str) -> Result<Tag, StorageError> {
        debug!("Fetching tag: {}", tag_id);

        fetch_tag(&self.pool, tag_id)
            .await?
            .ok_or_else(|| tag_not_found(tag_id))
    }

    /// Get a tag by label
    pub async fn get_tag_by_label(&self, label: &str) -> Result<Option<Tag>, StorageError> {
        debug!("Fetching tag by label: {}", label);

        let row = sqlx::query("SELECT * FROM tags WHERE label = ?")
            .bind(label.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => Ok(Some(row_to_tag(&r)?)),
            None => Ok(None),
        }
    }

    /// Create a new tag; post-save hooks run with `SaveKind::Created`
    pub async fn create_tag(
        &self,
        input: TagCreateInput,
        actor: Option<&User>,
    ) -> Result<Tag, StorageError> {
        let label = validate_label(&input.label)?;
        let tag_id = generate_id("tag");
        let now = Utc::now();

        debug!("Creating tag: {} (label: {})", tag_id, label);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        sqlx::query(
            r#"
            INSERT INTO tags (id, label, color, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&tag_id)
        .bind(&label)
        .bind(input.color.to_hex())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| label_conflict(e, &label))?;

        let tag = fetch_tag(&mut *tx, &tag_id)
            .await?
            .ok_or_else(|| tag_not_found(&tag_id))?;

        self.run_hooks(&mut tx, &tag, SaveKind::Created, actor)
            .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Created tag {} ({})", tag.id, tag.label);
        Ok(tag)
    }

    /// Update a tag; post-save hooks run with `SaveKind::Edited` only when a
    /// field actually changes
    pub async fn update_tag(
        &self,
        tag_id: &str,
        input: TagUpdateInput,
        actor: Option<&User>,
    ) -> Result<Tag, StorageError> {
        debug!("Updating tag: {}", tag_id);

        let label = input.label.as_deref().map(validate_label).transpose()?;

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let current = fetch_tag(&mut *tx, tag_id)
            .await?
            .ok_or_else(|| tag_not_found(tag_id))?;

        let new_label = label.unwrap_or_else(|| current.label.clone());
        let new_color: Color = input.color.unwrap_or(current.color);

        if new_label == current.label && new_color == current.color {
            debug!("Tag {} unchanged, skipping save", tag_id);
            tx.commit().await.map_err(StorageError::Sqlx)?;
            return Ok(current);
        }

        sqlx::query("UPDATE tags SET label = ?, color = ? WHERE id = ?")
            .bind(&new_label)
            .bind(new_color.to_hex())
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| label_conflict(e, &new_label))?;

        let tag = fetch_tag(&mut *tx, tag_id)
            .await?
            .ok_or_else(|| tag_not_found(tag_id))?;

        self.run_hooks(&mut tx, &tag, SaveKind::Edited, actor)
            .await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!("Updated tag {} ({})", tag.id, tag.label);
        Ok(tag)
    }

    /// Delete a tag permanently; its document relations cascade
    pub async fn delete_tag(&self, tag_id: &str) -> Result<(), StorageError> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(tag_not_found(tag_id));
        }

        info!("Deleted tag {}", tag_id);
        Ok(())
    }

    async fn run_hooks(
        &self,
        conn: &mut SqliteConnection,
        tag: &Tag,
        kind: SaveKind,
        actor: Option<&User>,
    ) -> Result<(), StorageError> {
        for hook in &self.hooks {
            hook.after_save(&mut *conn, tag, kind, actor).await?;
        }
        Ok(())
    }

    // ==================== Document relation ====================

    /// Attach the tag to a document and commit a `tags.tag_attached` event.
    ///
    /// Attaching twice keeps a single relation; the event is committed on
    /// every call. Returns whether a new relation was created.
    pub async fn attach_to(
        &self,
        tag_id: &str,
        document_id: &str,
        actor: Option<&User>,
    ) -> Result<bool, StorageError> {
        debug!("Attaching tag {} to document {}", tag_id, document_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        ensure_relation_ends(&mut tx, tag_id, document_id).await?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO tag_documents (tag_id, document_id, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(tag_id)
        .bind(document_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        let event = NewEvent::new(EventType::TagAttached, ObjectRef::document(document_id))
            .with_action_object(ObjectRef::tag(tag_id))
            .with_actor(actor.map(|user| user.id.as_str()));
        EventStorage::commit(&mut *tx, &event).await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        let attached = result.rows_affected() > 0;
        info!(
            "Tag {} attached to document {} (new relation: {})",
            tag_id, document_id, attached
        );
        Ok(attached)
    }

    /// Remove the tag from a document and commit a `tags.tag_removed` event.
    ///
    /// Removing a relation that does not exist is a no-op; the event is
    /// still committed. Returns whether a relation was removed.
    pub async fn remove_from(
        &self,
        tag_id: &str,
        document_id: &str,
        actor: Option<&User>,
    ) -> Result<bool, StorageError> {
        debug!("Removing tag {} from document {}", tag_id, document_id);

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;
        ensure_relation_ends(&mut tx, tag_id, document_id).await?;

        let result = sqlx::query("DELETE FROM tag_documents WHERE tag_id = ? AND document_id = ?")
            .bind(tag_id)
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        let event = NewEvent::new(EventType::TagRemoved, ObjectRef::document(document_id))
            .with_action_object(ObjectRef::tag(tag_id))
            .with_actor(actor.map(|user| user.id.as_str()));
        EventStorage::commit(&mut *tx, &event).await?;

        tx.commit().await.map_err(StorageError::Sqlx)?;

        let removed = result.rows_affected() > 0;
        info!(
            "Tag {} removed from document {} (relation existed: {})",
            tag_id, document_id, removed
        );
        Ok(removed)
    }

    /// Documents carrying the tag that `user` may view, ordered by label
    pub async fn get_documents(
        &self,
        tag_id: &str,
        user: &User,
    ) -> Result<Vec<Document>, StorageError> {
        debug!("Fetching documents for tag {} as user {}", tag_id, user.id);

        self.get_tag(tag_id).await?;

        let mut query = tagged_documents_query("SELECT d.*", tag_id, user);
        query.push(" ORDER BY d.label, d.id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_document).collect()
    }

    /// Number of documents carrying the tag that `user` may view
    pub async fn get_document_count(&self, tag_id: &str, user: &User) -> Result<i64, StorageError> {
        debug!("Counting documents for tag {} as user {}", tag_id, user.id);

        self.get_tag(tag_id).await?;

        let mut query = tagged_documents_query("SELECT COUNT(*)", tag_id, user);

        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(count)
    }

    /// Tags attached to a document, as seen by `user`.
    ///
    /// Empty unless the user may view the document; each tag must also be
    /// viewable.
    pub async fn document_tags(
        &self,
        document_id: &str,
        user: &User,
    ) -> Result<Vec<Tag>, StorageError> {
        debug!("Fetching tags of document {} as user {}", document_id, user.id);

        let mut query = QueryBuilder::<Sqlite>::new(
            "SELECT t.* FROM tags t JOIN tag_documents td ON td.tag_id = t.id WHERE td.document_id = ",
        );
        query.push_bind(document_id.to_string());
        AccessControlList::restrict(&mut query, "td.document_id", Permission::DocumentView, user);
        AccessControlList::restrict(&mut query, "t.id", Permission::TagView, user);
        query.push(" ORDER BY t.label");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_tag).collect()
    }
}

/// Base query over documents attached to `tag_id`, restricted to what `user` may view
fn tagged_documents_query<'args>(
    select: &str,
    tag_id: &str,
    user: &User,
) -> QueryBuilder<'args, Sqlite> {
    let mut query = QueryBuilder::<Sqlite>::new(select);
    query.push(" FROM documents d JOIN tag_documents td ON td.document_id = d.id WHERE td.tag_id = ");
    query.push_bind(tag_id.to_string());
    AccessControlList::restrict(&mut query, "d.id", Permission::DocumentView, user);
    query
}

/// Both ends of a tag/document relation must exist
async fn ensure_relation_ends(
    conn: &mut SqliteConnection,
    tag_id: &str,
    document_id: &str,
) -> Result<(), StorageError> {
    if fetch_tag(&mut *conn, tag_id).await?.is_none() {
        return Err(tag_not_found(tag_id));
    }

    let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE id = ?")
        .bind(document_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    if documents == 0 {
        return Err(StorageError::NotFound(format!("document {}", document_id)));
    }

    Ok(())
}

async fn fetch_tag<'e, E>(executor: E, tag_id: &str) -> Result<Option<Tag>, StorageError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query("SELECT * FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_optional(executor)
        .await
        .map_err(StorageError::Sqlx)?;

    row.as_ref().map(row_to_tag).transpose()
}

fn tag_not_found(tag_id: &str) -> StorageError {
    StorageError::NotFound(format!("tag {}", tag_id))
}

/// Label uniqueness is enforced by the UNIQUE index
fn label_conflict(err: sqlx::Error, label: &str) -> StorageError {
    if is_unique_violation(&err) {
        warn!("Rejected duplicate tag label: {}", label);
        StorageError::DuplicateLabel(label.to_string())
    } else {
        StorageError::Sqlx(err)
    }
}

/// Convert a database row to a Tag
fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
    let color: String = row.try_get("color").map_err(StorageError::Sqlx)?;

    Ok(Tag {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        label: row.try_get("label").map_err(StorageError::Sqlx)?,
        color: color
            .parse::<Color>()
            .map_err(|e| StorageError::InvalidInput(e.to_string()))?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
