// ABOUTME: Event storage layer using SQLite
// ABOUTME: Commits events inside callers' transactions and queries the log

use chrono::Utc;
use folio_core::{generate_id, ObjectKind, ObjectRef};
use folio_storage::StorageError;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::types::{Event, EventQuery, EventType, NewEvent};

const DEFAULT_LIMIT: i64 = 100;

pub struct EventStorage {
    pool: SqlitePool,
}

impl EventStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Commit an event through `executor`.
    ///
    /// Pass a transaction connection so the event is written atomically with
    /// the change it describes.
    pub async fn commit<'e, E>(executor: E, event: &NewEvent) -> Result<Event, StorageError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let committed = Event {
            id: generate_id("evt"),
            event_type: event.event_type,
            actor_id: event.actor_id.clone(),
            action_object: event.action_object.clone(),
            target: event.target.clone(),
            created_at: Utc::now(),
        };

        debug!(
            "Committing event {} ({}) target: {} actor: {:?}",
            committed.id, committed.event_type, committed.target, committed.actor_id
        );

        sqlx::query(
            r#"
            INSERT INTO events (
                id, event_type, actor_id, action_object_kind, action_object_id,
                target_kind, target_id, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&committed.id)
        .bind(committed.event_type.as_str())
        .bind(&committed.actor_id)
        .bind(committed.action_object.as_ref().map(|o| o.kind.as_str()))
        .bind(committed.action_object.as_ref().map(|o| o.id.as_str()))
        .bind(committed.target.kind.as_str())
        .bind(&committed.target.id)
        .bind(committed.created_at)
        .execute(executor)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(committed)
    }

    /// Commit an event on its own, outside any transaction
    pub async fn record(&self, event: &NewEvent) -> Result<Event, StorageError> {
        Self::commit(&self.pool, event).await
    }

    pub async fn get_event(&self, event_id: &str) -> Result<Event, StorageError> {
        let row = sqlx::query("SELECT * FROM events WHERE id = ?")
            .bind(event_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("event {}", event_id)))?;

        row_to_event(&row)
    }

    /// List events, newest first
    pub async fn list_events(&self, query: EventQuery) -> Result<Vec<Event>, StorageError> {
        let mut sql = QueryBuilder::<Sqlite>::new("SELECT * FROM events WHERE 1 = 1");

        if let Some(event_type) = query.event_type {
            sql.push(" AND event_type = ");
            sql.push_bind(event_type.as_str());
        }
        if let Some(actor_id) = query.actor_id {
            sql.push(" AND actor_id = ");
            sql.push_bind(actor_id);
        }
        if let Some(target) = query.target {
            sql.push(" AND target_kind = ");
            sql.push_bind(target.kind.as_str());
            sql.push(" AND target_id = ");
            sql.push_bind(target.id);
        }
        if let Some(action_object) = query.action_object {
            sql.push(" AND action_object_kind = ");
            sql.push_bind(action_object.kind.as_str());
            sql.push(" AND action_object_id = ");
            sql.push_bind(action_object.id);
        }

        sql.push(" ORDER BY created_at DESC, rowid DESC LIMIT ");
        sql.push_bind(query.limit.unwrap_or(DEFAULT_LIMIT));
        sql.push(" OFFSET ");
        sql.push_bind(query.offset.unwrap_or(0));

        debug!("Fetching events with query: {}", sql.sql());

        let rows = sql
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_event).collect()
    }

    /// Events where the object is either the target or the action object
    pub async fn list_for_object(&self, object: &ObjectRef) -> Result<Vec<Event>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM events
            WHERE (target_kind = ? AND target_id = ?)
               OR (action_object_kind = ? AND action_object_id = ?)
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(object.kind.as_str())
        .bind(&object.id)
        .bind(object.kind.as_str())
        .bind(&object.id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_event).collect()
    }
}

fn row_to_event(row: &sqlx::sqlite::SqliteRow) -> Result<Event, StorageError> {
    let event_type: String = row.try_get("event_type").map_err(StorageError::Sqlx)?;
    let target_kind: String = row.try_get("target_kind").map_err(StorageError::Sqlx)?;
    let action_object_kind: Option<String> =
        row.try_get("action_object_kind").map_err(StorageError::Sqlx)?;
    let action_object_id: Option<String> =
        row.try_get("action_object_id").map_err(StorageError::Sqlx)?;

    let action_object = match (action_object_kind, action_object_id) {
        (Some(kind), Some(id)) => Some(ObjectRef::new(kind.parse::<ObjectKind>()?, id)),
        _ => None,
    };

    Ok(Event {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        event_type: event_type
            .parse::<EventType>()
            .map_err(|e| StorageError::InvalidInput(e.to_string()))?,
        actor_id: row.try_get("actor_id").map_err(StorageError::Sqlx)?,
        action_object,
        target: ObjectRef::new(
            target_kind.parse::<ObjectKind>()?,
            row.try_get::<String, _>("target_id")
                .map_err(StorageError::Sqlx)?,
        ),
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
