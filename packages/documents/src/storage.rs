// ABOUTME: Document storage layer using SQLite
// ABOUTME: Handles creation, lookup and deletion of documents

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{Document, DocumentCreateInput};
use folio_core::{generate_id, validate_label};
use folio_storage::StorageError;

pub struct DocumentStorage {
    pool: SqlitePool,
}

impl DocumentStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new document
    pub async fn create_document(
        &self,
        input: DocumentCreateInput,
    ) -> Result<Document, StorageError> {
        let label = validate_label(&input.label)?;
        let document_id = generate_id("doc");
        let now = Utc::now();

        debug!("Creating document: {} (label: {})", document_id, label);

        sqlx::query(
            r#"
            INSERT INTO documents (id, label, description, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&document_id)
        .bind(&label)
        .bind(&input.description)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        self.get_document(&document_id).await
    }

    /// Get a single document by ID
    pub async fn get_document(&self, document_id: &str) -> Result<Document, StorageError> {
        debug!("Fetching document: {}", document_id);

        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(document_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("document {}", document_id)))?;

        row_to_document(&row)
    }

    /// List all documents ordered by label
    pub async fn list_documents(&self) -> Result<Vec<Document>, StorageError> {
        let rows = sqlx::query("SELECT * FROM documents ORDER BY label, id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_document).collect()
    }

    /// Delete a document; its tag relations cascade
    pub async fn delete_document(&self, document_id: &str) -> Result<(), StorageError> {
        debug!("Deleting document: {}", document_id);

        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("document {}", document_id)));
        }

        Ok(())
    }
}

/// Convert a database row to a Document.
///
/// Expects the `documents` columns unqualified; joins select `d.*`.
pub fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Result<Document, StorageError> {
    Ok(Document {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        label: row.try_get("label").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
    })
}
