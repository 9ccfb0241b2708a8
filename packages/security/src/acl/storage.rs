// ABOUTME: Access control list storage and query restriction
// ABOUTME: Grants permissions to users and filters object queries down to what a user may see

use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use super::types::{AclEntry, Permission};
use crate::users::User;
use folio_core::{generate_id, ObjectKind};
use folio_storage::StorageError;

pub struct AccessControlList {
    pool: SqlitePool,
}

impl AccessControlList {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Grant `permission` to a user over a single object
    pub async fn grant(
        &self,
        user_id: &str,
        permission: Permission,
        object_id: &str,
    ) -> Result<(), StorageError> {
        self.insert_entry(user_id, permission, Some(object_id)).await
    }

    /// Grant `permission` to a user over every object of the permission's kind
    pub async fn grant_global(
        &self,
        user_id: &str,
        permission: Permission,
    ) -> Result<(), StorageError> {
        self.insert_entry(user_id, permission, None).await
    }

    async fn insert_entry(
        &self,
        user_id: &str,
        permission: Permission,
        object_id: Option<&str>,
    ) -> Result<(), StorageError> {
        debug!(
            "Granting {} to user {} on {:?}",
            permission, user_id, object_id
        );

        // Re-granting an existing permission is a no-op
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO acl_entries (id, user_id, permission, object_kind, object_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(generate_id("acl"))
        .bind(user_id)
        .bind(permission.as_str())
        .bind(permission.object_kind().as_str())
        .bind(object_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(())
    }

    /// Revoke a per-object grant. Returns whether a grant was removed.
    pub async fn revoke(
        &self,
        user_id: &str,
        permission: Permission,
        object_id: &str,
    ) -> Result<bool, StorageError> {
        debug!(
            "Revoking {} from user {} on {}",
            permission, user_id, object_id
        );

        let result = sqlx::query(
            "DELETE FROM acl_entries WHERE user_id = ? AND permission = ? AND object_id = ?",
        )
        .bind(user_id)
        .bind(permission.as_str())
        .bind(object_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke a global grant. Per-object grants are left in place.
    pub async fn revoke_global(
        &self,
        user_id: &str,
        permission: Permission,
    ) -> Result<bool, StorageError> {
        debug!("Revoking global {} from user {}", permission, user_id);

        let result = sqlx::query(
            "DELETE FROM acl_entries WHERE user_id = ? AND permission = ? AND object_id IS NULL",
        )
        .bind(user_id)
        .bind(permission.as_str())
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// List the grants held by a user
    pub async fn list_entries(&self, user_id: &str) -> Result<Vec<AclEntry>, StorageError> {
        let rows = sqlx::query(
            "SELECT * FROM acl_entries WHERE user_id = ? ORDER BY permission, object_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_entry(row)).collect()
    }

    /// Whether `user` holds `permission` over the object
    pub async fn has_permission(
        &self,
        user: &User,
        permission: Permission,
        object_id: &str,
    ) -> Result<bool, StorageError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM (SELECT ");
        query.push_bind(object_id.to_string());
        query.push(" AS object_id) AS candidate WHERE 1 = 1");
        Self::restrict(&mut query, "candidate.object_id", permission, user);

        let count: i64 = query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    /// Append an `AND ...` clause limiting `id_column` to objects `user` may access.
    ///
    /// The query must already contain a `WHERE` clause. Superusers are not
    /// restricted; a user without grants matches nothing.
    pub fn restrict<'args>(
        query: &mut QueryBuilder<'args, Sqlite>,
        id_column: &'static str,
        permission: Permission,
        user: &User,
    ) {
        if user.is_superuser {
            return;
        }

        let kind = permission.object_kind().as_str();

        query.push(" AND (");
        query.push(id_column);
        query.push(" IN (SELECT object_id FROM acl_entries WHERE object_id IS NOT NULL AND user_id = ");
        query.push_bind(user.id.clone());
        query.push(" AND permission = ");
        query.push_bind(permission.as_str());
        query.push(" AND object_kind = ");
        query.push_bind(kind);
        query.push(") OR EXISTS (SELECT 1 FROM acl_entries WHERE object_id IS NULL AND user_id = ");
        query.push_bind(user.id.clone());
        query.push(" AND permission = ");
        query.push_bind(permission.as_str());
        query.push(" AND object_kind = ");
        query.push_bind(kind);
        query.push("))");
    }

    fn row_to_entry(&self, row: &sqlx::sqlite::SqliteRow) -> Result<AclEntry, StorageError> {
        let permission: String = row.try_get("permission").map_err(StorageError::Sqlx)?;
        let object_kind: String = row.try_get("object_kind").map_err(StorageError::Sqlx)?;

        Ok(AclEntry {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            user_id: row.try_get("user_id").map_err(StorageError::Sqlx)?,
            permission: permission
                .parse::<Permission>()
                .map_err(|e| StorageError::InvalidInput(e.to_string()))?,
            object_kind: object_kind.parse::<ObjectKind>()?,
            object_id: row.try_get("object_id").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        })
    }
}
