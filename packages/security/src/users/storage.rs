// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles creation and lookup of user accounts

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{User, UserCreateInput};
use folio_core::{generate_id, validate_username};
use folio_storage::{is_unique_violation, StorageError};

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user account
    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        let username = validate_username(&input.username)?;
        let user_id = generate_id("user");
        let now = Utc::now();

        debug!("Creating user: {} (username: {})", user_id, username);

        sqlx::query(
            r#"
            INSERT INTO users (id, username, is_superuser, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user_id)
        .bind(&username)
        .bind(input.is_superuser)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateUsername(username.clone())
            } else {
                StorageError::Sqlx(e)
            }
        })?;

        self.get_user(&user_id).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?
            .ok_or_else(|| StorageError::NotFound(format!("user {}", user_id)))?;

        self.row_to_user(&row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        debug!("Fetching user by username: {}", username);

        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => Ok(Some(self.row_to_user(&r)?)),
            None => Ok(None),
        }
    }

    /// List all users ordered by username
    pub async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY username")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(|row| self.row_to_user(row)).collect()
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id").map_err(StorageError::Sqlx)?,
            username: row.try_get("username").map_err(StorageError::Sqlx)?,
            is_superuser: row.try_get("is_superuser").map_err(StorageError::Sqlx)?,
            created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        })
    }
}
