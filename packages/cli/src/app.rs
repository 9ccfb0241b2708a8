// ABOUTME: Application context shared by CLI commands
// ABOUTME: Owns the database pool and the storage handles built on it

use folio_documents::DocumentStorage;
use folio_events::EventStorage;
use folio_security::{AccessControlList, User, UserStorage};
use folio_storage::{connect, StorageConfig, StorageError};
use folio_tags::TagStorage;
use sqlx::SqlitePool;
use tracing::debug;

pub struct App {
    pub pool: SqlitePool,
    pub users: UserStorage,
    pub acl: AccessControlList,
    pub documents: DocumentStorage,
    pub tags: TagStorage,
    pub events: EventStorage,
}

impl App {
    /// Open the database described by `config`, applying migrations
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        let pool = connect(config).await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            users: UserStorage::new(pool.clone()),
            acl: AccessControlList::new(pool.clone()),
            documents: DocumentStorage::new(pool.clone()),
            tags: TagStorage::new(pool.clone()),
            events: EventStorage::new(pool.clone()),
            pool,
        }
    }

    /// Look up the user named by `--as`, if one was given
    pub async fn resolve_user(&self, username: Option<&str>) -> Result<Option<User>, StorageError> {
        let Some(username) = username else {
            return Ok(None);
        };

        debug!("Resolving acting user: {}", username);

        self.users
            .get_user_by_username(username)
            .await?
            .map(Some)
            .ok_or_else(|| StorageError::NotFound(format!("user {}", username)))
    }
}
