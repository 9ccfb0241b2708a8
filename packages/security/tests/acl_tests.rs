// ABOUTME: Integration tests for access control lists
// ABOUTME: Tests grants, revocation and SQL-level restriction of document queries

use folio_security::{AccessControlList, Permission, User, UserCreateInput, UserStorage};
use folio_storage::connect_in_memory;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

async fn create_user(pool: &SqlitePool, username: &str, is_superuser: bool) -> User {
    UserStorage::new(pool.clone())
        .create_user(UserCreateInput {
            username: username.to_string(),
            is_superuser,
        })
        .await
        .unwrap()
}

async fn insert_document(pool: &SqlitePool, id: &str, label: &str) {
    sqlx::query("INSERT INTO documents (id, label, created_at) VALUES (?, ?, '2024-01-01T00:00:00Z')")
        .bind(id)
        .bind(label)
        .execute(pool)
        .await
        .unwrap();
}

/// Ids of documents `user` can view, through the same restriction storage layers use
async fn visible_documents(pool: &SqlitePool, user: &User) -> Vec<String> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT d.id FROM documents d WHERE 1 = 1");
    AccessControlList::restrict(&mut query, "d.id", Permission::DocumentView, user);
    query.push(" ORDER BY d.id");

    query
        .build_query_scalar::<String>()
        .fetch_all(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_user_without_grants_sees_nothing() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    let user = create_user(&pool, "alice", false).await;

    assert!(visible_documents(&pool, &user).await.is_empty());

    let acl = AccessControlList::new(pool.clone());
    assert!(!acl
        .has_permission(&user, Permission::DocumentView, "doc-1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_per_object_grant() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    insert_document(&pool, "doc-2", "Receipt").await;
    let user = create_user(&pool, "alice", false).await;
    let acl = AccessControlList::new(pool.clone());

    acl.grant(&user.id, Permission::DocumentView, "doc-2")
        .await
        .unwrap();

    assert_eq!(visible_documents(&pool, &user).await, vec!["doc-2"]);
    assert!(acl
        .has_permission(&user, Permission::DocumentView, "doc-2")
        .await
        .unwrap());
    assert!(!acl
        .has_permission(&user, Permission::DocumentView, "doc-1")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_grant_is_scoped_to_permission() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    let user = create_user(&pool, "alice", false).await;
    let acl = AccessControlList::new(pool.clone());

    // Tag view over everything says nothing about documents
    acl.grant_global(&user.id, Permission::TagView).await.unwrap();

    assert!(visible_documents(&pool, &user).await.is_empty());
}

#[tokio::test]
async fn test_global_grant_covers_all_documents() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    insert_document(&pool, "doc-2", "Receipt").await;
    let user = create_user(&pool, "alice", false).await;
    let acl = AccessControlList::new(pool.clone());

    acl.grant_global(&user.id, Permission::DocumentView)
        .await
        .unwrap();

    assert_eq!(visible_documents(&pool, &user).await, vec!["doc-1", "doc-2"]);

    assert!(acl
        .revoke_global(&user.id, Permission::DocumentView)
        .await
        .unwrap());
    assert!(visible_documents(&pool, &user).await.is_empty());
}

#[tokio::test]
async fn test_superuser_is_unrestricted() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    insert_document(&pool, "doc-2", "Receipt").await;
    let admin = create_user(&pool, "admin", true).await;

    assert_eq!(visible_documents(&pool, &admin).await, vec!["doc-1", "doc-2"]);
}

#[tokio::test]
async fn test_grants_are_isolated_between_users() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    let alice = create_user(&pool, "alice", false).await;
    let bob = create_user(&pool, "bob", false).await;
    let acl = AccessControlList::new(pool.clone());

    acl.grant(&alice.id, Permission::DocumentView, "doc-1")
        .await
        .unwrap();

    assert_eq!(visible_documents(&pool, &alice).await, vec!["doc-1"]);
    assert!(visible_documents(&pool, &bob).await.is_empty());
}

#[tokio::test]
async fn test_regrant_and_revoke() {
    let pool = connect_in_memory().await.unwrap();
    insert_document(&pool, "doc-1", "Invoice").await;
    let user = create_user(&pool, "alice", false).await;
    let acl = AccessControlList::new(pool.clone());

    acl.grant(&user.id, Permission::DocumentView, "doc-1")
        .await
        .unwrap();
    acl.grant(&user.id, Permission::DocumentView, "doc-1")
        .await
        .unwrap();
    acl.grant_global(&user.id, Permission::TagView).await.unwrap();
    acl.grant_global(&user.id, Permission::TagView).await.unwrap();

    let entries = acl.list_entries(&user.id).await.unwrap();
    assert_eq!(entries.len(), 2);

    assert!(acl
        .revoke(&user.id, Permission::DocumentView, "doc-1")
        .await
        .unwrap());
    assert!(!acl
        .revoke(&user.id, Permission::DocumentView, "doc-1")
        .await
        .unwrap());

    let entries = acl.list_entries(&user.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].permission, Permission::TagView);
    assert_eq!(entries[0].object_id, None);
}
