// ABOUTME: Integration tests for tag/document relations
// ABOUTME: Tests attach/remove events, access-filtered document queries and save hook rollback

use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{Color, ObjectRef};
use folio_documents::{Document, DocumentCreateInput, DocumentStorage};
use folio_events::{EventQuery, EventStorage, EventType};
use folio_security::{AccessControlList, Permission, User, UserCreateInput, UserStorage};
use folio_storage::{connect_in_memory, StorageError};
use folio_tags::{PostSaveHook, SaveKind, Tag, TagCreateInput, TagStorage, TagUpdateInput};
use pretty_assertions::assert_eq;
use sqlx::{SqliteConnection, SqlitePool};

struct Fixture {
    pool: SqlitePool,
    tags: TagStorage,
    acl: AccessControlList,
    tag: Tag,
}

impl Fixture {
    async fn new() -> Self {
        let pool = connect_in_memory().await.unwrap();
        let tags = TagStorage::new(pool.clone());
        let tag = tags
            .create_tag(
                TagCreateInput {
                    label: "Invoices".to_string(),
                    color: Color::new(0x20, 0x80, 0xc0),
                },
                None,
            )
            .await
            .unwrap();

        Self {
            acl: AccessControlList::new(pool.clone()),
            pool,
            tags,
            tag,
        }
    }

    async fn user(&self, username: &str, is_superuser: bool) -> User {
        UserStorage::new(self.pool.clone())
            .create_user(UserCreateInput {
                username: username.to_string(),
                is_superuser,
            })
            .await
            .unwrap()
    }

    async fn document(&self, label: &str) -> Document {
        DocumentStorage::new(self.pool.clone())
            .create_document(DocumentCreateInput {
                label: label.to_string(),
                description: None,
            })
            .await
            .unwrap()
    }

    async fn events(&self, event_type: EventType) -> Vec<folio_events::Event> {
        EventStorage::new(self.pool.clone())
            .list_events(EventQuery {
                event_type: Some(event_type),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}

fn ids(documents: &[Document]) -> Vec<&str> {
    documents.iter().map(|d| d.id.as_str()).collect()
}

#[tokio::test]
async fn test_attach_then_visible_in_documents() {
    let fx = Fixture::new().await;
    let admin = fx.user("admin", true).await;
    let doc = fx.document("January invoice").await;

    let attached = fx.tags.attach_to(&fx.tag.id, &doc.id, Some(&admin)).await.unwrap();
    assert!(attached);

    let documents = fx.tags.get_documents(&fx.tag.id, &admin).await.unwrap();
    assert_eq!(ids(&documents), vec![doc.id.as_str()]);
    assert_eq!(fx.tags.get_document_count(&fx.tag.id, &admin).await.unwrap(), 1);
}

#[tokio::test]
async fn test_attach_commits_event_with_actor_and_target() {
    let fx = Fixture::new().await;
    let alice = fx.user("alice", false).await;
    let doc = fx.document("Contract").await;

    fx.tags.attach_to(&fx.tag.id, &doc.id, Some(&alice)).await.unwrap();

    let attached = fx.events(EventType::TagAttached).await;
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].actor_id.as_deref(), Some(alice.id.as_str()));
    assert_eq!(attached[0].action_object, Some(ObjectRef::tag(&fx.tag.id)));
    assert_eq!(attached[0].target, ObjectRef::document(&doc.id));
}

#[tokio::test]
async fn test_attach_twice_keeps_one_relation() {
    let fx = Fixture::new().await;
    let admin = fx.user("admin", true).await;
    let doc = fx.document("Contract").await;

    assert!(fx.tags.attach_to(&fx.tag.id, &doc.id, None).await.unwrap());
    assert!(!fx.tags.attach_to(&fx.tag.id, &doc.id, None).await.unwrap());

    assert_eq!(fx.tags.get_document_count(&fx.tag.id, &admin).await.unwrap(), 1);
    assert_eq!(fx.events(EventType::TagAttached).await.len(), 2);
}

#[tokio::test]
async fn test_remove_excludes_document() {
    let fx = Fixture::new().await;
    let admin = fx.user("admin", true).await;
    let kept = fx.document("Kept").await;
    let removed = fx.document("Removed").await;

    fx.tags.attach_to(&fx.tag.id, &kept.id, None).await.unwrap();
    fx.tags.attach_to(&fx.tag.id, &removed.id, None).await.unwrap();

    let was_attached = fx
        .tags
        .remove_from(&fx.tag.id, &removed.id, Some(&admin))
        .await
        .unwrap();
    assert!(was_attached);

    let documents = fx.tags.get_documents(&fx.tag.id, &admin).await.unwrap();
    assert_eq!(ids(&documents), vec![kept.id.as_str()]);

    let events = fx.events(EventType::TagRemoved).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].actor_id.as_deref(), Some(admin.id.as_str()));
    assert_eq!(events[0].action_object, Some(ObjectRef::tag(&fx.tag.id)));
    assert_eq!(events[0].target, ObjectRef::document(&removed.id));
}

#[tokio::test]
async fn test_remove_absent_relation_is_noop() {
    let fx = Fixture::new().await;
    let doc = fx.document("Untagged").await;

    let removed = fx.tags.remove_from(&fx.tag.id, &doc.id, None).await.unwrap();
    assert!(!removed);
    assert_eq!(fx.events(EventType::TagRemoved).await.len(), 1);
}

#[tokio::test]
async fn test_relation_requires_both_ends() {
    let fx = Fixture::new().await;
    let doc = fx.document("Contract").await;

    let missing_doc = fx.tags.attach_to(&fx.tag.id, "doc-missing", None).await;
    assert!(matches!(missing_doc, Err(StorageError::NotFound(_))));

    let missing_tag = fx.tags.remove_from("tag-missing", &doc.id, None).await;
    assert!(matches!(missing_tag, Err(StorageError::NotFound(_))));

    assert!(fx.events(EventType::TagAttached).await.is_empty());
    assert!(fx.events(EventType::TagRemoved).await.is_empty());
}

#[tokio::test]
async fn test_user_without_grants_sees_no_documents() {
    let fx = Fixture::new().await;
    let bob = fx.user("bob", false).await;
    let doc = fx.document("Secret").await;
    fx.tags.attach_to(&fx.tag.id, &doc.id, None).await.unwrap();

    assert!(fx.tags.get_documents(&fx.tag.id, &bob).await.unwrap().is_empty());
    assert_eq!(fx.tags.get_document_count(&fx.tag.id, &bob).await.unwrap(), 0);
}

#[tokio::test]
async fn test_documents_filtered_by_per_object_grants() {
    let fx = Fixture::new().await;
    let bob = fx.user("bob", false).await;
    let visible = fx.document("Visible").await;
    let hidden = fx.document("Hidden").await;
    let untagged = fx.document("Untagged").await;

    fx.tags.attach_to(&fx.tag.id, &visible.id, None).await.unwrap();
    fx.tags.attach_to(&fx.tag.id, &hidden.id, None).await.unwrap();
    fx.acl.grant(&bob.id, Permission::DocumentView, &visible.id).await.unwrap();
    fx.acl.grant(&bob.id, Permission::DocumentView, &untagged.id).await.unwrap();

    let documents = fx.tags.get_documents(&fx.tag.id, &bob).await.unwrap();
    assert_eq!(ids(&documents), vec![visible.id.as_str()]);

    let count = fx.tags.get_document_count(&fx.tag.id, &bob).await.unwrap();
    assert_eq!(count, documents.len() as i64);
}

#[tokio::test]
async fn test_global_grant_and_superuser_see_all() {
    let fx = Fixture::new().await;
    let carol = fx.user("carol", false).await;
    let admin = fx.user("admin", true).await;

    for label in ["B", "A", "C"] {
        let doc = fx.document(label).await;
        fx.tags.attach_to(&fx.tag.id, &doc.id, None).await.unwrap();
    }
    fx.acl.grant_global(&carol.id, Permission::DocumentView).await.unwrap();

    for user in [&carol, &admin] {
        let documents = fx.tags.get_documents(&fx.tag.id, user).await.unwrap();
        let labels: Vec<_> = documents.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C"]);
        assert_eq!(fx.tags.get_document_count(&fx.tag.id, user).await.unwrap(), 3);
    }
}

#[tokio::test]
async fn test_documents_of_missing_tag() {
    let fx = Fixture::new().await;
    let admin = fx.user("admin", true).await;

    let result = fx.tags.get_documents("tag-missing", &admin).await;
    assert!(matches!(result, Err(StorageError::NotFound(_))));

    let count = fx.tags.get_document_count("tag-missing", &admin).await;
    assert!(matches!(count, Err(StorageError::NotFound(_))));
}

#[tokio::test]
async fn test_deleting_tag_or_document_drops_relation() {
    let fx = Fixture::new().await;
    let admin = fx.user("admin", true).await;
    let first = fx.document("First").await;
    let second = fx.document("Second").await;

    fx.tags.attach_to(&fx.tag.id, &first.id, None).await.unwrap();
    fx.tags.attach_to(&fx.tag.id, &second.id, None).await.unwrap();

    DocumentStorage::new(fx.pool.clone())
        .delete_document(&first.id)
        .await
        .unwrap();
    assert_eq!(fx.tags.get_document_count(&fx.tag.id, &admin).await.unwrap(), 1);

    fx.tags.delete_tag(&fx.tag.id).await.unwrap();
    let relations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag_documents")
        .fetch_one(&fx.pool)
        .await
        .unwrap();
    assert_eq!(relations, 0);
}

#[tokio::test]
async fn test_document_tags_view() {
    let fx = Fixture::new().await;
    let dave = fx.user("dave", false).await;
    let doc = fx.document("Report").await;
    let other = fx
        .tags
        .create_tag(
            TagCreateInput {
                label: "Archive".to_string(),
                color: Color::BLACK,
            },
            None,
        )
        .await
        .unwrap();

    fx.tags.attach_to(&fx.tag.id, &doc.id, None).await.unwrap();
    fx.tags.attach_to(&other.id, &doc.id, None).await.unwrap();

    // No document access hides every tag
    assert!(fx.tags.document_tags(&doc.id, &dave).await.unwrap().is_empty());

    fx.acl.grant(&dave.id, Permission::DocumentView, &doc.id).await.unwrap();
    fx.acl.grant(&dave.id, Permission::TagView, &fx.tag.id).await.unwrap();

    let visible = fx.tags.document_tags(&doc.id, &dave).await.unwrap();
    assert_eq!(visible, vec![fx.tag.clone()]);

    fx.acl.grant_global(&dave.id, Permission::TagView).await.unwrap();
    let labels: Vec<_> = fx
        .tags
        .document_tags(&doc.id, &dave)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.label)
        .collect();
    assert_eq!(labels, vec!["Archive", "Invoices"]);
}

#[tokio::test]
async fn test_list_tags_for_user() {
    let fx = Fixture::new().await;
    let erin = fx.user("erin", false).await;

    assert!(fx.tags.list_tags_for_user(&erin).await.unwrap().is_empty());

    fx.acl.grant(&erin.id, Permission::TagView, &fx.tag.id).await.unwrap();
    let tags = fx.tags.list_tags_for_user(&erin).await.unwrap();
    assert_eq!(tags, vec![fx.tag.clone()]);
}

struct FailingHook;

#[async_trait]
impl PostSaveHook for FailingHook {
    async fn after_save(
        &self,
        _conn: &mut SqliteConnection,
        _tag: &Tag,
        _kind: SaveKind,
        _actor: Option<&User>,
    ) -> Result<(), StorageError> {
        Err(StorageError::InvalidInput("rejected by hook".to_string()))
    }
}

#[tokio::test]
async fn test_failing_hook_rolls_back_save() {
    let fx = Fixture::new().await;
    let storage = TagStorage::new(fx.pool.clone()).with_hook(Arc::new(FailingHook));

    let created = storage
        .create_tag(
            TagCreateInput {
                label: "Rejected".to_string(),
                color: Color::WHITE,
            },
            None,
        )
        .await;
    assert!(created.is_err());
    assert!(fx.tags.get_tag_by_label("Rejected").await.unwrap().is_none());

    let edited = storage
        .update_tag(
            &fx.tag.id,
            TagUpdateInput {
                label: Some("Renamed".to_string()),
                ..Default::default()
            },
            None,
        )
        .await;
    assert!(edited.is_err());
    assert_eq!(fx.tags.get_tag(&fx.tag.id).await.unwrap().label, "Invoices");

    // Only the fixture's own tag creation reached the log
    assert_eq!(fx.events(EventType::TagCreated).await.len(), 1);
    assert!(fx.events(EventType::TagEdited).await.is_empty());
}

#[tokio::test]
async fn test_recording_hook_sees_save_kind() {
    use std::sync::Mutex;

    struct Recorder(Mutex<Vec<(String, SaveKind)>>);

    #[async_trait]
    impl PostSaveHook for Recorder {
        async fn after_save(
            &self,
            _conn: &mut SqliteConnection,
            tag: &Tag,
            kind: SaveKind,
            _actor: Option<&User>,
        ) -> Result<(), StorageError> {
            self.0.lock().unwrap().push((tag.label.clone(), kind));
            Ok(())
        }
    }

    let fx = Fixture::new().await;
    let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
    let storage = TagStorage::new(fx.pool.clone()).with_hook(recorder.clone());

    let tag = storage
        .create_tag(
            TagCreateInput {
                label: "Drafts".to_string(),
                color: Color::BLACK,
            },
            None,
        )
        .await
        .unwrap();
    storage
        .update_tag(
            &tag.id,
            TagUpdateInput {
                color: Some(Color::WHITE),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let seen = recorder.0.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            ("Drafts".to_string(), SaveKind::Created),
            ("Drafts".to_string(), SaveKind::Edited),
        ]
    );
}
