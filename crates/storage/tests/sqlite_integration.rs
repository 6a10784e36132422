use std::sync::{Arc, Mutex};

use chrono::Duration;
use spell_core::model::{ChildId, ChildProfile, Email, ProgressEntry, Role, WordList};
use spell_core::time::fixed_now;
use storage::repository::{AccountRepository, ChildRepository, StorageError};
use storage::sqlite::SqliteRepository;

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_word_list_and_progress_round_trip() {
    let repo = connect("memdb_children_roundtrip").await;
    let id = repo.create_child("Maya").await.unwrap();

    let list = WordList::parse("Week 1", "cat, dog, bird").unwrap();
    repo.set_word_list(id, &list).await.unwrap();

    let now = fixed_now();
    repo.append_progress(id, &ProgressEntry::new("cat", true, now))
        .await
        .unwrap();
    repo.append_progress(
        id,
        &ProgressEntry::new("dog", false, now + Duration::seconds(3)),
    )
    .await
    .unwrap();

    let child = repo.get_child(id).await.unwrap().expect("child");
    assert_eq!(child.name, "Maya");
    assert_eq!(child.word_list, Some(list));
    assert_eq!(
        child.progress,
        vec![
            ProgressEntry::new("cat", true, now),
            ProgressEntry::new("dog", false, now + Duration::seconds(3)),
        ]
    );

    let replacement = WordList::parse("Week 2", "emu").unwrap();
    repo.set_word_list(id, &replacement).await.unwrap();
    let child = repo.get_child(id).await.unwrap().expect("child");
    assert_eq!(child.word_list, Some(replacement));
    assert!(child.progress.is_empty());
}

#[tokio::test]
async fn sqlite_lists_children_with_their_progress() {
    let repo = connect("memdb_children_list").await;
    let maya = repo.create_child("Maya").await.unwrap();
    let sam = repo.create_child("Sam").await.unwrap();
    repo.set_word_list(sam, &WordList::parse("W", "sun").unwrap())
        .await
        .unwrap();
    repo.append_progress(sam, &ProgressEntry::new("sun", true, fixed_now()))
        .await
        .unwrap();

    let children = repo.list_children().await.unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].id, maya);
    assert!(children[0].progress.is_empty());
    assert_eq!(children[1].id, sam);
    assert_eq!(children[1].progress.len(), 1);

    let found = repo.find_child_by_name("SAM").await.unwrap().expect("sam");
    assert_eq!(found.id, sam);
    assert_eq!(found.progress.len(), 1);
}

#[tokio::test]
async fn sqlite_missing_child_writes_are_not_found() {
    let repo = connect("memdb_children_missing").await;
    let missing = ChildId::new(404);
    let err = repo
        .append_progress(missing, &ProgressEntry::new("cat", true, fixed_now()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));

    let err = repo
        .set_word_list(missing, &WordList::parse("W", "cat").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
    assert!(repo.get_child(missing).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_subscription_tracks_writes() {
    let repo = connect("memdb_children_subscribe").await;
    let id = repo.create_child("Maya").await.unwrap();
    let seen: Arc<Mutex<Vec<ChildProfile>>> = Arc::default();

    let sink = Arc::clone(&seen);
    let sub = repo
        .subscribe_child(
            id,
            Arc::new(move |child: &ChildProfile| sink.lock().unwrap().push(child.clone())),
        )
        .await
        .unwrap();

    repo.set_word_list(id, &WordList::parse("W", "cat").unwrap())
        .await
        .unwrap();
    repo.append_progress(id, &ProgressEntry::new("cat", true, fixed_now()))
        .await
        .unwrap();
    sub.unsubscribe();
    repo.append_progress(id, &ProgressEntry::new("cat", false, fixed_now()))
        .await
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].word_list.is_none());
    assert!(seen[1].word_list.is_some());
    assert_eq!(seen[2].progress.len(), 1);
    assert_eq!(repo.feed().listener_count(id), 0);
}

#[tokio::test]
async fn sqlite_accounts_and_roles() {
    let repo = connect("memdb_accounts").await;
    let email = Email::parse("parent@example.com").unwrap();

    repo.insert_credentials(&email, "hunter22").await.unwrap();
    let err = repo.insert_credentials(&email, "again12").await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict));

    let creds = repo.get_credentials(&email).await.unwrap().expect("creds");
    assert_eq!(creds.password, "hunter22");
    assert_eq!(creds.email, email);

    assert_eq!(repo.get_role(&email).await.unwrap(), None);
    repo.set_role(&email, Role::Parent).await.unwrap();
    repo.set_role(&email, Role::Child).await.unwrap();
    assert_eq!(repo.get_role(&email).await.unwrap(), Some(Role::Child));
}

#[tokio::test]
async fn sqlite_committed_progress_is_ok_even_if_snapshot_fails() {
    let repo = connect("memdb_children_unreadable").await;
    let id = repo.create_child("Maya").await.unwrap();
    let seen: Arc<Mutex<Vec<ChildProfile>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let _sub = repo
        .subscribe_child(
            id,
            Arc::new(move |child: &ChildProfile| sink.lock().unwrap().push(child.clone())),
        )
        .await
        .unwrap();

    sqlx::query("UPDATE children SET word_list = 'not json' WHERE id = ?1")
        .bind(i64::try_from(id.value()).unwrap())
        .execute(repo.pool())
        .await
        .unwrap();

    repo.append_progress(id, &ProgressEntry::new("cat", true, fixed_now()))
        .await
        .expect("row committed, so the write succeeds");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM progress_entries WHERE child_id = ?1")
        .bind(i64::try_from(id.value()).unwrap())
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(rows, 1);
    // Only the initial snapshot; the unreadable one was skipped.
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn sqlite_create_account_stores_credentials_and_role_together() {
    let repo = connect("memdb_accounts_create").await;
    let email = Email::parse("kid@example.com").unwrap();

    repo.create_account(&email, "secret1", Role::Child)
        .await
        .unwrap();
    assert_eq!(repo.get_role(&email).await.unwrap(), Some(Role::Child));
    assert!(repo.get_credentials(&email).await.unwrap().is_some());

    let err = repo
        .create_account(&email, "other12", Role::Parent)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Conflict));
    assert_eq!(repo.get_role(&email).await.unwrap(), Some(Role::Child));
}

#[tokio::test]
async fn sqlite_failed_role_write_leaves_no_credentials() {
    let repo = connect("memdb_accounts_rollback").await;
    let email = Email::parse("kid@example.com").unwrap();
    sqlx::query("DROP TABLE user_roles")
        .execute(repo.pool())
        .await
        .unwrap();

    assert!(
        repo.create_account(&email, "secret1", Role::Child)
            .await
            .is_err()
    );
    assert!(repo.get_credentials(&email).await.unwrap().is_none());
}
