use guestbook::config::CommentsFormat;
use guestbook::error::GuestBookError;
use guestbook::guestbook::comment::Comment;
use guestbook::guestbook::store::{CommentStore, CookieStore, parse_fragments};

#[tokio::test]
async fn test_reload_creates_missing_comment_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.json");
    let store = CommentStore::new(&path, CommentsFormat::Array);

    store.reload().await.unwrap();

    assert!(store.is_empty());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
}

#[tokio::test]
async fn test_add_rewrites_whole_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.json");
    let store = CommentStore::new(&path, CommentsFormat::Array);
    store.reload().await.unwrap();

    store.add(Comment::new("alice", "first")).await.unwrap();
    store.add(Comment::new("bob", "second")).await.unwrap();

    let on_disk: Vec<Comment> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, store.snapshot());
    assert_eq!(on_disk[0].name, "alice");
    assert_eq!(on_disk[1].comment, "second");
}

#[tokio::test]
async fn test_reload_picks_up_external_changes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.json");
    std::fs::write(
        &path,
        r#"[{"date":"2019-01-01T00:00:00.000Z","name":"carol","comment":"old"}]"#,
    )
    .unwrap();
    let store = CommentStore::new(&path, CommentsFormat::Array);

    store.reload().await.unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.snapshot()[0].name, "carol");
}

#[tokio::test]
async fn test_corrupt_comment_file_is_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.json");
    std::fs::write(&path, "{not json").unwrap();
    let store = CommentStore::new(&path, CommentsFormat::Array);

    let err = store.reload().await.unwrap_err();

    assert!(matches!(err, GuestBookError::Internal(_)));
}

#[tokio::test]
async fn test_write_failure_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("comments.json");
    let store = CommentStore::new(&path, CommentsFormat::Array);

    let err = store.add(Comment::new("alice", "lost")).await.unwrap_err();

    assert!(matches!(err, GuestBookError::Persistence { .. }));
    assert!(err.status().is_none());
}

#[tokio::test]
async fn test_fragment_store_appends_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("comments.fragments");
    let store = CommentStore::new(&path, CommentsFormat::Fragments);
    store.reload().await.unwrap();
    assert!(store.is_empty());

    store.add(Comment::new("alice", "one")).await.unwrap();
    store.add(Comment::new("bob", "two")).await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.starts_with(",{"));

    let fresh = CommentStore::new(&path, CommentsFormat::Fragments);
    fresh.reload().await.unwrap();
    assert_eq!(fresh.snapshot(), store.snapshot());
}

#[test]
fn test_parse_fragments_of_empty_file() {
    assert!(parse_fragments("").unwrap().is_empty());
    assert!(parse_fragments("\n").unwrap().is_empty());
}

#[tokio::test]
async fn test_cookie_store_insert_remove_persist() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cookies.json");
    let store = CookieStore::new(&path);
    store.reload().await.unwrap();

    assert!(store.insert("userName=alice"));
    assert!(!store.insert("userName=alice"));
    assert!(store.insert("userName=bob"));
    store.persist().await.unwrap();

    let fresh = CookieStore::new(&path);
    fresh.reload().await.unwrap();
    assert!(fresh.contains("userName=alice"));
    assert_eq!(fresh.snapshot(), vec!["userName=alice", "userName=bob"]);

    fresh.remove("userName=alice");
    assert!(!fresh.contains("userName=alice"));
    assert!(fresh.contains("userName=bob"));
}
