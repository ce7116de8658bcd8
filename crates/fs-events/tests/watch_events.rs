//! End-to-end watcher tests against a real (temporary) directory tree.

use skiff_fs_events::{FsEvent, FsEventWatcher};
use std::time::Duration;
use tempfile::TempDir;

/// Receive events until one matches `predicate` or the timeout elapses.
async fn recv_matching(
    watcher: &FsEventWatcher,
    predicate: impl Fn(&FsEvent) -> bool,
) -> Option<FsEvent> {
    let events = watcher.events();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);

    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return None;
        }
        match tokio::time::timeout(remaining, events.recv()).await {
            Ok(Ok(event)) if predicate(&event) => return Some(event),
            Ok(Ok(_)) => continue,
            _ => return None,
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_new_file_is_reported() {
    let root = TempDir::new().unwrap();
    let watcher = FsEventWatcher::new(root.path(), true).unwrap();

    let target = root.path().join("fresh.txt");
    tokio::fs::write(&target, b"hello").await.unwrap();

    let event = recv_matching(&watcher, |e| e.path == target)
        .await
        .expect("no event for created file");
    assert!(!event.is_directory);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nested_file_is_reported_recursively() {
    let root = TempDir::new().unwrap();
    let nested = root.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let watcher = FsEventWatcher::new(root.path(), true).unwrap();

    let target = nested.join("deep.txt");
    tokio::fs::write(&target, b"deep").await.unwrap();

    let event = recv_matching(&watcher, |e| e.path == target)
        .await
        .expect("no event for nested file");
    assert!(!event.is_directory);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_directory_creation_is_flagged_as_directory() {
    let root = TempDir::new().unwrap();
    let watcher = FsEventWatcher::new(root.path(), true).unwrap();

    let subdir = root.path().join("newdir");
    tokio::fs::create_dir(&subdir).await.unwrap();

    let event = recv_matching(&watcher, |e| e.path == subdir)
        .await
        .expect("no event for created directory");
    assert!(event.is_directory);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_root_accessor_reports_watched_path() {
    let root = TempDir::new().unwrap();
    let watcher = FsEventWatcher::new(root.path(), false).unwrap();
    assert_eq!(watcher.root(), root.path());
}
