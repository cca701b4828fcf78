//! Hot reload through a real filesystem watch.

use std::sync::Arc;
use std::time::Duration;

use latchkey_access::{AuthorizationTable, TableEvent, TableWatcher};
use latchkey_core::Token;
use tokio::sync::mpsc;
use tokio::time::timeout;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

async fn next_event(rx: &mut mpsc::UnboundedReceiver<TableEvent>) -> TableEvent {
    timeout(EVENT_TIMEOUT, rx.recv())
        .await
        .expect("no reload event before timeout")
        .expect("reload task stopped")
}

/// Wait until the table satisfies `check`, consuming reload events.
async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<TableEvent>,
    table: &AuthorizationTable,
    check: impl Fn(&AuthorizationTable) -> bool,
) {
    while !check(table) {
        next_event(rx).await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_reloads_on_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "A1B2C3 Jane Doe\n").unwrap();

    let table = Arc::new(AuthorizationTable::open(&path).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel::<TableEvent>();
    let watcher = TableWatcher::spawn(&path, Arc::clone(&table), tx).unwrap();
    assert!(watcher.path().is_absolute());

    std::fs::write(&path, "A1B2C3 Jane Doe\nD4E5F6 Bob\n").unwrap();

    wait_for(&mut rx, &table, |t| t.len() == 2).await;
    assert_eq!(table.lookup(&Token::new("D4E5F6")).unwrap().as_str(), "Bob");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_reloads_on_atomic_rename() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "A1B2C3 Jane Doe\n").unwrap();

    let table = Arc::new(AuthorizationTable::open(&path).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel::<TableEvent>();
    let _watcher = TableWatcher::spawn(&path, Arc::clone(&table), tx).unwrap();

    let staged = dir.path().join(".list.txt.swp");
    std::fs::write(&staged, "D4E5F6 Bob\n").unwrap();
    std::fs::rename(&staged, &path).unwrap();

    wait_for(&mut rx, &table, |t| {
        t.lookup(&Token::new("D4E5F6")).is_some()
    })
    .await;
    assert!(table.lookup(&Token::new("A1B2C3")).is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_ignores_sibling_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "A1B2C3 Jane Doe\n").unwrap();

    let table = Arc::new(AuthorizationTable::open(&path).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel::<TableEvent>();
    let _watcher = TableWatcher::spawn(&path, Arc::clone(&table), tx).unwrap();

    std::fs::write(dir.path().join("other.txt"), "D4E5F6 Bob\n").unwrap();

    let quiet = timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(quiet.is_err(), "unexpected reload: {quiet:?}");
    assert_eq!(table.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_ignores_list_renamed_away() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "A1B2C3 Jane Doe\n").unwrap();

    let table = Arc::new(AuthorizationTable::open(&path).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel::<TableEvent>();
    let _watcher = TableWatcher::spawn(&path, Arc::clone(&table), tx).unwrap();

    std::fs::rename(&path, dir.path().join("list.txt.bak")).unwrap();

    let quiet = timeout(Duration::from_millis(500), rx.recv()).await;
    assert!(quiet.is_err(), "unexpected reload: {quiet:?}");
    assert_eq!(table.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_watcher_reports_reload_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "").unwrap();

    let table = Arc::new(AuthorizationTable::open(&path).unwrap());
    let (tx, mut rx) = mpsc::unbounded_channel::<TableEvent>();
    let _watcher = TableWatcher::spawn(&path, Arc::clone(&table), tx).unwrap();

    std::fs::write(&path, "A1B2C3 Jane\n").unwrap();

    // A single write can surface as several events; the last one reflects
    // the final contents.
    loop {
        match next_event(&mut rx).await {
            TableEvent::Reloaded { entries: 1 } => break,
            TableEvent::Reloaded { .. } => continue,
            TableEvent::ReloadFailed { error } => panic!("reload failed: {error}"),
        }
    }
}

#[tokio::test]
async fn test_watcher_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("list.txt");

    let table = Arc::new(AuthorizationTable::default());
    let (tx, _rx) = mpsc::unbounded_channel::<TableEvent>();

    let result = TableWatcher::spawn(&path, table, tx);
    assert!(matches!(result, Err(latchkey_core::Error::Watch(_))));
}
