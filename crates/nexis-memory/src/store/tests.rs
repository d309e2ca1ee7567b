use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Create an in-memory store for testing.
async fn test_store() -> Store {
    Store::in_memory().await.unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

#[tokio::test]
async fn test_save_note_returns_record() {
    let store = test_store().await;
    let note = store
        .save_note_at("  my wifi password is hunter2 ", at(2026, 10, 17, 9, 0))
        .await
        .unwrap();
    assert!(note.id > 0);
    assert_eq!(note.content, "my wifi password is hunter2");
    assert_eq!(note.saved_at, at(2026, 10, 17, 9, 0));
}

#[tokio::test]
async fn test_list_notes_newest_first() {
    let store = test_store().await;
    let first = store.save_note("parked on level 3").await.unwrap();
    let second = store.save_note("dentist is on friday").await.unwrap();
    assert!(second.id > first.id);

    let notes = store.list_notes().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].content, "dentist is on friday");
    assert_eq!(notes[1].content, "parked on level 3");
}

#[tokio::test]
async fn test_clear_notes_leaves_reminders() {
    let store = test_store().await;
    store.save_note("one").await.unwrap();
    store.save_note("two").await.unwrap();
    store
        .add_reminder("call mom", at(2099, 1, 1, 8, 0))
        .await
        .unwrap();

    let removed = store.clear_notes().await.unwrap();
    assert_eq!(removed, 2);
    assert!(store.list_notes().await.unwrap().is_empty());
    assert_eq!(store.list_pending_reminders().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_note_ids_not_reused_after_clear() {
    let store = test_store().await;
    let before = store.save_note("old").await.unwrap();
    store.clear_notes().await.unwrap();
    let after = store.save_note("new").await.unwrap();
    assert!(after.id > before.id);
}

#[tokio::test]
async fn test_add_reminder_starts_pending() {
    let store = test_store().await;
    let r = store
        .add_reminder("take medicine", at(2026, 10, 17, 14, 30))
        .await
        .unwrap();
    assert!(!r.notified);
    assert_eq!(r.remind_at, at(2026, 10, 17, 14, 30));

    let fetched = store.get_reminder(r.id).await.unwrap().unwrap();
    assert_eq!(fetched, r);
}

#[tokio::test]
async fn test_pending_sorted_by_remind_at() {
    let store = test_store().await;
    store
        .add_reminder("late", at(2026, 10, 18, 20, 0))
        .await
        .unwrap();
    store
        .add_reminder("early", at(2026, 10, 17, 8, 0))
        .await
        .unwrap();
    store
        .add_reminder("middle", at(2026, 10, 17, 12, 0))
        .await
        .unwrap();

    let pending = store.list_pending_reminders().await.unwrap();
    let tasks: Vec<&str> = pending.iter().map(|r| r.task.as_str()).collect();
    assert_eq!(tasks, vec!["early", "middle", "late"]);
}

#[tokio::test]
async fn test_due_excludes_future_and_notified() {
    let store = test_store().await;
    let now = at(2026, 10, 17, 12, 0);
    let past = store
        .add_reminder("past", at(2026, 10, 17, 11, 0))
        .await
        .unwrap();
    let exact = store.add_reminder("exactly now", now).await.unwrap();
    store
        .add_reminder("future", at(2026, 10, 17, 12, 1))
        .await
        .unwrap();
    let done = store
        .add_reminder("already done", at(2026, 10, 17, 10, 0))
        .await
        .unwrap();
    store.mark_notified(done.id).await.unwrap();

    let due = store.list_due_reminders(now).await.unwrap();
    let ids: Vec<i64> = due.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![past.id, exact.id]);
    assert!(due.iter().all(|r| !r.notified && r.remind_at <= now));
}

#[tokio::test]
async fn test_mark_notified_idempotent() {
    let store = test_store().await;
    let r = store
        .add_reminder("stretch", at(2020, 1, 1, 0, 0))
        .await
        .unwrap();

    assert!(store.mark_notified(r.id).await.unwrap());
    let after_first = store.get_reminder(r.id).await.unwrap().unwrap();
    assert!(after_first.notified);

    // Second call: no error, no change.
    assert!(!store.mark_notified(r.id).await.unwrap());
    let after_second = store.get_reminder(r.id).await.unwrap().unwrap();
    assert_eq!(after_first, after_second);

    assert!(store.list_pending_reminders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_notified_unknown_id() {
    let store = test_store().await;
    assert!(!store.mark_notified(9999).await.unwrap());
}

#[tokio::test]
async fn test_concurrent_claims_single_winner() {
    let store = Arc::new(test_store().await);
    let r = store
        .add_reminder("drink water", at(2020, 1, 1, 0, 0))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(
            async move { store.mark_notified(r.id).await.unwrap() },
        ));
    }
    let mut winners = 0;
    for h in handles {
        if h.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_migrations_rerun_safely() {
    let store = test_store().await;
    store.save_note("survives").await.unwrap();
    Store::run_migrations(&store.pool).await.unwrap();
    assert_eq!(store.list_notes().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_file_store_creates_parent_dir() {
    let dir = std::env::temp_dir().join(format!("__nexis_store_{}__", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    let db_path = dir.join("nested/nexis.db");

    let config = MemoryConfig {
        db_path: db_path.to_string_lossy().to_string(),
    };
    let store = Store::new(&config).await.unwrap();
    store.save_note("on disk").await.unwrap();
    assert!(db_path.exists());
    assert!(store.db_size().await.unwrap() > 0);

    // Reopen: data is durable.
    drop(store);
    let reopened = Store::new(&config).await.unwrap();
    assert_eq!(reopened.list_notes().await.unwrap()[0].content, "on disk");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_timestamp_format_round_trip() {
    let ts = at(2026, 10, 17, 20, 5);
    let raw = format_timestamp(&ts);
    assert_eq!(raw, "2026-10-17T20:05:00");
    assert_eq!(parse_timestamp(&raw).unwrap(), ts);
    assert!(parse_timestamp("yesterday").is_err());
}
