//! Unit tests for the HistoryStore public API.
//!
//! Covers ordering, eviction, day grouping, clearing, corrupt-data recovery
//! and write failures, against both the SQLite and in-memory stores.

use chrono::{DateTime, Duration, FixedOffset, TimeZone};
use inkwiz_history::{
    HistoryError, HistoryStore, KvStore, MemoryKv, SqliteKv, MAX_ENTRIES, STORAGE_KEY,
};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

/// Helper: a settable clock starting at 2026-04-15 15:00 +01:00.
fn clock() -> Rc<Cell<DateTime<FixedOffset>>> {
    let start = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2026, 4, 15, 15, 0, 0)
        .unwrap();
    Rc::new(Cell::new(start))
}

fn store_with<S: KvStore>(kv: S, now: &Rc<Cell<DateTime<FixedOffset>>>) -> HistoryStore<S> {
    let now = Rc::clone(now);
    HistoryStore::new(kv).with_clock(move || now.get())
}

fn advance(now: &Rc<Cell<DateTime<FixedOffset>>>, by: Duration) {
    now.set(now.get() + by);
}

#[test]
fn test_append_then_read_back_round_trips_fields() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);

    let created = store
        .append("teh quick fox", "the quick fox", "data:image/png;base64,AAAA")
        .unwrap();

    let groups = store.list();
    assert_eq!(groups.len(), 1);
    let stored = &groups[0].entries[0];
    assert_eq!(stored, &created);
    assert_eq!(stored.extracted_text, "teh quick fox");
    assert_eq!(stored.corrected_text, "the quick fox");
    assert_eq!(stored.thumbnail, "data:image/png;base64,AAAA");
    assert_eq!(stored.id, now.get().timestamp_millis());
}

#[test]
fn test_empty_texts_are_accepted() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);
    store.append("", "", "data:image/webp;base64,").unwrap();
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn test_thirty_first_append_evicts_oldest() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);

    let first = store.append("0", "0", "").unwrap();
    for i in 1..MAX_ENTRIES {
        advance(&now, Duration::seconds(1));
        store.append(&i.to_string(), "", "").unwrap();
    }
    assert_eq!(store.entries().len(), MAX_ENTRIES);
    assert!(store.get(first.id).is_some());

    advance(&now, Duration::seconds(1));
    let newest = store.append("31st", "", "").unwrap();

    let entries = store.entries();
    assert_eq!(entries.len(), MAX_ENTRIES);
    assert_eq!(entries[0].id, newest.id);
    assert!(store.get(first.id).is_none(), "oldest entry should be evicted");
    assert_eq!(entries.last().unwrap().extracted_text, "1");
}

#[test]
fn test_today_today_yesterday_yields_two_groups() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);

    // 昨天 23:50, 今天 08:00, 今天 14:00
    now.set(now.get() - Duration::hours(15) - Duration::minutes(10));
    let yesterday = store.append("y", "y", "").unwrap();
    now.set(now.get() + Duration::hours(8) + Duration::minutes(10));
    let morning = store.append("m", "m", "").unwrap();
    now.set(now.get() + Duration::hours(6));
    let afternoon = store.append("a", "a", "").unwrap();
    advance(&now, Duration::hours(1));

    let groups = store.list();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].label, "Today");
    assert_eq!(groups[0].entries, vec![afternoon, morning]);
    assert_eq!(groups[1].label, "Yesterday");
    assert_eq!(groups[1].entries, vec![yesterday]);
}

#[test]
fn test_older_entries_get_long_date_label() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);

    now.set(now.get() - Duration::days(10));
    store.append("old", "old", "").unwrap();
    now.set(now.get() + Duration::days(10));

    let groups = store.list();
    assert_eq!(groups[0].label, "April 5, 2026");
}

#[test]
fn test_same_day_entries_share_a_group_regardless_of_time() {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);

    now.set(now.get() - Duration::hours(14) - Duration::minutes(59));
    store.append("early", "", "").unwrap();
    now.set(now.get() + Duration::hours(23) + Duration::minutes(58));
    store.append("late", "", "").unwrap();

    let groups = store.list();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].entries.len(), 2);
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(30)]
fn test_clear_then_list_is_empty(#[case] appends: usize) {
    let now = clock();
    let mut store = store_with(MemoryKv::new(), &now);
    for _ in 0..appends {
        advance(&now, Duration::milliseconds(5));
        store.append("t", "t", "").unwrap();
    }

    store.clear().unwrap();
    assert!(store.list().is_empty());
    assert!(store.is_empty());

    store.clear().unwrap();
    assert!(store.list().is_empty());
}

#[rstest]
#[case("{not json")]
#[case("null")]
#[case("[{\"id\": \"x\"}]")]
fn test_corrupt_snapshot_lists_as_empty(#[case] raw: &str) {
    let mut kv = MemoryKv::new();
    kv.set(STORAGE_KEY, raw).unwrap();
    let store = HistoryStore::new(kv);

    assert!(store.list().is_empty());
    assert!(store.is_empty(), "caller should hide the clear action");
}

#[test]
fn test_list_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let mut kv = SqliteKv::open(&path).unwrap();
    kv.set(STORAGE_KEY, "garbage").unwrap();

    let store = HistoryStore::new(kv);
    assert!(store.list().is_empty());
    assert_eq!(store.get(1), None);
    assert!(store.is_empty());
    drop(store);

    let reopened = SqliteKv::open(&path).unwrap();
    assert_eq!(reopened.get(STORAGE_KEY).unwrap().as_deref(), Some("garbage"));
}

#[test]
fn test_quota_failure_surfaces_and_keeps_previous_state() {
    let now = clock();
    let mut store = store_with(SqliteKv::open_in_memory().unwrap().with_quota(1_000), &now);

    let kept = store.append("small", "small", "data:image/png;base64,AA").unwrap();
    advance(&now, Duration::seconds(1));

    let huge = format!("data:image/png;base64,{}", "A".repeat(2_000));
    let err = store.append("big", "big", &huge).unwrap_err();
    match err {
        HistoryError::PersistenceWrite(source) => {
            assert!(matches!(*source, HistoryError::QuotaExceeded { quota: 1_000, .. }))
        }
        other => panic!("expected PersistenceWrite, got {other:?}"),
    }

    assert_eq!(store.entries(), vec![kept]);
}

#[test]
fn test_history_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let now = clock();

    let created = {
        let mut store = store_with(SqliteKv::open(&path).unwrap(), &now);
        store.append("persisted", "persisted", "").unwrap()
    };

    let store = store_with(SqliteKv::open(&path).unwrap(), &now);
    assert_eq!(store.get(created.id), Some(created));
    assert_eq!(store.get(42), None);
}

/// A store that can be read from but refuses to serve the history key.
struct UnreadableKv;

impl KvStore for UnreadableKv {
    fn get(&self, _key: &str) -> inkwiz_history::Result<Option<String>> {
        Err(HistoryError::InvalidInput("disk unavailable".to_string()))
    }
    fn set(&mut self, _key: &str, _value: &str) -> inkwiz_history::Result<()> {
        Ok(())
    }
    fn delete(&mut self, _key: &str) -> inkwiz_history::Result<()> {
        Ok(())
    }
}

#[test]
fn test_read_failure_during_append_is_a_persistence_error() {
    let mut store = HistoryStore::new(UnreadableKv);
    let err = store.append("a", "b", "").unwrap_err();
    assert!(matches!(err, HistoryError::PersistenceWrite(_)));
    assert!(store.list().is_empty());
}
