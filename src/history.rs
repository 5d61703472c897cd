// src/history.rs

//! Bounded, date-grouped history of extraction results.
//!
//! The whole log is one JSON array stored under [`STORAGE_KEY`], newest
//! entry first, rewritten on every mutation.

use crate::db::KvStore;
use crate::error::{HistoryError, Result};
use crate::models::{DayGroup, HistoryEntry};
use chrono::{DateTime, FixedOffset, Local, NaiveDate};
use tracing::{debug, warn};

pub const STORAGE_KEY: &str = "inkwizHistory";
pub const MAX_ENTRIES: usize = 30;

pub type Clock = Box<dyn Fn() -> DateTime<FixedOffset>>;

fn local_now() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

pub struct HistoryStore<S: KvStore> {
    kv: S,
    clock: Clock,
}

impl<S: KvStore> HistoryStore<S> {
    pub fn new(kv: S) -> Self {
        Self {
            kv,
            clock: Box::new(local_now),
        }
    }

    /// Replaces the wall clock; ids and day labels are both derived from it.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<FixedOffset> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Records a result at the front of the log, evicting the oldest entry
    /// past [`MAX_ENTRIES`].
    ///
    /// The id is the clock's current time in milliseconds. It only moves
    /// forward when that exact millisecond is already taken; a clock that
    /// steps backwards is not corrected.
    ///
    /// This is a read-modify-write of the whole snapshot. Two processes
    /// appending to the same database at once get last-writer-wins.
    pub fn append(
        &mut self,
        extracted_text: &str,
        corrected_text: &str,
        thumbnail: &str,
    ) -> Result<HistoryEntry> {
        let raw = self.kv.get(STORAGE_KEY).map_err(HistoryError::persistence)?;
        let mut log = match raw {
            Some(raw) => parse_log(&raw),
            None => Vec::new(),
        };

        let mut id = (self.clock)().timestamp_millis();
        // 同一毫秒内的重复写入
        while log.iter().any(|e| e.id == id) {
            id += 1;
        }

        let entry = HistoryEntry {
            id,
            extracted_text: extracted_text.to_string(),
            corrected_text: corrected_text.to_string(),
            thumbnail: thumbnail.to_string(),
        };
        log.insert(0, entry.clone());
        log.truncate(MAX_ENTRIES);

        let raw = serde_json::to_string(&log).map_err(|e| HistoryError::persistence(e.into()))?;
        if let Err(e) = self.kv.set(STORAGE_KEY, &raw) {
            warn!(error = %e, "failed to persist history");
            return Err(HistoryError::persistence(e));
        }
        debug!(id, len = log.len(), "history entry appended");
        Ok(entry)
    }

    /// All entries, newest first. Missing or unreadable data reads as empty.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        match self.kv.get(STORAGE_KEY) {
            Ok(Some(raw)) => parse_log(&raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read history, treating as empty");
                Vec::new()
            }
        }
    }

    /// Entries grouped under "Today", "Yesterday" or a long date label.
    pub fn list(&self) -> Vec<DayGroup> {
        group_by_day(self.entries(), &(self.clock)())
    }

    pub fn get(&self, id: i64) -> Option<HistoryEntry> {
        self.entries().into_iter().find(|e| e.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.kv.delete(STORAGE_KEY).map_err(HistoryError::persistence)?;
        debug!("history cleared");
        Ok(())
    }
}

fn parse_log(raw: &str) -> Vec<HistoryEntry> {
    match serde_json::from_str(raw) {
        Ok(log) => log,
        Err(e) => {
            warn!(error = %e, "stored history is corrupt, treating as empty");
            Vec::new()
        }
    }
}

/// 根据条目 id 的日历日生成分组标签
pub fn day_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        day.format("%B %-d, %Y").to_string()
    }
}

/// Groups a newest-first log by calendar day in `now`'s offset.
///
/// Groups come out in the order their first member appears in `entries`.
pub fn group_by_day(entries: Vec<HistoryEntry>, now: &DateTime<FixedOffset>) -> Vec<DayGroup> {
    let offset = now.offset();
    let today = now.date_naive();
    let mut groups: Vec<DayGroup> = Vec::new();

    for entry in entries {
        let label = match DateTime::from_timestamp_millis(entry.id) {
            Some(dt) => day_label(dt.with_timezone(offset).date_naive(), today),
            None => "Unknown date".to_string(),
        };
        match groups.iter_mut().find(|g| g.label == label) {
            Some(group) => group.entries.push(entry),
            None => groups.push(DayGroup {
                label,
                entries: vec![entry],
            }),
        }
    }
    groups
}
