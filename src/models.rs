// src/models.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64, // 创建时间，Unix 毫秒
    pub extracted_text: String,
    pub corrected_text: String,
    pub thumbnail: String, // data URI
}

/// One calendar day of history, as shown under a single heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroup {
    pub label: String,
    pub entries: Vec<HistoryEntry>,
}
