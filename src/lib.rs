// src/lib.rs

pub mod db;
pub mod error;
pub mod history;
pub mod models;
pub mod thumbnail;

pub use db::{KvStore, MemoryKv, SqliteKv};
pub use error::{HistoryError, Result};
pub use history::{HistoryStore, MAX_ENTRIES, STORAGE_KEY};
pub use models::{DayGroup, HistoryEntry};
