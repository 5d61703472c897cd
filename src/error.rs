// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database Error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization Error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage quota exceeded: value needs {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },

    /// The substrate refused a write; the persisted history is unchanged.
    #[error("History could not be saved: {0}")]
    PersistenceWrite(#[source] Box<HistoryError>),

    #[error("History entry {0} not found")]
    EntryNotFound(i64),
}

impl HistoryError {
    pub(crate) fn persistence(err: HistoryError) -> Self {
        HistoryError::PersistenceWrite(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
