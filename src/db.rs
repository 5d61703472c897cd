// src/db.rs

use crate::error::{HistoryError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// 默认配额，与浏览器 localStorage 的常见上限一致
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// A synchronous key-value string store that history snapshots live in.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// 获取数据库文件的标准路径 (~/.config/inkwiz/history.db)
pub fn get_db_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or(HistoryError::HomeDirNotFound)?;
    Ok(home_dir.join(".config/inkwiz/history.db"))
}

/// 初始化数据库，如果表不存在则创建
pub fn initialize_db(db_path: &Path) -> Result<()> {
    open_connection(db_path)?;
    Ok(())
}

/// 打开数据库连接，必要时创建目录和表
fn open_connection(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(db_path)?;
    create_table(&conn)?;
    Ok(conn)
}

fn create_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn check_quota(quota: Option<usize>, value: &str) -> Result<()> {
    match quota {
        Some(quota) if value.len() > quota => Err(HistoryError::QuotaExceeded {
            needed: value.len(),
            quota,
        }),
        _ => Ok(()),
    }
}

/// SQLite-backed store: one row per key in the `kv` table.
pub struct SqliteKv {
    conn: Connection,
    quota: Option<usize>,
}

impl SqliteKv {
    /// Opens the database at `db_path`, creating the table when missing.
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = open_connection(db_path)?;
        Ok(Self { conn, quota: None })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_table(&conn)?;
        Ok(Self { conn, quota: None })
    }

    /// Caps the size in bytes of any single stored value.
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(self.quota, value)?;
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

/// In-process store with the same quota rules as [`SqliteKv`].
#[derive(Debug, Default)]
pub struct MemoryKv {
    values: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(self.quota, value)?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}
