// src/commands.rs

use chrono::{DateTime, Local};
use inkwiz_history::db::{self, KvStore, SqliteKv};
use inkwiz_history::error::{HistoryError, Result};
use inkwiz_history::{thumbnail, DayGroup, HistoryStore};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// 解析数据库路径：命令行参数优先，否则使用默认路径
pub fn resolve_db_path(db: Option<PathBuf>) -> Result<PathBuf> {
    match db {
        Some(path) => Ok(path),
        None => db::get_db_path(),
    }
}

pub fn open_store(db_path: &Path, quota: usize) -> Result<HistoryStore<SqliteKv>> {
    let kv = SqliteKv::open(db_path)?.with_quota(quota);
    Ok(HistoryStore::new(kv))
}

/// 处理 'init' 命令
pub fn handle_init(db_path: &Path) -> Result<()> {
    db::initialize_db(db_path)?;
    println!("✓ Database initialized successfully at: {:?}", db_path);
    Ok(())
}

/// 处理 'add' 命令
pub fn handle_add<S: KvStore, W: Write>(
    store: &mut HistoryStore<S>,
    out: &mut W,
    extracted: &str,
    corrected: &str,
    image: &Path,
) -> Result<()> {
    let thumb = thumbnail::from_path(image)?;

    // 保存失败不影响结果的显示
    match store.append(extracted, corrected, &thumb) {
        Ok(entry) => writeln!(out, "✓ Saved to history as #{}.", entry.id)?,
        Err(e) => eprintln!("Warning: {}. The result below was not saved.", e),
    }

    write_texts(out, extracted, corrected)?;
    Ok(())
}

/// 处理 'list' 命令
pub fn handle_list<S: KvStore>(store: &HistoryStore<S>) -> Result<()> {
    let groups = store.list();
    if groups.is_empty() {
        println!("No history yet.");
        return Ok(());
    }
    print!("{}", format_groups(&groups));
    Ok(())
}

/// 处理 'show' 命令
pub fn handle_show<S: KvStore>(store: &HistoryStore<S>, id: i64) -> Result<()> {
    let entry = store.get(id).ok_or(HistoryError::EntryNotFound(id))?;
    let mut out = io::stdout().lock();
    writeln!(out, "[{}] {}", entry.id, format_time(entry.id, "%Y-%m-%d %H:%M"))?;
    write_texts(&mut out, &entry.extracted_text, &entry.corrected_text)?;
    Ok(())
}

/// 处理 'clear' 命令
pub fn handle_clear<S: KvStore>(store: &mut HistoryStore<S>, yes: bool) -> Result<()> {
    if store.is_empty() {
        println!("No history to clear.");
        return Ok(());
    }

    if !yes {
        print!("Are you sure you want to clear all history? (y/N): ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("✓ History cleared.");
    Ok(())
}

fn write_texts<W: Write>(out: &mut W, extracted: &str, corrected: &str) -> io::Result<()> {
    writeln!(out, "Extracted text:")?;
    writeln!(out, "{}", extracted.trim_end())?;
    writeln!(out, "{}", "─".repeat(40))?;
    writeln!(out, "Corrected text:")?;
    writeln!(out, "{}", corrected.trim_end())
}

fn format_time(id: i64, fmt: &str) -> String {
    DateTime::from_timestamp_millis(id)
        .map(|dt| dt.with_timezone(&Local).format(fmt).to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Renders grouped history: one heading per day, one line per entry.
pub fn format_groups(groups: &[DayGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&group.label);
        out.push('\n');
        for entry in &group.entries {
            let preview = entry.corrected_text.lines().next().unwrap_or("").trim();
            out.push_str(&format!(
                "  [{}] {}  {}\n",
                entry.id,
                format_time(entry.id, "%H:%M"),
                preview
            ));
        }
    }
    out
}
