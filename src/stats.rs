use chrono::{DateTime, Local};
use rusqlite::{params, Connection};
use serde::Serialize;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;

/// Receives answer outcomes. Fire-and-forget: nothing returned here feeds back
/// into selection or difficulty.
pub trait StatsSink {
    fn record_correct(&mut self, character: &str);
    fn record_wrong(&mut self, character: &str);
    fn record_answer_latency(&mut self, latency_ms: u64);
}

/// Aggregated history for one character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharSummary {
    pub character: String,
    pub attempts: i64,
    pub correct: i64,
    pub miss_rate: f64,
    pub last_answered: Option<String>,
}

impl CharSummary {
    pub fn last_answered_at(&self) -> Option<DateTime<Local>> {
        self.last_answered
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Local))
    }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS answer_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    character TEXT NOT NULL,
    was_correct BOOLEAN NOT NULL,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_answer_log_char ON answer_log(character);
CREATE TABLE IF NOT EXISTS answer_latency (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    latency_ms INTEGER NOT NULL,
    timestamp TEXT NOT NULL
);
"#;

/// SQLite-backed answer history
#[derive(Debug)]
pub struct StatsDb {
    conn: Connection,
}

impl StatsDb {
    /// Open the database under the application state directory
    pub fn open_default() -> Result<Self> {
        let path = Self::default_path();
        Self::open(&path)
    }

    pub fn default_path() -> PathBuf {
        AppDirs::db_path().unwrap_or_else(|| PathBuf::from("kanaquiz_stats.db"))
    }

    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(StatsDb { conn })
    }

    pub fn record_answer(&self, character: &str, was_correct: bool) -> Result<()> {
        self.conn.execute(
            "INSERT INTO answer_log (character, was_correct, timestamp) VALUES (?1, ?2, ?3)",
            params![character, was_correct, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn record_latency(&self, latency_ms: u64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO answer_latency (latency_ms, timestamp) VALUES (?1, ?2)",
            params![latency_ms as i64, Local::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Per-character attempts, miss rate (percent) and last answer time
    pub fn get_char_summary(&self) -> Result<Vec<CharSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                character,
                COUNT(*) as attempts,
                SUM(CASE WHEN was_correct = 1 THEN 1 ELSE 0 END) as correct,
                MAX(timestamp) as last_answered
            FROM answer_log
            GROUP BY character
            ORDER BY character
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let attempts: i64 = row.get(1)?;
            let correct: i64 = row.get(2)?;
            let miss_rate = if attempts == 0 {
                0.0
            } else {
                (attempts - correct) as f64 * 100.0 / attempts as f64
            };
            Ok(CharSummary {
                character: row.get(0)?,
                attempts,
                correct,
                miss_rate,
                last_answered: row.get(3)?,
            })
        })?;

        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    pub fn get_avg_latency(&self) -> Result<Option<f64>> {
        let avg = self
            .conn
            .query_row("SELECT AVG(latency_ms) FROM answer_latency", [], |row| {
                row.get(0)
            })?;
        Ok(avg)
    }

    pub fn get_latencies(&self) -> Result<Vec<u64>> {
        let mut stmt = self
            .conn
            .prepare("SELECT latency_ms FROM answer_latency ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        Ok(rows
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|ms| ms.max(0) as u64)
            .collect())
    }

    pub fn clear_all_stats(&self) -> Result<()> {
        self.conn
            .execute_batch("DELETE FROM answer_log; DELETE FROM answer_latency;")?;
        Ok(())
    }

    /// Write the per-character summary as CSV
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let summary = self.get_char_summary()?;
        let mut writer = csv::Writer::from_path(path)?;
        for row in &summary {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(summary.len())
    }
}

impl StatsSink for StatsDb {
    fn record_correct(&mut self, character: &str) {
        if let Err(e) = self.record_answer(character, true) {
            warn!(character, error = %e, "failed to record correct answer");
        }
    }

    fn record_wrong(&mut self, character: &str) {
        if let Err(e) = self.record_answer(character, false) {
            warn!(character, error = %e, "failed to record wrong answer");
        }
    }

    fn record_answer_latency(&mut self, latency_ms: u64) {
        if let Err(e) = self.record_latency(latency_ms) {
            warn!(latency_ms, error = %e, "failed to record answer latency");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsEvent {
    Correct(String),
    Wrong(String),
    Latency(u64),
}

/// In-process sink; clones share the same event log
#[derive(Debug, Clone, Default)]
pub struct MemoryStats {
    events: Rc<RefCell<Vec<StatsEvent>>>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StatsEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, predicate: impl Fn(&StatsEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }
}

impl StatsSink for MemoryStats {
    fn record_correct(&mut self, character: &str) {
        self.events
            .borrow_mut()
            .push(StatsEvent::Correct(character.to_string()));
    }

    fn record_wrong(&mut self, character: &str) {
        self.events
            .borrow_mut()
            .push(StatsEvent::Wrong(character.to_string()));
    }

    fn record_answer_latency(&mut self, latency_ms: u64) {
        self.events.borrow_mut().push(StatsEvent::Latency(latency_ms));
    }
}
