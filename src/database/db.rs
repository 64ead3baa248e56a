//! SQLite-backed verse store.
//!
//! Handles schema initialization, CRUD for memory verses and their SM-2
//! state, and the persisted day offset used by the "Next Day" simulation.

use crate::error::{Result, VerseError};
use crate::models::{MemoryItem, NewMemoryItem};
use crate::store::{ItemStore, not_found};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::debug;

const ITEM_COLUMNS: &str = "id, reference, content, ease_factor, interval_days, repetitions, \
                            next_review_on, last_reviewed_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        debug!(path = %path.display(), "opened verse database");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS memory_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                reference TEXT NOT NULL,
                content TEXT NOT NULL,
                ease_factor REAL NOT NULL DEFAULT 2.5,
                interval_days INTEGER NOT NULL DEFAULT 0,
                repetitions INTEGER NOT NULL DEFAULT 0,
                next_review_on TEXT NOT NULL,
                last_reviewed_at TEXT,
                UNIQUE(user_id, reference)
            )",
            (),
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_memory_items_due
             ON memory_items (user_id, next_review_on)",
            (),
        )?;

        // Simulated day offset for the practice UI
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        self.conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('day_offset', '0')",
            (),
        )?;

        Ok(())
    }

    /// Days the simulated clock runs ahead of the wall clock.
    pub fn day_offset(&self) -> Result<i64> {
        let value: String = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'day_offset'",
            [],
            |row| row.get(0),
        )?;
        value
            .parse()
            .map_err(|_| VerseError::Config(format!("invalid day_offset '{value}'")))
    }

    /// Moves the simulated clock one day forward and returns the new offset.
    pub fn advance_day(&self) -> Result<i64> {
        let next = self.day_offset()? + 1;
        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'day_offset'",
            params![next.to_string()],
        )?;
        Ok(next)
    }

    fn query_items(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<MemoryItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let items = stmt
            .query_map(params, item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<MemoryItem> {
    Ok(MemoryItem {
        id: row.get(0)?,
        reference: row.get(1)?,
        content: row.get(2)?,
        ease_factor: row.get(3)?,
        interval_days: row.get(4)?,
        repetitions: row.get(5)?,
        next_review_on: row.get(6)?,
        last_reviewed_at: row.get(7)?,
    })
}

impl ItemStore for SqliteStore {
    fn add_item(&self, user_id: &str, new_item: NewMemoryItem, now: DateTime<Utc>) -> Result<MemoryItem> {
        let new_item = new_item.validated()?;

        let exists: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM memory_items WHERE user_id = ?1 AND reference = ?2",
                params![user_id, new_item.reference],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(VerseError::DuplicateReference(new_item.reference));
        }

        let mut item = MemoryItem::new(0, new_item, now);
        self.conn.execute(
            "INSERT INTO memory_items
                (user_id, reference, content, ease_factor, interval_days, repetitions, next_review_on, last_reviewed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user_id,
                item.reference,
                item.content,
                item.ease_factor,
                item.interval_days,
                item.repetitions,
                item.next_review_on,
                item.last_reviewed_at,
            ],
        )?;
        item.id = self.conn.last_insert_rowid();

        debug!(user_id, id = item.id, reference = %item.reference, "added memory item");
        Ok(item)
    }

    fn get_item(&self, user_id: &str, id: i64) -> Result<MemoryItem> {
        self.conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM memory_items WHERE user_id = ?1 AND id = ?2"),
                params![user_id, id],
                item_from_row,
            )
            .optional()?
            .ok_or_else(|| not_found(user_id, id))
    }

    fn items_for_user(&self, user_id: &str) -> Result<Vec<MemoryItem>> {
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM memory_items WHERE user_id = ?1 ORDER BY id ASC"),
            params![user_id],
        )
    }

    fn due_items(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<MemoryItem>> {
        self.query_items(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM memory_items
                 WHERE user_id = ?1 AND next_review_on <= ?2
                 ORDER BY next_review_on ASC, id ASC"
            ),
            params![user_id, now.date_naive()],
        )
    }

    fn save_item(&self, user_id: &str, item: &MemoryItem) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE memory_items
             SET ease_factor = ?1, interval_days = ?2, repetitions = ?3,
                 next_review_on = ?4, last_reviewed_at = ?5
             WHERE user_id = ?6 AND id = ?7",
            params![
                item.ease_factor,
                item.interval_days,
                item.repetitions,
                item.next_review_on,
                item.last_reviewed_at,
                user_id,
                item.id
            ],
        )?;

        if updated == 0 {
            return Err(not_found(user_id, item.id));
        }
        Ok(())
    }

    fn delete_item(&self, user_id: &str, id: i64) -> Result<()> {
        let deleted = self.conn.execute(
            "DELETE FROM memory_items WHERE user_id = ?1 AND id = ?2",
            params![user_id, id],
        )?;
        if deleted == 0 {
            return Err(not_found(user_id, id));
        }
        Ok(())
    }
}
