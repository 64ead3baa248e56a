//! A memory verse together with its SM-2 learning state.
use crate::error::{Result, VerseError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::sm2::INITIAL_EASE_FACTOR;

/// The fields a caller supplies when creating a verse. Everything else is
/// owned by the scheduling engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewMemoryItem {
    pub reference: String,
    pub content: String,
}

impl NewMemoryItem {
    pub fn new(reference: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            content: content.into(),
        }
    }

    /// Trims both fields and rejects blanks.
    pub fn validated(self) -> Result<Self> {
        let reference = self.reference.trim().to_string();
        let content = self.content.trim().to_string();
        if reference.is_empty() {
            return Err(VerseError::EmptyField("reference"));
        }
        if content.is_empty() {
            return Err(VerseError::EmptyField("content"));
        }
        Ok(Self { reference, content })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryItem {
    pub id: i64,
    /// Display label, e.g. "John 3:16"
    pub reference: String,
    /// Text to recall
    pub content: String,
    pub ease_factor: f64,
    pub interval_days: u32,
    /// Consecutive successful reviews since creation or the last failure
    pub repetitions: u32,
    pub next_review_on: NaiveDate,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemoryItem {
    /// Creates a never-reviewed item that is due immediately.
    pub fn new(id: i64, new_item: NewMemoryItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            reference: new_item.reference,
            content: new_item.content,
            ease_factor: INITIAL_EASE_FACTOR,
            interval_days: 0,
            repetitions: 0,
            next_review_on: now.date_naive(),
            last_reviewed_at: None,
        }
    }

    /// Due when the calendar date of `now` (UTC) has reached `next_review_on`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now.date_naive() >= self.next_review_on
    }

    pub fn never_reviewed(&self) -> bool {
        self.last_reviewed_at.is_none()
    }
}
