//! Practice session management for spaced repetition review.
//! Walks a due sequence in order, applies SM-2 per answer and keeps score.

use super::{MemoryItem, sm2};
use crate::error::{Result, VerseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Running totals for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Items that have been put in front of the reviewer so far
    pub total_presented: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
}

impl SessionStats {
    pub fn answered(&self) -> usize {
        self.correct_count + self.incorrect_count
    }

    /// Share of answered items recalled correctly, in percent.
    pub fn accuracy(&self) -> f64 {
        if self.answered() == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.answered() as f64 * 100.0
    }
}

/// Result of a single `submit`.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionUpdate {
    pub item: MemoryItem,
    pub correct: bool,
    pub completed: bool,
}

/// One pass over a caller-ordered sequence of due items. Items are presented
/// exactly in the order given to [`Session::start`]; nothing is reshuffled
/// or re-queued.
#[derive(Clone, Debug)]
pub struct Session {
    items: Vec<MemoryItem>,
    reviewed: Vec<MemoryItem>,
    current_index: usize,
    stats: SessionStats,
}

impl Session {
    pub fn start(items: Vec<MemoryItem>) -> Self {
        let stats = SessionStats {
            total_presented: usize::from(!items.is_empty()),
            ..SessionStats::default()
        };
        Self {
            reviewed: Vec::with_capacity(items.len()),
            items,
            current_index: 0,
            stats,
        }
    }

    pub fn current_item(&self) -> Option<&MemoryItem> {
        self.items.get(self.current_index)
    }

    /// What `submit` would return for the current item, without advancing.
    pub fn preview(&self, quality: u8, now: DateTime<Utc>) -> Result<MemoryItem> {
        let item = self.current_item().ok_or(VerseError::SessionComplete)?;
        sm2::review(item, quality, now)
    }

    /// Grades the current item and moves on. An invalid rating leaves the
    /// session exactly as it was, so the caller can retry.
    pub fn submit(&mut self, quality: u8, now: DateTime<Utc>) -> Result<SessionUpdate> {
        let updated = self.preview(quality, now)?;
        let correct = sm2::is_correct(quality);

        if correct {
            self.stats.correct_count += 1;
        } else {
            self.stats.incorrect_count += 1;
        }
        self.reviewed.push(updated.clone());
        self.current_index += 1;
        if self.current_index < self.items.len() {
            self.stats.total_presented += 1;
        }

        Ok(SessionUpdate {
            item: updated,
            correct,
            completed: self.is_complete(),
        })
    }

    pub fn summary(&self) -> SessionStats {
        self.stats
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.items.len()
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn remaining(&self) -> usize {
        self.items.len() - self.current_index
    }

    /// Updated items in the order they were answered.
    pub fn reviewed(&self) -> &[MemoryItem] {
        &self.reviewed
    }

    pub fn progress_message(&self) -> String {
        if self.is_complete() {
            format!("Finished: {} verses reviewed", self.reviewed.len())
        } else {
            format!("Verse {} of {}", self.current_index + 1, self.items.len())
        }
    }
}
