//! Coarse mastery buckets for dashboards.
use super::MemoryItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repetition count from which an item counts as mastered.
pub const MASTERED_REPETITIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    New,
    Learning,
    /// Reserved label. `classify` does not currently produce it.
    Review,
    Mastered,
}

impl MasteryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MasteryStatus::New => "new",
            MasteryStatus::Learning => "learning",
            MasteryStatus::Review => "review",
            MasteryStatus::Mastered => "mastered",
        }
    }
}

impl std::fmt::Display for MasteryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Buckets an item by its repetition count alone.
pub fn classify(item: &MemoryItem) -> MasteryStatus {
    match item.repetitions {
        0 => MasteryStatus::New,
        r if r < MASTERED_REPETITIONS => MasteryStatus::Learning,
        _ => MasteryStatus::Mastered,
    }
}

/// Per-user totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardCounts {
    pub total: usize,
    pub mastered: usize,
    pub learning: usize,
    pub review: usize,
    pub new: usize,
    pub due_today: usize,
}

impl DashboardCounts {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a MemoryItem>, now: DateTime<Utc>) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.total += 1;
            match classify(item) {
                MasteryStatus::New => counts.new += 1,
                MasteryStatus::Learning => counts.learning += 1,
                MasteryStatus::Review => counts.review += 1,
                MasteryStatus::Mastered => counts.mastered += 1,
            }
            if item.is_due(now) {
                counts.due_today += 1;
            }
        }
        counts
    }

    /// Labelled values in dashboard display order.
    pub fn rows(&self) -> [(&'static str, usize); 6] {
        [
            ("Total", self.total),
            ("Mastered", self.mastered),
            ("Learning", self.learning),
            ("Review", self.review),
            ("New", self.new),
            ("Due today", self.due_today),
        ]
    }
}
