//! Error types for verse memorization

use thiserror::Error;

/// Main error type for scheduling, practice and storage operations
#[derive(Error, Debug)]
pub enum VerseError {
    /// Quality rating outside 0..=5
    #[error("Invalid rating {0}: quality must be between 0 and 5")]
    InvalidRating(u8),

    /// `submit` called after every item in the session was answered
    #[error("Session is already complete")]
    SessionComplete,

    /// No item with this id exists for the user
    #[error("Memory item {id} not found for user '{user_id}'")]
    NotFound { user_id: String, id: i64 },

    /// A required text field was empty
    #[error("Field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// The user already has a verse with this reference
    #[error("Verse '{0}' already exists")]
    DuplicateReference(String),

    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for verse memory operations
pub type Result<T> = std::result::Result<T, VerseError>;
