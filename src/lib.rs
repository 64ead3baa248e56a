pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod practice;
pub mod store;

pub use error::{Result, VerseError};
pub use models::{
    Clock, DashboardCounts, MasteryStatus, MemoryItem, NewMemoryItem, Session, SessionStats,
    SessionUpdate, classify,
};
pub use store::{InMemoryStore, ItemStore};
