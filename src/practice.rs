//! Drives a [`Session`] against an [`ItemStore`]: load the due set, grade,
//! persist, repeat.

use crate::error::Result;
use crate::models::{Session, SessionUpdate};
use crate::store::ItemStore;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Starts a session over the user's due verses, oldest due date first.
/// `limit` caps how many are taken; the rest stay due for the next session.
pub fn begin(
    store: &impl ItemStore,
    user_id: &str,
    now: DateTime<Utc>,
    limit: Option<usize>,
) -> Result<Session> {
    let mut due = store.due_items(user_id, now)?;
    if let Some(limit) = limit {
        due.truncate(limit);
    }
    info!(user_id, due = due.len(), "starting practice session");
    Ok(Session::start(due))
}

/// Grades the current verse, saves the new schedule, then advances.
///
/// The session only moves on once the store accepted the update, so a
/// failed save can be retried with the same rating.
pub fn submit(
    store: &impl ItemStore,
    user_id: &str,
    session: &mut Session,
    quality: u8,
    now: DateTime<Utc>,
) -> Result<SessionUpdate> {
    let reviewed = session.preview(quality, now)?;
    store.save_item(user_id, &reviewed)?;

    let update = session.submit(quality, now)?;
    debug!(
        user_id,
        id = update.item.id,
        quality,
        interval_days = update.item.interval_days,
        next_review_on = %update.item.next_review_on,
        "verse reviewed"
    );

    if update.completed {
        let stats = session.summary();
        info!(
            user_id,
            presented = stats.total_presented,
            correct = stats.correct_count,
            incorrect = stats.incorrect_count,
            "practice session complete"
        );
    }
    Ok(update)
}
