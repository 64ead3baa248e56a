//! Storage boundary for memory verses.
//!
//! Scheduling and sessions only see this trait. `database::db::SqliteStore`
//! is the on-disk implementation; [`InMemoryStore`] backs tests and previews.

use crate::error::{Result, VerseError};
use crate::models::{MemoryItem, NewMemoryItem};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// CRUD over memory items keyed by `(user_id, id)`.
///
/// Concurrent reviews of the same item are last-writer-wins.
pub trait ItemStore {
    /// Inserts a new, never-reviewed item due at `now`.
    fn add_item(&self, user_id: &str, new_item: NewMemoryItem, now: DateTime<Utc>) -> Result<MemoryItem>;

    fn get_item(&self, user_id: &str, id: i64) -> Result<MemoryItem>;

    fn items_for_user(&self, user_id: &str) -> Result<Vec<MemoryItem>>;

    /// Items with `next_review_on <= now`, oldest due date first, then by id.
    fn due_items(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<MemoryItem>>;

    /// Overwrites the stored scheduling state of an existing item.
    fn save_item(&self, user_id: &str, item: &MemoryItem) -> Result<()>;

    fn delete_item(&self, user_id: &str, id: i64) -> Result<()>;
}

pub(crate) fn not_found(user_id: &str, id: i64) -> VerseError {
    VerseError::NotFound {
        user_id: user_id.to_string(),
        id,
    }
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RefCell<BTreeMap<(String, i64), MemoryItem>>,
    next_id: RefCell<i64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ItemStore for InMemoryStore {
    fn add_item(&self, user_id: &str, new_item: NewMemoryItem, now: DateTime<Utc>) -> Result<MemoryItem> {
        let new_item = new_item.validated()?;
        let mut items = self.items.borrow_mut();
        if items
            .iter()
            .any(|((owner, _), item)| owner == user_id && item.reference == new_item.reference)
        {
            return Err(VerseError::DuplicateReference(new_item.reference));
        }

        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let item = MemoryItem::new(*next_id, new_item, now);
        items.insert((user_id.to_string(), item.id), item.clone());
        Ok(item)
    }

    fn get_item(&self, user_id: &str, id: i64) -> Result<MemoryItem> {
        self.items
            .borrow()
            .get(&(user_id.to_string(), id))
            .cloned()
            .ok_or_else(|| not_found(user_id, id))
    }

    fn items_for_user(&self, user_id: &str) -> Result<Vec<MemoryItem>> {
        Ok(self
            .items
            .borrow()
            .iter()
            .filter(|((owner, _), _)| owner == user_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    fn due_items(&self, user_id: &str, now: DateTime<Utc>) -> Result<Vec<MemoryItem>> {
        let mut due: Vec<MemoryItem> = self
            .items_for_user(user_id)?
            .into_iter()
            .filter(|item| item.is_due(now))
            .collect();
        due.sort_by_key(|item| (item.next_review_on, item.id));
        Ok(due)
    }

    fn save_item(&self, user_id: &str, item: &MemoryItem) -> Result<()> {
        match self.items.borrow_mut().get_mut(&(user_id.to_string(), item.id)) {
            Some(stored) => {
                *stored = item.clone();
                Ok(())
            }
            None => Err(not_found(user_id, item.id)),
        }
    }

    fn delete_item(&self, user_id: &str, id: i64) -> Result<()> {
        self.items
            .borrow_mut()
            .remove(&(user_id.to_string(), id))
            .map(|_| ())
            .ok_or_else(|| not_found(user_id, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sm2;
    use chrono::{Days, TimeZone};

    fn day(n: u64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap() + Days::new(n)
    }

    #[test]
    fn test_add_and_get() {
        let store = InMemoryStore::new();
        let item = store
            .add_item("anna", NewMemoryItem::new("Josh 1:9", "Be strong"), day(0))
            .unwrap();

        assert_eq!(store.get_item("anna", item.id).unwrap(), item);
        assert!(matches!(
            store.get_item("ben", item.id),
            Err(VerseError::NotFound { .. })
        ));
    }

    #[test]
    fn test_items_are_scoped_per_user() {
        let store = InMemoryStore::new();
        store.add_item("anna", NewMemoryItem::new("Josh 1:9", "Be strong"), day(0)).unwrap();
        store.add_item("ben", NewMemoryItem::new("Josh 1:9", "Be strong"), day(0)).unwrap();

        assert_eq!(store.items_for_user("anna").unwrap().len(), 1);
        assert_eq!(store.items_for_user("ben").unwrap().len(), 1);
        assert!(store.items_for_user("carl").unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_reference_rejected() {
        let store = InMemoryStore::new();
        store.add_item("anna", NewMemoryItem::new("Josh 1:9", "Be strong"), day(0)).unwrap();
        assert!(matches!(
            store.add_item("anna", NewMemoryItem::new("Josh 1:9", "again"), day(0)),
            Err(VerseError::DuplicateReference(_))
        ));
    }

    #[test]
    fn test_due_items_filter_and_order() {
        let store = InMemoryStore::new();
        let a = store.add_item("anna", NewMemoryItem::new("A 1:1", "a"), day(0)).unwrap();
        let b = store.add_item("anna", NewMemoryItem::new("B 1:1", "b"), day(0)).unwrap();
        let c = store.add_item("anna", NewMemoryItem::new("C 1:1", "c"), day(0)).unwrap();

        // a -> due tomorrow, b -> due in 6 days
        store.save_item("anna", &sm2::review(&a, 4, day(0)).unwrap()).unwrap();
        let b1 = sm2::review(&b, 4, day(0)).unwrap();
        store.save_item("anna", &sm2::review(&b1, 4, day(0)).unwrap()).unwrap();

        let ids = |now: DateTime<Utc>| {
            store
                .due_items("anna", now)
                .unwrap()
                .iter()
                .map(|i| i.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(day(0)), vec![c.id]);
        assert_eq!(ids(day(1)), vec![c.id, a.id]);
        assert_eq!(ids(day(6)), vec![c.id, a.id, b.id]);
    }

    #[test]
    fn test_save_and_delete_unknown_item() {
        let store = InMemoryStore::new();
        let orphan = MemoryItem::new(99, NewMemoryItem::new("X", "y"), day(0));
        assert!(matches!(store.save_item("anna", &orphan), Err(VerseError::NotFound { id: 99, .. })));
        assert!(store.delete_item("anna", 99).is_err());
    }

    #[test]
    fn test_delete_item() {
        let store = InMemoryStore::new();
        let item = store.add_item("anna", NewMemoryItem::new("A 1:1", "a"), day(0)).unwrap();
        store.delete_item("anna", item.id).unwrap();
        assert!(store.items_for_user("anna").unwrap().is_empty());
    }
}
