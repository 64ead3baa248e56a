//! JSON import/export for verse collections.
//! Only references and texts travel; scheduling state stays with the user.

use crate::error::{Result, VerseError};
use crate::models::{MemoryItem, NewMemoryItem};
use crate::store::ItemStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerseEntry {
    pub reference: String,
    pub content: String,
}

/// A named, shareable list of verses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerseCollection {
    pub name: String,
    pub verses: Vec<VerseEntry>,
}

pub fn collection_from_items(name: impl Into<String>, items: &[MemoryItem]) -> VerseCollection {
    VerseCollection {
        name: name.into(),
        verses: items
            .iter()
            .map(|item| VerseEntry {
                reference: item.reference.clone(),
                content: item.content.clone(),
            })
            .collect(),
    }
}

/// Writes a collection as pretty-printed JSON.
pub fn export_json_to_path(collection: &VerseCollection, path: impl AsRef<Path>) -> Result<()> {
    let json_string = serde_json::to_string_pretty(collection)?;
    fs::write(path, json_string)?;
    Ok(())
}

/// Reads a collection. Fails if the file is missing or not a valid collection.
pub fn import_json(path: impl AsRef<Path>) -> Result<VerseCollection> {
    let contents = fs::read_to_string(path.as_ref())?;
    let collection: VerseCollection = serde_json::from_str(&contents)?;

    info!(
        name = %collection.name,
        verses = collection.verses.len(),
        path = %path.as_ref().display(),
        "verse collection imported"
    );
    Ok(collection)
}

/// Adds every verse the user does not already have. Returns how many were added.
pub fn import_into_store(
    store: &impl ItemStore,
    user_id: &str,
    collection: &VerseCollection,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut added = 0;
    for verse in &collection.verses {
        match store.add_item(
            user_id,
            NewMemoryItem::new(verse.reference.clone(), verse.content.clone()),
            now,
        ) {
            Ok(_) => added += 1,
            Err(VerseError::DuplicateReference(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(added)
}
