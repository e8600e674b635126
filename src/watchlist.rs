//! My List: the persisted, ordered watch list
//!
//! Entries are unique by id and kept in insertion order. Every mutation writes
//! the full collection back to storage; the in-memory list stays
//! authoritative when a write fails. Mutations return the notification to
//! show rather than displaying anything themselves.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::models::{Notification, WatchlistEntry};
use crate::storage::{KeyValueStore, WATCHLIST_KEY};

/// Message shown when adding an id that is already present
pub const ALREADY_IN_LIST: &str = "Item already in your list";

pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
    store: Arc<dyn KeyValueStore>,
}

impl Watchlist {
    /// Load the list from storage, starting empty on any read or parse failure
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(WATCHLIST_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<WatchlistEntry>>(&json) {
                Ok(entries) => dedupe(entries),
                Err(e) => {
                    warn!(error = %e, "Stored watch list is not valid JSON, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Could not read watch list, starting empty");
                Vec::new()
            }
        };

        debug!(count = entries.len(), "Watch list loaded");
        Self { entries, store }
    }

    /// Append an entry unless its id is already present
    pub fn add(&mut self, entry: WatchlistEntry) -> Notification {
        if self.contains(entry.id) {
            return Notification::error(ALREADY_IN_LIST);
        }

        let message = format!("{} added to My List", entry.display_name());
        self.entries.push(entry);
        self.persist();
        Notification::success(message)
    }

    /// Remove by id; absent ids are a silent no-op
    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let removed = self.entries.remove(pos);
        self.persist();
        Some(Notification::success(format!(
            "{} removed from My List",
            removed.display_name()
        )))
    }

    /// Remove when present, add otherwise
    pub fn toggle(&mut self, entry: WatchlistEntry) -> Option<Notification> {
        if self.contains(entry.id) {
            self.remove(entry.id)
        } else {
            Some(self.add(entry))
        }
    }

    /// Remove everything without a notification
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: u64) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Could not serialize watch list");
                return;
            }
        };
        if let Err(e) = self.store.set(WATCHLIST_KEY, &json) {
            warn!(error = %e, "Could not persist watch list");
        }
    }
}

/// Keep the first occurrence of each id from a stored list
fn dedupe(entries: Vec<WatchlistEntry>) -> Vec<WatchlistEntry> {
    let mut seen = std::collections::HashSet::new();
    entries.into_iter().filter(|e| seen.insert(e.id)).collect()
}
