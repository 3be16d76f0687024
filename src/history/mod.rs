//! Teleport history storage
//!
//! A bounded, most-recent-first list of confirmed teleports, unique by place
//! name and persisted as JSON under a single storage key.

use crate::constants::storage::{HISTORY_KEY, MAX_HISTORY_ENTRIES};
use crate::coord::Coordinates;
use crate::geo::SearchResult;
use crate::storage::KeyValueStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// A confirmed teleport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique ID for this entry
    pub id: String,
    pub name: String,
    pub address: String,
    /// Latitude (GCJ-02)
    pub lat: f64,
    /// Longitude (GCJ-02)
    pub lng: f64,
    /// Creation time, epoch milliseconds
    pub timestamp: i64,
}

impl Location {
    /// Build a new entry from a confirmed candidate
    ///
    /// Assigns a fresh id and the current time.
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: result.name.clone(),
            address: result.address.clone(),
            lat: result.lat,
            lng: result.lng,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Coordinates of this entry
    pub fn coords(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }

    /// Convert back into a candidate (description is empty)
    pub fn to_result(&self) -> SearchResult {
        SearchResult {
            name: self.name.clone(),
            address: self.address.clone(),
            lat: self.lat,
            lng: self.lng,
            description: String::new(),
        }
    }
}

/// History storage manager
#[derive(Debug)]
pub struct History<S> {
    entries: Vec<Location>,
    store: S,
}

impl<S: KeyValueStore> History<S> {
    /// Load history from a store
    ///
    /// An absent, unreadable or corrupt value yields an empty history.
    pub fn load(store: S) -> Self {
        let entries = match store.get(HISTORY_KEY) {
            Ok(Some(content)) => match serde_json::from_str::<Vec<Location>>(&content) {
                Ok(entries) => normalize(entries),
                Err(e) => {
                    warn!("Ignoring corrupt history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read history: {}", e);
                Vec::new()
            }
        };

        Self { entries, store }
    }

    /// Add a new entry to history
    ///
    /// Drops any entry with the same name, prepends, trims to capacity and
    /// persists.
    pub fn add(&mut self, location: Location) {
        self.entries.retain(|e| e.name != location.name);
        self.entries.insert(0, location);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.persist();
    }

    /// Clear all history and remove the persisted value
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            warn!("Failed to remove persisted history: {}", e);
        }
    }

    /// Get all entries, most recent first
    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    /// Get entry by ID
    pub fn get(&self, id: &str) -> Option<&Location> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Get most recent entries
    pub fn recent(&self, count: usize) -> &[Location] {
        &self.entries[..count.min(self.entries.len())]
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(crate::error::Error::from)
            .and_then(|content| self.store.set(HISTORY_KEY, &content));

        if let Err(e) = result {
            warn!("Failed to persist history: {}", e);
        }
    }
}

/// Keep the first entry per name, capped at capacity
fn normalize(entries: Vec<Location>) -> Vec<Location> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.name.clone()))
        .take(MAX_HISTORY_ENTRIES)
        .collect()
}
