//! Client-side key-value persistence
//!
//! The map page keeps a handful of small preferences (language, active map
//! objects, favorites) as JSON strings under fixed keys. Reads never fail:
//! a missing or unparseable entry yields the caller's default.

use std::sync::Mutex;

use fxhash::FxHashMap as HashMap;
use serde::{de::DeserializeOwned, Serialize};

use crate::core::constants::FAVORITES_STORAGE_PREFIX;
use crate::{MapError, Result};

/// Raw string storage, shaped after a browser's local storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<()>;
    fn remove(&self, key: &str);
}

/// Process-local store, used by tests and headless hosts
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| MapError::Storage(format!("store poisoned while writing {}", key)))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Read `key` as JSON, or `default` when it is absent or does not parse
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    let Some(raw) = store.get(key) else {
        return default;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("ignoring unreadable value under {}: {}", key, e);
            default
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

pub fn favorites_key(category: &str) -> String {
    format!("{}{}", FAVORITES_STORAGE_PREFIX, category)
}

/// Favorited item ids for one content category, in the order they were added
pub fn load_favorites(store: &dyn KeyValueStore, category: &str) -> Vec<String> {
    load_json(store, &favorites_key(category), Vec::new())
}

/// Add `id` to the category's favorites, or remove it if already there.
/// Returns whether `id` is a favorite afterwards.
pub fn toggle_favorite(store: &dyn KeyValueStore, category: &str, id: &str) -> Result<bool> {
    let mut favorites = load_favorites(store, category);
    let now_favorite = match favorites.iter().position(|f| f == id) {
        Some(index) => {
            favorites.remove(index);
            false
        }
        None => {
            favorites.push(id.to_string());
            true
        }
    };
    save_json(store, &favorites_key(category), &favorites)?;
    Ok(now_favorite)
}
