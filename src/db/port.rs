use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use std::rc::Rc;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;
use thiserror::Error;

/// Keys under which each aggregate is persisted as one JSON blob.
pub mod keys {
    pub const HABITS: &str = "habits";
    pub const LAST_HABIT_DATE: &str = "last_habit_date";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const CHARACTER: &str = "character";
    pub const INVENTORY: &str = "inventory";
    pub const GOLD: &str = "gold";
    pub const DAILY_BUFF: &str = "daily_buff";
    pub const STREAK_DATA: &str = "streak_data";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("could not serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key → text store. No atomicity is promised across keys.
pub trait PersistencePort {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Single-threaded shared handle; every component holds one clone.
pub type SharedStore = Rc<dyn PersistencePort>;

/// Read and decode a blob. Absent or malformed data comes back as `None`.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn PersistencePort,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Discarding malformed '{}' blob: {}", key, e);
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn PersistencePort,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}

// ─── In-memory store ─────────────────────────────────────────────────────────

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl PersistencePort for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_blob_reads_as_absent() {
        let store = MemoryStore::new();
        store.set(keys::GOLD, "not json{").unwrap();
        let gold: Option<u64> = load_json(&store, keys::GOLD).unwrap();
        assert!(gold.is_none());
    }

    #[test]
    fn save_then_load_returns_value() {
        let store = MemoryStore::new();
        save_json(&store, keys::GOLD, &42u64).unwrap();
        let gold: Option<u64> = load_json(&store, keys::GOLD).unwrap();
        assert_eq!(gold, Some(42));

        store.remove(keys::GOLD).unwrap();
        assert!(store.get(keys::GOLD).unwrap().is_none());
    }
}
