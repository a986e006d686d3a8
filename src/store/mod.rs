//! Durable key-value persistence for the notebook.
//!
//! Each collection lives under its own key as a JSON array and is always
//! written back whole. Reading is forgiving: a missing or unparseable value
//! yields an empty collection so a damaged file never blocks startup. An
//! unparseable value is copied aside first, so the next write cannot
//! destroy the only copy.

pub mod file;
pub mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const NOTES_KEY: &str = "notes";
pub const CATEGORIES_KEY: &str = "categories";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("malformed data under {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Byte store addressed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Keep a copy of the current value of `key` under `<key>.bak`.
    fn set_aside(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(bytes) = self.get(key)? {
            self.set(&format!("{}.bak", key), &bytes)?;
        }
        Ok(())
    }
}

/// Parse the JSON array stored under `key`. A missing key is an empty array.
pub fn read_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Vec<T>, StoreError> {
    let Some(bytes) = store.get(key)? else {
        return Ok(Vec::new());
    };
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
        key: key.to_string(),
        source,
    })
}

/// Load a JSON array stored under `key`, falling back to empty.
pub fn load_collection<T: DeserializeOwned>(store: &mut dyn KeyValueStore, key: &str) -> Vec<T> {
    match read_collection(&*store, key) {
        Ok(items) => items,
        Err(e @ StoreError::Malformed { .. }) => {
            log::warn!("Discarding {}", e);
            match store.set_aside(key) {
                Ok(()) => log::warn!("Kept a backup of the unreadable {} data", key),
                Err(e) => log::error!("Failed to back up {}: {}", key, e),
            }
            Vec::new()
        }
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            Vec::new()
        }
    }
}

/// Serialize the whole collection and overwrite `key`.
pub fn save_collection<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let json = serde_json::to_vec(items).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, Id, Note};

    #[test]
    fn missing_key_loads_empty() {
        let mut store = MemoryStore::default();
        let notes: Vec<Note> = load_collection(&mut store, NOTES_KEY);
        assert!(notes.is_empty());
        assert!(store.get(NOTES_KEY).unwrap().is_none());
        assert!(store.get("notes.bak").unwrap().is_none());
    }

    #[test]
    fn corrupt_value_loads_empty_and_is_kept() {
        let mut store = MemoryStore::default();
        store.set(NOTES_KEY, b"{not json").unwrap();
        let notes: Vec<Note> = load_collection(&mut store, NOTES_KEY);
        assert!(notes.is_empty());
        assert_eq!(store.get("notes.bak").unwrap().unwrap(), b"{not json");
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let mut store = MemoryStore::default();
        store.set(CATEGORIES_KEY, br#"{"id":"x"}"#).unwrap();
        let cats: Vec<Category> = load_collection(&mut store, CATEGORIES_KEY);
        assert!(cats.is_empty());
        assert!(matches!(
            read_collection::<Category>(&store, CATEGORIES_KEY),
            Err(StoreError::Malformed { .. })
        ));
    }

    #[test]
    fn non_uuid_ids_load() {
        let mut store = MemoryStore::default();
        store
            .set(
                NOTES_KEY,
                br#"[{"id":"a","title":"Groceries","body":"milk","lastModified":100,"favorited":false,"trashed":false,"categoryId":"work"}]"#,
            )
            .unwrap();
        store.set(CATEGORIES_KEY, br#"[{"id":"work","name":"Work"}]"#).unwrap();
        let notes: Vec<Note> = load_collection(&mut store, NOTES_KEY);
        let cats: Vec<Category> = load_collection(&mut store, CATEGORIES_KEY);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, Id::from("a"));
        assert_eq!(notes[0].category_id, Some(Id::from("work")));
        assert_eq!(cats[0].id, Id::from("work"));
        assert!(store.get("notes.bak").unwrap().is_none());
    }

    #[test]
    fn saved_collection_reloads() {
        let mut store = MemoryStore::default();
        let cats = vec![Category::named("Work").unwrap(), Category::named("Home").unwrap()];
        save_collection(&mut store, CATEGORIES_KEY, &cats).unwrap();
        let loaded: Vec<Category> = load_collection(&mut store, CATEGORIES_KEY);
        assert_eq!(loaded, cats);
    }
}
