//! Key-value persistence for the theme preference.

use parking_lot::Mutex;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;

#[cfg(feature = "native")]
pub mod file;
#[cfg(all(target_family = "wasm", feature = "wasm-js"))]
pub mod wasm_js;

#[cfg(feature = "native")]
pub use file::FileStorage;
#[cfg(all(target_family = "wasm", feature = "wasm-js"))]
pub use wasm_js::LocalStorage;

/// A key for storing the theme preference.
pub const KEY_STORAGE_THEME: &str = "theme";

/// The error type for storage backends.
#[derive(Error, Debug)]
pub enum StorageError {
    /// An error from the filesystem.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A stored value could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// An error from the browser's storage APIs.
    #[error("Web storage error: {0}")]
    WebSys(String),
}

#[cfg(all(target_family = "wasm", feature = "wasm-js"))]
impl From<wasm_bindgen::JsValue> for StorageError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        StorageError::WebSys(format!("{value:?}"))
    }
}

/// Trait for persisting string preferences.
pub trait ThemeStorage: Send {
    /// Retrieves a stored value by key.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists in storage
    /// * `Ok(None)` if the key does not exist
    /// * `Err(StorageError)` if an error occurred
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a key-value pair, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage. Clones share the same entries.
///
/// Nothing survives the process; this is the storage for tests and non-interactive contexts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates a new, empty [`MemoryStorage`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a [`MemoryStorage`] holding a single entry.
    pub fn with_entry<K: Into<String>, V: Into<String>>(key: K, value: V) -> Self {
        let storage = Self::new();
        storage.entries.lock().insert(key.into(), value.into());
        storage
    }

    /// Returns a stored value without going through [`ThemeStorage`].
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl ThemeStorage for MemoryStorage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl From<MemoryStorage> for Box<dyn ThemeStorage> {
    fn from(storage: MemoryStorage) -> Self {
        Box::new(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get(KEY_STORAGE_THEME).unwrap(), None);
        storage.set(KEY_STORAGE_THEME, "dark").unwrap();
        assert_eq!(
            storage.get(KEY_STORAGE_THEME).unwrap(),
            Some("dark".to_string())
        );
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let storage = MemoryStorage::with_entry(KEY_STORAGE_THEME, "light");
        let mut handle = storage.clone();
        handle.set(KEY_STORAGE_THEME, "dark").unwrap();
        assert_eq!(storage.peek(KEY_STORAGE_THEME), Some("dark".to_string()));
    }
}
