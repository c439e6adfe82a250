//! Browser storage for the theme preference.

use super::{StorageError, ThemeStorage};
#[cfg(feature = "tracing")]
use tracing::error;
use web_sys::Storage;

/// Implementation of [`ThemeStorage`] backed by `window.localStorage`.
///
/// Keys are used verbatim, so the preference is shared with any script that reads
/// `localStorage.getItem("theme")`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    /// Creates a new instance of [`LocalStorage`].
    pub fn new() -> Self {
        Self
    }

    fn get_local_storage(&self) -> Result<Storage, StorageError> {
        match gloo_utils::window().local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StorageError::WebSys(
                "LocalStorage not available".to_string(),
            )),
            Err(e) => {
                #[cfg(feature = "tracing")]
                error!("Could not find local storage: {e:?}");
                Err(e.into())
            }
        }
    }
}

impl ThemeStorage for LocalStorage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        let local_storage = self.get_local_storage()?;
        Ok(local_storage.get_item(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let local_storage = self.get_local_storage()?;
        local_storage.set_item(key, value)?;
        Ok(())
    }
}

impl From<LocalStorage> for Box<dyn ThemeStorage> {
    fn from(storage: LocalStorage) -> Self {
        Box::new(storage)
    }
}
