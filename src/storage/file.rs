//! File-based storage for native environments.
//!
//! Each key is persisted as a small JSON document inside a directory, so the theme
//! preference of a desktop or terminal front end survives restarts.

use crate::storage::{StorageError, ThemeStorage};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// File-based storage backend that persists values to JSON files on disk.
///
/// A key maps to `<directory>/<key>.json`. Bytes of the key outside `[A-Za-z0-9_-]`
/// are written as `%XX`, so every key stays a single file name inside the directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Creates a new instance of [`FileStorage`]. The directory is created on first write.
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Returns the directory the values are stored in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn entry(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("%{byte:02X}"));
            }
        }
        name.push_str(".json");
        self.directory.join(name)
    }
}

impl ThemeStorage for FileStorage {
    fn get(&mut self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.entry(key)) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.directory)?;
        fs::write(self.entry(key), serde_json::to_string(value)?)?;
        Ok(())
    }
}

impl From<FileStorage> for Box<dyn ThemeStorage> {
    fn from(storage: FileStorage) -> Self {
        Box::new(storage)
    }
}
