//! Durable key-value storage backing the translation store.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    /// Key would escape the storage directory or is empty.
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),
}

/// Minimal string key-value store.
///
/// A read issued after a successful `set_item` on the same key observes the written value.
pub trait KeyValueStorage {
    /// Returns the stored value, or `None` when the key was never written.
    ///
    /// # Errors
    /// Returns error if the underlying store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the underlying store cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// File-backed storage: each key is `<directory>/<key>.json`.
///
/// Writes go to a temporary sibling file which is then renamed over the
/// target, so readers never observe a partially written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Directory holding one file per key.
    directory: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file holding `key`.
    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { key: key.to_string(), source }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let io_error = |source| StorageError::Io { key: key.to_string(), source };

        std::fs::create_dir_all(&self.directory).map_err(io_error)?;
        let temp_path = self.directory.join(format!(".{key}.json.tmp"));
        std::fs::write(&temp_path, value).map_err(io_error)?;
        std::fs::rename(&temp_path, &path).map_err(io_error)?;

        tracing::trace!(path = %path.display(), bytes = value.len(), "Stored item");
        Ok(())
    }
}

/// In-memory storage, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    /// Stored values by key.
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for &mut S {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}
