use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by translation store operations.
///
/// Missing translations and malformed persisted data are not errors: the
/// former is a normal lookup result, the latter is logged and treated as empty.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No language selected or no translation text provided. Nothing was changed.
    #[error("Please select a language and provide a translation")]
    MissingSelection,

    /// Every write attempt failed. In-memory state is kept and stays pending.
    #[error("Failed to save translations after {attempts} attempt(s): {source}")]
    PersistenceWriteFailure {
        attempts: u32,
        #[source]
        source: StorageError,
    },

    /// Stored translations could not be read, so other forms' records cannot be
    /// carried over. Nothing was written and the change stays pending.
    #[error("Failed to read stored translations before saving: {source}")]
    PersistenceReadFailure {
        #[source]
        source: StorageError,
    },

    #[error("Failed to serialize translations: {0}")]
    Serialize(#[from] serde_json::Error),
}
