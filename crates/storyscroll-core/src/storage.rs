//! Key-value persistence abstraction.
//!
//! Mirrors a browser's local storage: string keys, string values, and a
//! backend that may refuse access at any time.

use crate::error::StoryError;

/// String key-value store used for session persistence.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StorageUnavailable` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoryError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::StorageUnavailable` if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoryError>;
}
