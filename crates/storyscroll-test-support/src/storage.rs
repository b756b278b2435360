//! Test stores: in-memory `KeyValueStore` implementations for tests.

use std::collections::{HashMap, HashSet};

use storyscroll_core::error::StoryError;
use storyscroll_core::storage::KeyValueStore;

/// A store backed by a `HashMap`. Counts writes so tests can check
/// write-through behavior.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    denied: HashSet<String>,
    writes: usize,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `entries`.
    #[must_use]
    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            values: entries
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            denied: HashSet::new(),
            writes: 0,
        }
    }

    /// Makes reads and writes of `key` fail while other keys keep working.
    #[must_use]
    pub fn deny(mut self, key: &str) -> Self {
        self.denied.insert(key.to_owned());
        self
    }

    fn check(&self, key: &str) -> Result<(), StoryError> {
        if self.denied.contains(key) {
            return Err(StoryError::StorageUnavailable(format!("access to {key} denied")));
        }
        Ok(())
    }

    /// Raw value under `key`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of successful `set` calls.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoryError> {
        self.check(key)?;
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoryError> {
        self.check(key)?;
        self.values.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

/// A store that refuses every read and write, like storage disabled by
/// privacy settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoryError> {
        Err(StoryError::StorageUnavailable("access denied".into()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoryError> {
        Err(StoryError::StorageUnavailable("access denied".into()))
    }
}
