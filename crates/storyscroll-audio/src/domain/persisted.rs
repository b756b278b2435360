//! Persisted audio session state and its string codec.
//!
//! Two keys: the resume position as a stringified float, and the play
//! intent as `"true"`/`"false"`. A missing intent means "playing".

use serde::{Deserialize, Serialize};
use storyscroll_core::error::StoryError;
use storyscroll_core::storage::KeyValueStore;
use tracing::warn;

/// Storage key names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    /// Key holding the resume position in seconds.
    #[serde(default = "default_time_key")]
    pub time: String,
    /// Key holding the play intent.
    #[serde(default = "default_playing_key")]
    pub playing: String,
}

fn default_time_key() -> String {
    "audioTime".to_owned()
}

fn default_playing_key() -> String {
    "audioPlaying".to_owned()
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            time: default_time_key(),
            playing: default_playing_key(),
        }
    }
}

/// Fields that survive a reload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSessionState {
    /// Resume position in seconds.
    pub position_seconds: f64,
    /// Last user-visible play intent.
    pub is_playing: bool,
}

impl Default for AudioSessionState {
    fn default() -> Self {
        Self {
            position_seconds: 0.0,
            is_playing: true,
        }
    }
}

impl AudioSessionState {
    /// Reads the persisted state. Each key degrades on its own: an absent,
    /// unparsable or unreadable position reads as `0`, and only an explicit
    /// `"false"` reads as not playing, so an unreadable intent means playing.
    #[must_use]
    pub fn load(store: &dyn KeyValueStore, keys: &StorageKeys) -> Self {
        let position_seconds = read_key(store, &keys.time)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(0.0);
        let is_playing = read_key(store, &keys.playing).as_deref() != Some("false");
        Self {
            position_seconds,
            is_playing,
        }
    }

    /// Whether a position was worth restoring.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.position_seconds > 0.0
    }
}

fn read_key(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|e| {
        warn!(key, error = %e, "stored audio value unreadable, using default");
        None
    })
}

/// Writes the resume position.
///
/// # Errors
///
/// Returns `StoryError::StorageUnavailable` if the store cannot be written.
pub fn save_position(
    store: &mut dyn KeyValueStore,
    keys: &StorageKeys,
    position_seconds: f64,
) -> Result<(), StoryError> {
    store.set(&keys.time, &position_seconds.to_string())
}

/// Writes the play intent.
///
/// # Errors
///
/// Returns `StoryError::StorageUnavailable` if the store cannot be written.
pub fn save_playing(store: &mut dyn KeyValueStore, keys: &StorageKeys, is_playing: bool) -> Result<(), StoryError> {
    store.set(&keys.playing, if is_playing { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use storyscroll_test_support::{FailingStore, MemoryStore};

    use super::*;

    #[test]
    fn test_load_defaults_when_empty() {
        let store = MemoryStore::new();

        let state = AudioSessionState::load(&store, &StorageKeys::default());

        assert_eq!(state, AudioSessionState::default());
        assert!(state.is_playing);
    }

    #[test]
    fn test_load_reads_both_keys() {
        let store = MemoryStore::with_entries(&[("audioTime", "42"), ("audioPlaying", "false")]);

        let state = AudioSessionState::load(&store, &StorageKeys::default());

        assert!((state.position_seconds - 42.0).abs() < f64::EPSILON);
        assert!(!state.is_playing);
    }

    #[test]
    fn test_only_explicit_false_disables_playback() {
        let store = MemoryStore::with_entries(&[("audioPlaying", "nope")]);

        let state = AudioSessionState::load(&store, &StorageKeys::default());

        assert!(state.is_playing);
    }

    #[test]
    fn test_garbage_position_reads_as_zero() {
        for raw in ["abc", "NaN", "-3", "inf"] {
            let store = MemoryStore::with_entries(&[("audioTime", raw)]);

            let state = AudioSessionState::load(&store, &StorageKeys::default());

            assert!(state.position_seconds.abs() < f64::EPSILON, "{raw}");
        }
    }

    #[test]
    fn test_save_writes_string_values() {
        let mut store = MemoryStore::new();
        let keys = StorageKeys::default();

        save_position(&mut store, &keys, 12.5).unwrap();
        save_playing(&mut store, &keys, false).unwrap();

        assert_eq!(store.value("audioTime"), Some("12.5"));
        assert_eq!(store.value("audioPlaying"), Some("false"));
    }

    #[test]
    fn test_unavailable_store_reads_as_defaults() {
        let state = AudioSessionState::load(&FailingStore, &StorageKeys::default());

        assert_eq!(state, AudioSessionState::default());
    }

    #[test]
    fn test_unreadable_intent_keeps_readable_position() {
        // Arrange
        let store = MemoryStore::with_entries(&[("audioTime", "42"), ("audioPlaying", "false")])
            .deny("audioPlaying");

        // Act
        let state = AudioSessionState::load(&store, &StorageKeys::default());

        // Assert
        assert!((state.position_seconds - 42.0).abs() < f64::EPSILON);
        assert!(state.is_playing);
    }

    #[test]
    fn test_unreadable_position_keeps_readable_intent() {
        let store = MemoryStore::with_entries(&[("audioTime", "42"), ("audioPlaying", "false")]).deny("audioTime");

        let state = AudioSessionState::load(&store, &StorageKeys::default());

        assert!(state.position_seconds.abs() < f64::EPSILON);
        assert!(!state.is_playing);
    }
}
