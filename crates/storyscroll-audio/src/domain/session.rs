//! Audio Session aggregate.
//!
//! States: `Stopped` (before mount), `Playing`, `Paused`. The persisted play
//! intent is separate from the state: an autoplay rejection leaves the
//! session `Paused` while the intent stays "playing", which is what arms the
//! interaction fallback.

use serde::Serialize;
use storyscroll_core::clock::Clock;
use storyscroll_core::event::EventMetadata;
use storyscroll_core::storage::KeyValueStore;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{AudioEvent, AudioEventKind, PlaybackPaused, PlaybackStarted};
use super::persisted::{AudioSessionState, StorageKeys, save_playing, save_position};

/// Playback state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// Not yet mounted.
    #[default]
    Stopped,
    /// Audible.
    Playing,
    /// Silent, either by request or because the environment refused.
    Paused,
}

/// Whether a user interaction should retry playback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Recovery {
    /// Nothing to retry.
    #[default]
    Idle,
    /// Retry on the next pointer, touch or key interaction.
    Armed,
}

/// The ambient soundtrack session.
#[derive(Debug)]
pub struct AudioSession<S> {
    /// Session identifier.
    pub id: Uuid,
    store: S,
    keys: StorageKeys,
    state: PlaybackState,
    intent_playing: bool,
    position_seconds: f64,
    recovery: Recovery,
    version: i64,
    uncommitted_events: Vec<AudioEvent>,
}

impl<S: KeyValueStore> AudioSession<S> {
    /// Creates an unmounted session persisting through `store`.
    #[must_use]
    pub fn new(id: Uuid, store: S, keys: StorageKeys) -> Self {
        Self {
            id,
            store,
            keys,
            state: PlaybackState::Stopped,
            intent_playing: true,
            position_seconds: 0.0,
            recovery: Recovery::Idle,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the reader's last intent was "playing".
    #[must_use]
    pub fn intent_playing(&self) -> bool {
        self.intent_playing
    }

    /// Last known playhead position.
    #[must_use]
    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    /// Interaction fallback state.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        self.recovery
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads persisted state into the session. Each unreadable key falls back
    /// to its fresh-session default.
    pub fn restore(&mut self) -> AudioSessionState {
        let restored = AudioSessionState::load(&self.store, &self.keys);
        self.position_seconds = restored.position_seconds;
        self.intent_playing = restored.is_playing;
        restored
    }

    /// Playback started on the backend.
    pub fn playback_started(&mut self, clock: &dyn Clock) {
        self.recovery = Recovery::Idle;
        self.intent_playing = true;
        let was = std::mem::replace(&mut self.state, PlaybackState::Playing);
        self.persist_playing(true);
        if was != PlaybackState::Playing {
            info!(position = self.position_seconds, "playback started");
            self.record(
                AudioEventKind::PlaybackStarted(PlaybackStarted {
                    position_seconds: self.position_seconds,
                }),
                clock,
            );
        }
    }

    /// The environment refused playback. The intent is left untouched and
    /// the interaction fallback is armed if the intent is still "playing".
    pub fn playback_rejected(&mut self, clock: &dyn Clock) {
        self.state = PlaybackState::Paused;
        if self.intent_playing {
            self.recovery = Recovery::Armed;
        }
        debug!(recovery = ?self.recovery, "playback deferred until interaction");
        self.record(AudioEventKind::PlaybackDeferred, clock);
    }

    /// Playback paused. A user pause records "not playing" as the intent;
    /// an environment pause keeps the intent.
    pub fn playback_paused(&mut self, by_user: bool, clock: &dyn Clock) {
        let was = std::mem::replace(&mut self.state, PlaybackState::Paused);
        if by_user {
            self.intent_playing = false;
            self.recovery = Recovery::Idle;
            self.persist_playing(false);
        }
        if was == PlaybackState::Playing {
            info!(position = self.position_seconds, by_user, "playback paused");
            self.record(
                AudioEventKind::PlaybackPaused(PlaybackPaused {
                    position_seconds: self.position_seconds,
                    by_user,
                }),
                clock,
            );
        }
    }

    /// Records the reader's wish to resume before the play attempt resolves.
    pub fn resume_requested(&mut self) {
        self.intent_playing = true;
        self.persist_playing(true);
    }

    /// Playhead advanced; written through to storage.
    pub fn position_advanced(&mut self, position_seconds: f64) {
        if !position_seconds.is_finite() || position_seconds < 0.0 {
            return;
        }
        self.position_seconds = position_seconds;
        if let Err(e) = save_position(&mut self.store, &self.keys, position_seconds) {
            warn!(error = %e, "could not persist audio position");
        }
    }

    /// Disarms the interaction fallback if armed. Returns whether it was.
    pub fn take_recovery(&mut self) -> bool {
        std::mem::take(&mut self.recovery) == Recovery::Armed
    }

    /// Whether a retry should be attempted right now.
    #[must_use]
    pub fn wants_playback(&self) -> bool {
        self.intent_playing && self.state != PlaybackState::Playing
    }

    fn persist_playing(&mut self, is_playing: bool) {
        if let Err(e) = save_playing(&mut self.store, &self.keys, is_playing) {
            warn!(error = %e, "could not persist audio play state");
        }
    }

    #[allow(clippy::cast_possible_wrap)]
    fn record(&mut self, kind: AudioEventKind, clock: &dyn Clock) {
        let sequence_number = self.version + self.uncommitted_events.len() as i64 + 1;
        let metadata = EventMetadata::new(kind.event_type(), self.id, sequence_number, clock);
        self.uncommitted_events.push(AudioEvent { metadata, kind });
    }

    /// Events produced since the last hand-off.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[AudioEvent] {
        &self.uncommitted_events
    }

    /// Hands off pending events.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<AudioEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }
}
