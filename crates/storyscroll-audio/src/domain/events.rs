//! Domain events for the Audio Session context.

use serde::{Deserialize, Serialize};
use storyscroll_core::event::{DomainEvent, EventMetadata};

/// Emitted when playback actually starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackStarted {
    /// Playhead position at the time.
    pub position_seconds: f64,
}

/// Emitted when playback pauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackPaused {
    /// Playhead position at the time.
    pub position_seconds: f64,
    /// Whether the reader asked for it, as opposed to the environment.
    pub by_user: bool,
}

/// Event payload variants for the Audio Session context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioEventKind {
    /// Playback started.
    PlaybackStarted(PlaybackStarted),
    /// Playback paused.
    PlaybackPaused(PlaybackPaused),
    /// Playback was refused; retried on the next interaction.
    PlaybackDeferred,
}

impl AudioEventKind {
    /// Routing name of the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PlaybackStarted(_) => "audio.playback_started",
            Self::PlaybackPaused(_) => "audio.playback_paused",
            Self::PlaybackDeferred => "audio.playback_deferred",
        }
    }
}

/// Domain event envelope for the Audio Session context.
#[derive(Debug, Clone)]
pub struct AudioEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AudioEventKind,
}

impl DomainEvent for AudioEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
