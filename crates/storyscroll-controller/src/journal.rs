//! Session event journal.
//!
//! Every context keeps its own uncommitted events; the controller moves them
//! here after each handler so the host sees one stream in handling order.

use storyscroll_audio::domain::events::AudioEvent;
use storyscroll_core::event::{DomainEvent, EventMetadata};
use storyscroll_effects::domain::events::EffectEvent;
use storyscroll_narrative::domain::events::NarrativeEvent;

/// An event from any context.
#[derive(Debug, Clone)]
pub enum StoryEvent {
    /// Completion, gate, relocation, gallery or reset.
    Narrative(NarrativeEvent),
    /// Celebration.
    Effect(EffectEvent),
    /// Playback.
    Audio(AudioEvent),
}

impl DomainEvent for StoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            Self::Narrative(e) => e.event_type(),
            Self::Effect(e) => e.event_type(),
            Self::Audio(e) => e.event_type(),
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        match self {
            Self::Narrative(e) => e.to_payload(),
            Self::Effect(e) => e.to_payload(),
            Self::Audio(e) => e.to_payload(),
        }
    }

    fn metadata(&self) -> &EventMetadata {
        match self {
            Self::Narrative(e) => e.metadata(),
            Self::Effect(e) => e.metadata(),
            Self::Audio(e) => e.metadata(),
        }
    }
}

/// Append-only buffer of events awaiting the host.
#[derive(Debug, Default)]
pub struct Journal {
    events: Vec<StoryEvent>,
}

impl Journal {
    /// Appends a batch.
    pub fn extend(&mut self, events: impl IntoIterator<Item = StoryEvent>) {
        self.events.extend(events);
    }

    /// Pending events.
    #[must_use]
    pub fn pending(&self) -> &[StoryEvent] {
        &self.events
    }

    /// Removes and returns everything pending.
    pub fn drain(&mut self) -> Vec<StoryEvent> {
        std::mem::take(&mut self.events)
    }
}
