//! Domain events for the Narrative Progression context.

use serde::{Deserialize, Serialize};
use storyscroll_core::event::{DomainEvent, EventMetadata};

use super::catalog::SectionId;

/// Emitted when a section's completion latch trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionCompleted {
    /// The completed section.
    pub section_id: SectionId,
}

/// Emitted when the gate scrolls the reader back to an unmet section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRedirected {
    /// The section the viewport is sent back to.
    pub section_id: SectionId,
    /// Scroll progress at the time of the redirect.
    pub progress: f64,
}

/// Emitted when the avatar leaves the track for the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarRelocated {
    /// The checkpoint that triggered the move.
    pub checkpoint: SectionId,
}

/// Emitted when the closing gallery is revealed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryRevealed {
    /// The revealed section.
    pub section_id: SectionId,
}

/// Event payload variants for the Narrative Progression context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NarrativeEventKind {
    /// A section was completed.
    SectionCompleted(SectionCompleted),
    /// The gate redirected the viewport.
    GateRedirected(GateRedirected),
    /// The avatar moved into the scene.
    AvatarRelocated(AvatarRelocated),
    /// The gallery became visible.
    GalleryRevealed(GalleryRevealed),
    /// Every completion and latch was cleared for a replay.
    NarrativeReset,
}

/// Domain event envelope for the Narrative Progression context.
#[derive(Debug, Clone)]
pub struct NarrativeEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: NarrativeEventKind,
}

impl NarrativeEventKind {
    /// Routing name of the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SectionCompleted(_) => "narrative.section_completed",
            Self::GateRedirected(_) => "narrative.gate_redirected",
            Self::AvatarRelocated(_) => "narrative.avatar_relocated",
            Self::GalleryRevealed(_) => "narrative.gallery_revealed",
            Self::NarrativeReset => "narrative.reset",
        }
    }
}

impl DomainEvent for NarrativeEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
