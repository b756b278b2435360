//! Domain events for the Celebration Effects context.

use serde::{Deserialize, Serialize};
use storyscroll_core::event::{DomainEvent, EventMetadata};

use super::dispatcher::EffectVariant;

/// Emitted when a trigger produces a fresh activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelebrationTriggered {
    /// The selected variant.
    pub variant: EffectVariant,
    /// Ordinal of the activation within the session.
    pub activation: u64,
}

/// Event payload variants for the Celebration Effects context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectEventKind {
    /// A celebration was triggered.
    CelebrationTriggered(CelebrationTriggered),
}

/// Domain event envelope for the Celebration Effects context.
#[derive(Debug, Clone)]
pub struct EffectEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: EffectEventKind,
}

impl EffectEventKind {
    /// Routing name of the event type.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::CelebrationTriggered(_) => "effects.celebration_triggered",
        }
    }
}

impl DomainEvent for EffectEvent {
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
