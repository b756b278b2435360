//! Scroll tick handler for the Narrative Progression context.
//!
//! Runs once per throttled scroll event: samples progress, lets the
//! relocation checkpoint latch, and evaluates the gate.

use serde::Serialize;
use storyscroll_core::clock::Clock;
use storyscroll_core::geometry::Viewport;

use crate::domain::aggregates::StoryNarrative;
use crate::domain::catalog::SectionId;
use crate::domain::gate::GateDecision;
use crate::domain::progression::AvatarState;

/// Everything a scroll tick decided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollTick {
    /// Overall scroll progress in `[0, 1]`.
    pub progress: f64,
    /// Avatar state after this tick.
    pub avatar: AvatarState,
    /// Gate evaluation for this tick.
    pub gate: GateDecision,
    /// Whether this tick moved the avatar into the scene.
    pub relocated_now: bool,
}

impl ScrollTick {
    /// The section the viewport must be sent back to, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&SectionId> {
        self.gate.redirect_target()
    }
}

/// Handles one scroll tick.
pub fn handle_scroll_tick(
    narrative: &mut StoryNarrative,
    viewport: &dyn Viewport,
    clock: &dyn Clock,
) -> ScrollTick {
    let progress = viewport.geometry().scroll_progress();
    let relocated_now = narrative.observe_checkpoint(viewport, clock);

    let gate = narrative.evaluate_gate(viewport);
    if let GateDecision::Redirect(section_id) = &gate {
        narrative.record_redirect(section_id, progress, clock);
    }

    ScrollTick {
        progress,
        avatar: narrative.progression().avatar(progress),
        gate,
        relocated_now,
    }
}
