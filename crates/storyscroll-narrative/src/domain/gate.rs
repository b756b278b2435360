//! Scroll Gatekeeper.
//!
//! Holds the reader at the first incomplete interactive section in catalog
//! order. Only interactive sections gate; decorative ones may be skipped.

use serde::Serialize;
use storyscroll_core::error::StoryError;
use storyscroll_core::geometry::Viewport;
use tracing::trace;

use super::catalog::{Catalog, Section, SectionId};
use super::completion::CompletionState;

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "section_id", rename_all = "snake_case")]
pub enum GateDecision {
    /// Every interactive section is complete; scrolling is free.
    Open,
    /// The gate section is unmet but still on or below the viewport.
    Holding(SectionId),
    /// The gate section's anchor is not registered; retried next tick.
    AnchorMissing(SectionId),
    /// The reader scrolled fully past the gate section; bring it back.
    Redirect(SectionId),
}

impl GateDecision {
    /// The section to scroll back to, if any.
    #[must_use]
    pub fn redirect_target(&self) -> Option<&SectionId> {
        match self {
            Self::Redirect(id) => Some(id),
            _ => None,
        }
    }
}

/// The first section in catalog order that is interactive and incomplete.
#[must_use]
pub fn first_incomplete_interactive<'a>(
    catalog: &'a Catalog,
    completion: &CompletionState,
) -> Option<&'a Section> {
    catalog
        .sections()
        .iter()
        .find(|s| s.interactive && !completion.contains(&s.id))
}

/// Evaluates the gate against the current layout.
///
/// Stops at the first unmet gate; a later incomplete section is never
/// considered while an earlier one is unmet.
pub fn evaluate(catalog: &Catalog, completion: &CompletionState, viewport: &dyn Viewport) -> GateDecision {
    let Some(gate) = first_incomplete_interactive(catalog, completion) else {
        return GateDecision::Open;
    };

    match viewport.anchor_rect(gate.id.as_str()) {
        Ok(rect) if rect.is_scrolled_past() => GateDecision::Redirect(gate.id.clone()),
        Ok(_) => GateDecision::Holding(gate.id.clone()),
        Err(StoryError::MissingAnchor(_)) => {
            trace!(section = %gate.id, "gate anchor not registered yet");
            GateDecision::AnchorMissing(gate.id.clone())
        }
        Err(e) => {
            trace!(section = %gate.id, error = %e, "gate anchor query failed");
            GateDecision::AnchorMissing(gate.id.clone())
        }
    }
}
