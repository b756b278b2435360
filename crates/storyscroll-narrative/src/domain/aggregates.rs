//! Aggregate root for the Narrative Progression context.

use storyscroll_core::clock::Clock;
use storyscroll_core::error::StoryError;
use storyscroll_core::event::EventMetadata;
use storyscroll_core::geometry::Viewport;
use storyscroll_core::latch::Latch;
use storyscroll_core::observable::SubscriptionId;
use tracing::{debug, info};
use uuid::Uuid;

use super::catalog::{Catalog, SectionId};
use super::completion::{CompletionState, CompletionTracker};
use super::events::{
    AvatarRelocated, GalleryRevealed, GateRedirected, NarrativeEvent, NarrativeEventKind,
    SectionCompleted,
};
use super::gate::{self, GateDecision};
use super::progression::{Progression, ProgressionMapper, WalkingBounds};

/// The narrative state of one viewing session.
#[derive(Debug)]
pub struct StoryNarrative {
    /// Session identifier.
    pub id: Uuid,
    catalog: Catalog,
    completion: CompletionTracker,
    progression: Progression,
    gallery: Latch,
    /// Number of events already handed off.
    pub(crate) version: i64,
    uncommitted_events: Vec<NarrativeEvent>,
}

impl StoryNarrative {
    /// Creates a fresh narrative: nothing complete, avatar on the track,
    /// gallery hidden.
    #[must_use]
    pub fn new(id: Uuid, catalog: Catalog, walking: WalkingBounds) -> Self {
        let completion = CompletionTracker::new(&catalog);
        let progression = Progression::new(ProgressionMapper::from_catalog(&catalog, walking));
        Self {
            id,
            catalog,
            completion,
            progression,
            gallery: Latch::Open,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// The section catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Completion snapshot.
    #[must_use]
    pub fn completion(&self) -> &CompletionState {
        self.completion.state()
    }

    /// Whether a section is complete.
    #[must_use]
    pub fn is_complete(&self, id: &SectionId) -> bool {
        self.completion.is_complete(id)
    }

    /// Mapper and relocation latch.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Whether the closing gallery is visible.
    #[must_use]
    pub fn is_gallery_revealed(&self) -> bool {
        self.gallery.is_tripped()
    }

    /// The section revealed by the finale, if the catalog has one.
    #[must_use]
    pub fn gallery_section(&self) -> Option<&SectionId> {
        self.catalog.next_after(self.catalog.finale()).map(|s| &s.id)
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: NarrativeEventKind, clock: &dyn Clock) {
        let metadata = EventMetadata::new(kind.event_type(), self.id, self.next_sequence_number(), clock);
        self.uncommitted_events.push(NarrativeEvent { metadata, kind });
    }

    /// Marks a section complete, producing `SectionCompleted` the first time.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UnknownSection` if `id` is not in the catalog.
    pub fn complete_section(&mut self, id: &SectionId, clock: &dyn Clock) -> Result<bool, StoryError> {
        let newly = self.completion.mark_complete(id)?;
        if newly {
            self.record(
                NarrativeEventKind::SectionCompleted(SectionCompleted {
                    section_id: id.clone(),
                }),
                clock,
            );
        }
        Ok(newly)
    }

    /// Checks the relocation checkpoint's position. A missing anchor is
    /// skipped for this tick.
    pub fn observe_checkpoint(&mut self, viewport: &dyn Viewport, clock: &dyn Clock) -> bool {
        if self.progression.is_relocated() {
            return false;
        }
        let checkpoint = self.catalog.relocation_checkpoint().clone();
        let Ok(rect) = viewport.anchor_rect(checkpoint.as_str()) else {
            return false;
        };
        let height = viewport.geometry().viewport_height;
        if self.progression.observe_checkpoint(rect, height) {
            self.record(
                NarrativeEventKind::AvatarRelocated(AvatarRelocated { checkpoint }),
                clock,
            );
            return true;
        }
        false
    }

    /// Evaluates the scroll gate against the current layout.
    #[must_use]
    pub fn evaluate_gate(&self, viewport: &dyn Viewport) -> GateDecision {
        gate::evaluate(&self.catalog, self.completion.state(), viewport)
    }

    /// Records that the viewport was sent back to `section_id`.
    pub fn record_redirect(&mut self, section_id: &SectionId, progress: f64, clock: &dyn Clock) {
        info!(section = %section_id, progress, "redirecting to incomplete section");
        self.record(
            NarrativeEventKind::GateRedirected(GateRedirected {
                section_id: section_id.clone(),
                progress,
            }),
            clock,
        );
    }

    /// Runs the finale: relocates the avatar, completes the finale section and
    /// reveals the gallery. Returns the gallery section, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UnknownSection` if the finale id is not in the
    /// catalog, which a validated catalog rules out.
    pub fn open_finale(&mut self, clock: &dyn Clock) -> Result<Option<SectionId>, StoryError> {
        if self.progression.relocate() {
            self.record(
                NarrativeEventKind::AvatarRelocated(AvatarRelocated {
                    checkpoint: self.catalog.relocation_checkpoint().clone(),
                }),
                clock,
            );
        }

        let finale = self.catalog.finale().clone();
        self.complete_section(&finale, clock)?;

        let gallery = self.gallery_section().cloned();
        if let Some(section_id) = &gallery {
            if self.gallery.trip() {
                debug!(section = %section_id, "gallery revealed");
                self.record(
                    NarrativeEventKind::GalleryRevealed(GalleryRevealed {
                        section_id: section_id.clone(),
                    }),
                    clock,
                );
            }
        }
        Ok(gallery)
    }

    /// Clears every completion and latch in one step, for a replay.
    pub fn reset(&mut self, clock: &dyn Clock) {
        self.completion.reset();
        self.progression.reset();
        self.gallery.reset();
        info!("narrative reset for replay");
        self.record(NarrativeEventKind::NarrativeReset, clock);
    }

    /// Registers a completion observer.
    pub fn subscribe_completion(
        &mut self,
        subscriber: impl FnMut(&CompletionState) + 'static,
    ) -> SubscriptionId {
        self.completion.subscribe(subscriber)
    }

    /// Removes a completion observer.
    pub fn unsubscribe_completion(&mut self, id: SubscriptionId) -> bool {
        self.completion.unsubscribe(id)
    }

    /// Drops every completion observer.
    pub fn clear_completion_subscribers(&mut self) {
        self.completion.clear_subscribers();
    }

    /// Events produced since the last hand-off.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[NarrativeEvent] {
        &self.uncommitted_events
    }

    /// Hands off pending events and advances the version past them.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<NarrativeEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }
}
