//! Completion Tracker.
//!
//! One latch per catalog section. A latch only ever trips; the whole set is
//! reopened at once by `reset`, which is reserved for replay.

use std::collections::BTreeMap;

use storyscroll_core::error::StoryError;
use storyscroll_core::latch::Latch;
use storyscroll_core::observable::{Observable, SubscriptionId};
use tracing::debug;

use super::catalog::{Catalog, SectionId};

/// Snapshot of which sections are complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionState {
    latches: BTreeMap<SectionId, Latch>,
}

impl CompletionState {
    fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            latches: catalog
                .sections()
                .iter()
                .map(|s| (s.id.clone(), Latch::Open))
                .collect(),
        }
    }

    /// Whether `id` has been completed. Unknown ids are never complete.
    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.latches.get(id).is_some_and(|l| l.is_tripped())
    }

    /// Completed section ids, in id order.
    pub fn completed(&self) -> impl Iterator<Item = &SectionId> {
        self.latches
            .iter()
            .filter(|(_, latch)| latch.is_tripped())
            .map(|(id, _)| id)
    }

    /// Number of completed sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.completed().count()
    }

    /// True when nothing has been completed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Observable store of section completions.
#[derive(Debug)]
pub struct CompletionTracker {
    state: Observable<CompletionState>,
}

impl CompletionTracker {
    /// Creates a tracker with every catalog section incomplete.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            state: Observable::new(CompletionState::for_catalog(catalog)),
        }
    }

    /// Marks a section complete. Idempotent; returns `true` only when this
    /// call completed it.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::UnknownSection` if `id` is not in the catalog.
    pub fn mark_complete(&mut self, id: &SectionId) -> Result<bool, StoryError> {
        if !self.state.get().latches.contains_key(id) {
            return Err(StoryError::UnknownSection(id.to_string()));
        }
        let changed = self
            .state
            .update(|state| state.latches.get_mut(id).is_some_and(Latch::trip));
        if changed {
            debug!(section = %id, "section completed");
        }
        Ok(changed)
    }

    /// Whether `id` has been completed.
    #[must_use]
    pub fn is_complete(&self, id: &SectionId) -> bool {
        self.state.get().contains(id)
    }

    /// Clears every completion in a single notification.
    pub fn reset(&mut self) {
        let changed = self.state.update(|state| {
            let any = state.latches.values().any(|l| l.is_tripped());
            state.latches.values_mut().for_each(Latch::reset);
            any
        });
        if changed {
            debug!("completions reset");
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> &CompletionState {
        self.state.get()
    }

    /// Registers a callback invoked after every effective change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&CompletionState) + 'static) -> SubscriptionId {
        self.state.subscribe(subscriber)
    }

    /// Removes a callback registered with [`CompletionTracker::subscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Drops all callbacks.
    pub fn clear_subscribers(&mut self) {
        self.state.clear_subscribers();
    }
}
