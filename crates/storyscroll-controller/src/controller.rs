//! Story controller: wires the narrative, effects and audio contexts to the
//! host.
//!
//! The host forwards its events (scroll, interaction, animation frame, media
//! time updates) and section callbacks here, and carries out the returned
//! scroll directives. After [`StoryController::teardown`] every handler is a
//! no-op.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use storyscroll_audio::application::command_handlers::{self as audio, PlaybackOutcome};
use storyscroll_audio::domain::session::{AudioSession, PlaybackState, Recovery};
use storyscroll_core::audio::AudioBackend;
use storyscroll_core::clock::Clock;
use storyscroll_core::geometry::Viewport;
use storyscroll_core::host::{EventHost, ListenerHandle, ListenerKind, ListenerOptions};
use storyscroll_core::observable::SubscriptionId;
use storyscroll_core::rng::{DeterministicRng, StdRngSource};
use storyscroll_core::storage::KeyValueStore;
use storyscroll_effects::application::renderer::EffectRenderer;
use storyscroll_effects::domain::dispatcher::{EffectDispatcher, EffectSignal, EffectVariant};
use storyscroll_effects::domain::profiles::EffectPlan;
use storyscroll_narrative::application::query_handlers::{TimelineView, get_timeline};
use storyscroll_narrative::application::tick_handlers::handle_scroll_tick;
use storyscroll_narrative::domain::aggregates::StoryNarrative;
use storyscroll_narrative::domain::catalog::SectionId;
use storyscroll_narrative::domain::completion::CompletionState;
use storyscroll_narrative::domain::gate::GateDecision;
use storyscroll_narrative::domain::goals::GoalSignal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::StoryConfig;
use crate::error::ConfigError;
use crate::journal::{Journal, StoryEvent};

/// A scroll the host should perform, always with smooth behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scroll", content = "section_id", rename_all = "snake_case")]
pub enum ScrollDirective {
    /// Bring the section's leading edge into view.
    IntoView(SectionId),
    /// Return to the top of the document.
    ToTop,
}

/// Result of one scroll tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollUpdate {
    /// Timeline to render.
    pub timeline: TimelineView,
    /// Gate evaluation for this tick.
    pub gate: GateDecision,
    /// Corrective scroll, when the reader skipped an unmet section.
    pub directive: Option<ScrollDirective>,
}

/// Work for one animation frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Celebration to start on this frame.
    pub effect: Option<EffectPlan>,
    /// Deferred scroll that fell due.
    pub directive: Option<ScrollDirective>,
}

/// Where the controller is in its owning view's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, no listeners yet.
    Unmounted,
    /// Listening to the host.
    Mounted,
    /// Detached; every handler is inert.
    TornDown,
}

#[derive(Debug, Clone)]
struct PendingScroll {
    due: DateTime<Utc>,
    directive: ScrollDirective,
}

/// The progression controller for one viewing session.
pub struct StoryController<S, H> {
    session_id: Uuid,
    narrative: StoryNarrative,
    effects: EffectDispatcher,
    renderer: EffectRenderer,
    audio: AudioSession<S>,
    backend: Arc<dyn AudioBackend>,
    clock: Arc<dyn Clock>,
    host: H,
    lifecycle: Lifecycle,
    scroll_listener: Option<ListenerHandle>,
    fallback_listeners: Vec<ListenerHandle>,
    pending_scroll: Option<PendingScroll>,
    last_progress: f64,
    fill_cap: f64,
    journal: Journal,
}

impl<S: KeyValueStore, H: EventHost> StoryController<S, H> {
    /// Builds an unmounted controller.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configured catalog is invalid.
    pub fn new(
        config: &StoryConfig,
        store: S,
        host: H,
        backend: Arc<dyn AudioBackend>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let session_id = Uuid::new_v4();
        Ok(Self {
            session_id,
            narrative: StoryNarrative::new(session_id, config.catalog()?, config.walking_bounds()),
            effects: EffectDispatcher::new(session_id, config.hold()),
            renderer: EffectRenderer::new(Box::new(StdRngSource::from_os())),
            audio: AudioSession::new(session_id, store, config.storage_keys.clone()),
            backend,
            clock,
            host,
            lifecycle: Lifecycle::Unmounted,
            scroll_listener: None,
            fallback_listeners: Vec::new(),
            pending_scroll: None,
            last_progress: 0.0,
            fill_cap: config.track_fill_cap,
            journal: Journal::default(),
        })
    }

    /// Replaces the randomness used for firework origins.
    #[must_use]
    pub fn with_rng(mut self, rng: Box<dyn DeterministicRng>) -> Self {
        self.renderer = EffectRenderer::new(rng);
        self
    }

    /// Session identifier shared by every event.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// The host the controller listens on.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The persistence backend.
    #[must_use]
    pub fn store(&self) -> &S {
        self.audio.store()
    }

    /// Narrative state.
    #[must_use]
    pub fn narrative(&self) -> &StoryNarrative {
        &self.narrative
    }

    /// Playback state.
    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.audio.state()
    }

    /// Current celebration signal.
    #[must_use]
    pub fn effect_signal(&self) -> EffectSignal {
        self.effects.signal()
    }

    /// Timeline at the last observed scroll progress.
    #[must_use]
    pub fn timeline(&self) -> TimelineView {
        get_timeline(&self.narrative, self.last_progress, self.fill_cap)
    }

    fn is_torn_down(&self) -> bool {
        self.lifecycle == Lifecycle::TornDown
    }

    /// Attaches the passive scroll listener and seeds playback from storage.
    /// Mounting twice is a no-op.
    pub async fn mount(&mut self) {
        if self.lifecycle != Lifecycle::Unmounted {
            return;
        }
        self.lifecycle = Lifecycle::Mounted;
        self.scroll_listener = Some(self.host.add_listener(ListenerKind::Scroll, ListenerOptions::PASSIVE));

        let outcome = audio::handle_mount(&mut self.audio, self.backend.as_ref(), self.clock.as_ref()).await;
        info!(session = %self.session_id, ?outcome, "story mounted");
        self.after_audio();
    }

    /// Scroll listener: samples progress, latches relocation and evaluates
    /// the gate.
    pub fn on_scroll(&mut self, viewport: &dyn Viewport) -> Option<ScrollUpdate> {
        if self.is_torn_down() {
            return None;
        }
        let tick = handle_scroll_tick(&mut self.narrative, viewport, self.clock.as_ref());
        self.last_progress = tick.progress;
        if let GateDecision::AnchorMissing(section_id) = &tick.gate {
            debug!(section = %section_id, "gate anchor missing, retrying next tick");
        }
        let directive = tick.redirect_target().cloned().map(ScrollDirective::IntoView);
        self.collect();

        Some(ScrollUpdate {
            timeline: get_timeline(&self.narrative, tick.progress, self.fill_cap),
            gate: tick.gate,
            directive,
        })
    }

    /// Section callback: the section's success condition was met. Returns
    /// whether this call completed it. Unknown ids are logged and ignored.
    pub fn complete_section(&mut self, section_id: &str) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let section_id = SectionId::new(section_id);
        match self.narrative.complete_section(&section_id, self.clock.as_ref()) {
            Ok(newly) => {
                self.collect();
                newly
            }
            Err(e) => {
                warn!(error = %e, "ignoring completion");
                false
            }
        }
    }

    /// Section callback: fire a celebration. Returns whether this produced a
    /// new activation.
    pub fn celebrate(&mut self, variant: EffectVariant) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let fired = self.effects.trigger(variant, self.clock.as_ref());
        self.collect();
        fired
    }

    /// Applies a goal's signal on behalf of `section_id`.
    pub fn report_goal(&mut self, section_id: &str, signal: GoalSignal, variant: EffectVariant) {
        if signal.complete {
            self.complete_section(section_id);
        }
        if signal.celebrate {
            self.celebrate(variant);
        }
    }

    /// Hero start button: completes the opening section, starts the music
    /// and returns the scroll to the next section.
    pub async fn start(&mut self) -> Option<ScrollDirective> {
        if self.is_torn_down() {
            return None;
        }
        let hero = self.narrative.catalog().first().id.clone();
        self.complete_section(hero.as_str());
        let next = self
            .narrative
            .catalog()
            .next_after(&hero)
            .map(|s| ScrollDirective::IntoView(s.id.clone()));

        let outcome = audio::handle_start(&mut self.audio, self.backend.as_ref(), self.clock.as_ref()).await;
        debug!(?outcome, "start pressed");
        self.after_audio();
        next
    }

    /// Finale: relocates the avatar, completes the finale, fires fireworks,
    /// reveals the gallery and schedules a scroll to it after the
    /// celebration hold.
    pub fn open_letter(&mut self) {
        if self.is_torn_down() {
            return;
        }
        let gallery = match self.narrative.open_finale(self.clock.as_ref()) {
            Ok(gallery) => gallery,
            Err(e) => {
                warn!(error = %e, "finale could not open");
                return;
            }
        };
        self.effects.trigger(EffectVariant::Fireworks, self.clock.as_ref());
        if let Some(section_id) = gallery {
            self.pending_scroll = Some(PendingScroll {
                due: self.clock.now() + self.effects.hold(),
                directive: ScrollDirective::IntoView(section_id),
            });
        }
        self.collect();
    }

    /// Replay: clears every completion and latch and returns to the top.
    pub fn replay(&mut self) -> Option<ScrollDirective> {
        if self.is_torn_down() {
            return None;
        }
        self.narrative.reset(self.clock.as_ref());
        self.pending_scroll = None;
        self.collect();
        Some(ScrollDirective::ToTop)
    }

    /// Animation frame: lets the renderer see the current signal, clears an
    /// expired celebration and releases a due deferred scroll.
    pub fn on_frame(&mut self) -> Frame {
        if self.is_torn_down() {
            return Frame::default();
        }
        let effect = self.renderer.render_pass(self.effects.signal());
        self.effects.poll(self.clock.as_ref());

        let directive = if self.pending_scroll.as_ref().is_some_and(|p| self.clock.reached(p.due)) {
            self.pending_scroll.take().map(|p| p.directive)
        } else {
            None
        };
        Frame { effect, directive }
    }

    /// Music toggle.
    pub async fn toggle_music(&mut self) -> PlaybackOutcome {
        if self.is_torn_down() {
            return PlaybackOutcome::Unchanged;
        }
        let outcome = audio::handle_toggle(&mut self.audio, self.backend.as_ref(), self.clock.as_ref()).await;
        self.after_audio();
        outcome
    }

    /// Pointer, touch or key interaction while the playback fallback is
    /// armed.
    pub async fn on_interaction(&mut self) -> PlaybackOutcome {
        if self.is_torn_down() {
            return PlaybackOutcome::Unchanged;
        }
        let outcome =
            audio::handle_interaction(&mut self.audio, self.backend.as_ref(), self.clock.as_ref()).await;
        self.after_audio();
        outcome
    }

    /// Media time update.
    pub fn on_time_update(&mut self, position_seconds: f64) {
        if self.is_torn_down() {
            return;
        }
        audio::handle_time_update(&mut self.audio, position_seconds);
    }

    /// Registers a completion observer; dropped at teardown.
    pub fn subscribe_completion(
        &mut self,
        subscriber: impl FnMut(&CompletionState) + 'static,
    ) -> SubscriptionId {
        self.narrative.subscribe_completion(subscriber)
    }

    /// Removes a completion observer.
    pub fn unsubscribe_completion(&mut self, id: SubscriptionId) -> bool {
        self.narrative.unsubscribe_completion(id)
    }

    /// Detaches every listener, cancels pending timers and drops observers.
    pub fn teardown(&mut self) {
        if self.is_torn_down() {
            return;
        }
        if let Some(handle) = self.scroll_listener.take() {
            self.host.remove_listener(handle);
        }
        for handle in self.fallback_listeners.drain(..) {
            self.host.remove_listener(handle);
        }
        self.pending_scroll = None;
        self.effects.cancel();
        self.narrative.clear_completion_subscribers();
        self.lifecycle = Lifecycle::TornDown;
        info!(session = %self.session_id, "story torn down");
    }

    /// Hands the pending journal to the host.
    pub fn drain_events(&mut self) -> Vec<StoryEvent> {
        self.collect();
        self.journal.drain()
    }

    fn after_audio(&mut self) {
        self.sync_fallback_listeners();
        self.collect();
    }

    // Interaction listeners exist only while a playback retry is armed.
    fn sync_fallback_listeners(&mut self) {
        if self.lifecycle != Lifecycle::Mounted {
            return;
        }
        let armed = self.audio.recovery() == Recovery::Armed;
        if armed && self.fallback_listeners.is_empty() {
            self.fallback_listeners = ListenerKind::INTERACTIONS
                .into_iter()
                .map(|kind| self.host.add_listener(kind, ListenerOptions::PASSIVE))
                .collect();
            debug!("interaction fallback armed");
        } else if !armed {
            for handle in self.fallback_listeners.drain(..) {
                self.host.remove_listener(handle);
            }
        }
    }

    fn collect(&mut self) {
        let narrative = self.narrative.take_uncommitted_events();
        let effects = self.effects.take_uncommitted_events();
        let audio = self.audio.take_uncommitted_events();
        self.journal.extend(narrative.into_iter().map(StoryEvent::Narrative));
        self.journal.extend(effects.into_iter().map(StoryEvent::Effect));
        self.journal.extend(audio.into_iter().map(StoryEvent::Audio));
    }
}

impl<S, H> fmt::Debug for StoryController<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryController")
            .field("session_id", &self.session_id)
            .field("lifecycle", &self.lifecycle)
            .field("last_progress", &self.last_progress)
            .field("pending_events", &self.journal.pending().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use storyscroll_test_support::{ManualClock, MemoryStore, MockRng, RecordingHost, ScriptedAudioBackend};

    use super::*;

    fn controller() -> StoryController<MemoryStore, RecordingHost> {
        StoryController::new(
            &StoryConfig::default(),
            MemoryStore::new(),
            RecordingHost::new(),
            Arc::new(ScriptedAudioBackend::allowing()),
            Arc::new(ManualClock::at_epoch()),
        )
        .unwrap()
        .with_rng(Box::new(MockRng))
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = StoryConfig {
            finale_section: "nowhere".into(),
            ..StoryConfig::default()
        };

        let result = StoryController::new(
            &config,
            MemoryStore::new(),
            RecordingHost::new(),
            Arc::new(ScriptedAudioBackend::allowing()),
            Arc::new(ManualClock::at_epoch()),
        );

        assert!(matches!(result, Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_unknown_completion_is_ignored() {
        let mut controller = controller();

        assert!(!controller.complete_section("epilogue"));
        assert!(controller.drain_events().is_empty());
    }

    #[test]
    fn test_report_goal_completes_then_celebrates() {
        // Arrange
        let mut controller = controller();
        let signal = GoalSignal {
            complete: true,
            celebrate: true,
        };

        // Act
        controller.report_goal("love-meter", signal, EffectVariant::Hearts);

        // Assert
        let types: Vec<&str> = controller
            .drain_events()
            .iter()
            .map(storyscroll_core::event::DomainEvent::event_type)
            .collect();
        assert_eq!(types, vec!["narrative.section_completed", "effects.celebration_triggered"]);
        assert!(controller.effect_signal().active);
    }

    #[test]
    fn test_replay_cancels_pending_gallery_scroll() {
        let mut controller = controller();
        controller.open_letter();

        assert_eq!(controller.replay(), Some(ScrollDirective::ToTop));

        assert!(controller.pending_scroll.is_none());
        assert!(!controller.narrative().is_gallery_revealed());
    }
}
