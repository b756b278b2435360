//! Effect Dispatcher.
//!
//! `trigger` raises an "active" signal and records the variant. The signal
//! lowers once the hold interval has elapsed, checked by `poll` and by the
//! next `trigger`, so a trigger after the hold always opens a new activation.
//! Renderers fire once per activation, not per pass.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use storyscroll_core::clock::Clock;
use storyscroll_core::event::EventMetadata;
use tracing::debug;
use uuid::Uuid;

use super::events::{CelebrationTriggered, EffectEvent, EffectEventKind};

/// Celebration variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectVariant {
    /// Short omnidirectional burst.
    #[default]
    Burst,
    /// Timed sequence of randomized-origin fireworks.
    Fireworks,
    /// Heart-shaped emitters with a delayed pulse.
    Hearts,
}

impl fmt::Display for EffectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Burst => "burst",
            Self::Fireworks => "fireworks",
            Self::Hearts => "hearts",
        };
        f.write_str(label)
    }
}

/// What renderers observe on each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectSignal {
    /// Whether an activation is in its on-period.
    pub active: bool,
    /// Most recently requested variant.
    pub variant: EffectVariant,
    /// Ordinal of the most recent activation; `0` before the first.
    pub activation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Active { since: DateTime<Utc> },
}

/// Edge-triggered broadcaster for celebratory effects.
#[derive(Debug)]
pub struct EffectDispatcher {
    session_id: Uuid,
    hold: TimeDelta,
    phase: Phase,
    variant: EffectVariant,
    activations: u64,
    version: i64,
    uncommitted_events: Vec<EffectEvent>,
}

impl EffectDispatcher {
    /// Default on-period, roughly a handful of animation frames.
    pub const DEFAULT_HOLD_MS: i64 = 100;

    /// Creates an idle dispatcher whose activations last `hold`.
    #[must_use]
    pub fn new(session_id: Uuid, hold: TimeDelta) -> Self {
        Self {
            session_id,
            hold,
            phase: Phase::Idle,
            variant: EffectVariant::default(),
            activations: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// The on-period of an activation.
    #[must_use]
    pub fn hold(&self) -> TimeDelta {
        self.hold
    }

    /// Current signal.
    #[must_use]
    pub fn signal(&self) -> EffectSignal {
        EffectSignal {
            active: matches!(self.phase, Phase::Active { .. }),
            variant: self.variant,
            activation: self.activations,
        }
    }

    /// Requests a celebration. Returns `true` when this produced a new
    /// activation; a trigger inside an active window only updates the
    /// variant and produces no new edge.
    pub fn trigger(&mut self, variant: EffectVariant, clock: &dyn Clock) -> bool {
        self.poll(clock);
        self.variant = variant;
        if matches!(self.phase, Phase::Active { .. }) {
            debug!(%variant, "celebration already active");
            return false;
        }

        self.phase = Phase::Active { since: clock.now() };
        self.activations += 1;
        debug!(%variant, activation = self.activations, "celebration triggered");
        self.record(
            EffectEventKind::CelebrationTriggered(CelebrationTriggered {
                variant,
                activation: self.activations,
            }),
            clock,
        );
        true
    }

    /// Lowers the signal once the hold interval has elapsed. Returns `true`
    /// on the call that cleared it.
    pub fn poll(&mut self, clock: &dyn Clock) -> bool {
        match self.phase {
            Phase::Active { since } if clock.elapsed(since, self.hold) => {
                self.phase = Phase::Idle;
                true
            }
            _ => false,
        }
    }

    /// Drops any pending clear and returns to idle. Used on teardown.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    #[allow(clippy::cast_possible_wrap)]
    fn record(&mut self, kind: EffectEventKind, clock: &dyn Clock) {
        let sequence_number = self.version + self.uncommitted_events.len() as i64 + 1;
        let metadata = EventMetadata::new(kind.event_type(), self.session_id, sequence_number, clock);
        self.uncommitted_events.push(EffectEvent { metadata, kind });
    }

    /// Events produced since the last hand-off.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[EffectEvent] {
        &self.uncommitted_events
    }

    /// Hands off pending events.
    #[allow(clippy::cast_possible_wrap)]
    pub fn take_uncommitted_events(&mut self) -> Vec<EffectEvent> {
        let events = std::mem::take(&mut self.uncommitted_events);
        self.version += events.len() as i64;
        events
    }
}

#[cfg(test)]
mod tests {
    use storyscroll_test_support::ManualClock;

    use super::*;

    fn dispatcher() -> EffectDispatcher {
        EffectDispatcher::new(Uuid::new_v4(), TimeDelta::milliseconds(EffectDispatcher::DEFAULT_HOLD_MS))
    }

    #[test]
    fn test_trigger_raises_signal_and_records_variant() {
        // Arrange
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();

        // Act
        let fresh = dispatcher.trigger(EffectVariant::Hearts, &clock);

        // Assert
        assert!(fresh);
        let signal = dispatcher.signal();
        assert!(signal.active);
        assert_eq!(signal.variant, EffectVariant::Hearts);
        assert_eq!(signal.activation, 1);
        assert_eq!(dispatcher.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_trigger_within_active_window_adds_no_activation() {
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();

        dispatcher.trigger(EffectVariant::Burst, &clock);
        clock.advance_ms(30);
        let again = dispatcher.trigger(EffectVariant::Fireworks, &clock);

        assert!(!again);
        assert_eq!(dispatcher.signal().activation, 1);
        assert_eq!(dispatcher.signal().variant, EffectVariant::Fireworks);
        assert_eq!(dispatcher.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_poll_clears_after_hold() {
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();
        dispatcher.trigger(EffectVariant::Burst, &clock);

        clock.advance_ms(99);
        assert!(!dispatcher.poll(&clock));
        clock.advance_ms(1);
        assert!(dispatcher.poll(&clock));
        assert!(!dispatcher.poll(&clock));

        assert!(!dispatcher.signal().active);
    }

    #[test]
    fn test_trigger_after_clear_produces_new_activation() {
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();

        dispatcher.trigger(EffectVariant::Burst, &clock);
        clock.advance_ms(150);
        dispatcher.poll(&clock);
        let second = dispatcher.trigger(EffectVariant::Burst, &clock);

        assert!(second);
        assert_eq!(dispatcher.signal().activation, 2);
        assert_eq!(dispatcher.take_uncommitted_events().len(), 2);
        assert!(dispatcher.uncommitted_events().is_empty());
    }

    #[test]
    fn test_cancel_drops_pending_clear() {
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();
        dispatcher.trigger(EffectVariant::Hearts, &clock);

        dispatcher.cancel();

        assert!(!dispatcher.signal().active);
        assert!(!dispatcher.poll(&clock));
    }

    #[test]
    fn test_trigger_after_expired_hold_opens_new_activation_without_poll() {
        // Arrange
        let clock = ManualClock::at_epoch();
        let mut dispatcher = dispatcher();
        dispatcher.trigger(EffectVariant::Burst, &clock);

        // Act
        clock.advance_ms(500);
        let second = dispatcher.trigger(EffectVariant::Hearts, &clock);

        // Assert
        assert!(second);
        let signal = dispatcher.signal();
        assert!(signal.active);
        assert_eq!(signal.activation, 2);
        assert_eq!(signal.variant, EffectVariant::Hearts);
        assert_eq!(dispatcher.uncommitted_events().len(), 2);
    }
}
