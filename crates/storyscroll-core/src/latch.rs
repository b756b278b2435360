//! One-way latch state machine.
//!
//! A latch starts `Open` and can only move to `Tripped`. The single way back
//! is `reset`, reserved for a full narrative replay.

use serde::{Deserialize, Serialize};

/// Two-state, one-directional flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Latch {
    /// Not yet tripped.
    #[default]
    Open,
    /// Tripped; stays here until a full reset.
    Tripped,
}

impl Latch {
    /// Trips the latch. Returns `true` only on the call that performed the
    /// `Open -> Tripped` transition.
    pub fn trip(&mut self) -> bool {
        match self {
            Self::Open => {
                *self = Self::Tripped;
                true
            }
            Self::Tripped => false,
        }
    }

    /// Whether the latch has been tripped.
    #[must_use]
    pub fn is_tripped(self) -> bool {
        matches!(self, Self::Tripped)
    }

    /// Returns the latch to `Open`.
    pub fn reset(&mut self) {
        *self = Self::Open;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_reports_transition_only_once() {
        let mut latch = Latch::default();

        assert!(latch.trip());
        assert!(!latch.trip());
        assert!(latch.is_tripped());
    }

    #[test]
    fn test_reset_reopens_latch() {
        let mut latch = Latch::Tripped;

        latch.reset();

        assert_eq!(latch, Latch::Open);
        assert!(latch.trip());
    }
}
