//! Rising-edge detection over the dispatcher signal.

use super::dispatcher::{EffectSignal, EffectVariant};

/// Remembers the last activation it fired for, so each activation fires
/// once however many render passes observe it. A clear followed by a new
/// trigger between two passes still counts as a new edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    last_fired: u64,
}

impl EdgeTrigger {
    /// Feeds one observation. Returns the variant when the signal is active
    /// for an activation not yet fired.
    pub fn observe(&mut self, signal: EffectSignal) -> Option<EffectVariant> {
        if !signal.active || signal.activation == self.last_fired {
            return None;
        }
        self.last_fired = signal.activation;
        Some(signal.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(active: bool, activation: u64) -> EffectSignal {
        EffectSignal {
            active,
            variant: EffectVariant::Burst,
            activation,
        }
    }

    #[test]
    fn test_fires_once_per_activation() {
        let mut edge = EdgeTrigger::default();

        let fired: Vec<bool> = [(false, 0), (true, 1), (true, 1), (true, 1), (false, 1), (true, 2)]
            .into_iter()
            .map(|(active, activation)| edge.observe(signal(active, activation)).is_some())
            .collect();

        assert_eq!(fired, vec![false, true, false, false, false, true]);
    }

    #[test]
    fn test_new_activation_fires_without_observed_clear() {
        let mut edge = EdgeTrigger::default();

        let first = edge.observe(signal(true, 1));
        let second = edge.observe(signal(true, 2));

        assert!(first.is_some());
        assert!(second.is_some());
    }
}
