//! Test RNG: deterministic `DeterministicRng` implementations for tests.

use storyscroll_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min` for `next_u32_range` and `0.0` for
/// `next_f64`. Suitable for tests that do not depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }

    fn next_f64(&mut self) -> f64 {
        0.0
    }
}

/// An RNG that cycles through a predetermined list of unit-interval values.
/// Used where emission origins must be exact.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<f64>,
    index: usize,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values in `[0, 1)`.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, index: 0 }
    }
}

impl DeterministicRng for SequenceRng {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        let span = f64::from(max.saturating_sub(min));
        min + (self.next_f64() * span).round() as u32
    }

    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let val = self.values[self.index % self.values.len()];
        self.index += 1;
        val
    }
}
