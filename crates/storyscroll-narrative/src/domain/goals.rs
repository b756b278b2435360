//! Completion goals for interactive sections.
//!
//! Each goal owns a section's success condition and reports completion
//! exactly once, however often its input is fed.

use std::collections::BTreeSet;

use storyscroll_core::latch::Latch;

use super::progression::sanitize_progress;

/// What a goal asks of the controller after an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalSignal {
    /// Report the section complete.
    pub complete: bool,
    /// Fire the section's celebration.
    pub celebrate: bool,
}

impl GoalSignal {
    const NONE: Self = Self {
        complete: false,
        celebrate: false,
    };
}

/// A slider that only moves up and completes once it passes a threshold.
#[derive(Debug, Clone)]
pub struct MeterGoal {
    value: u32,
    max: u32,
    threshold: u32,
    reached: Latch,
}

impl MeterGoal {
    /// A meter on `0..=max` starting at `initial`, completing above `threshold`.
    #[must_use]
    pub fn new(initial: u32, max: u32, threshold: u32) -> Self {
        Self {
            value: initial.min(max),
            max,
            threshold,
            reached: Latch::Open,
        }
    }

    /// The love meter: starts at 20 of 100 and completes above 85.
    #[must_use]
    pub fn love_meter() -> Self {
        Self::new(20, 100, 85)
    }

    /// Current reading.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Whether the reading is above the threshold.
    #[must_use]
    pub fn is_above_threshold(&self) -> bool {
        self.value > self.threshold
    }

    /// Proposes a new reading. Values below the current reading are refused.
    pub fn set(&mut self, value: u32) -> GoalSignal {
        let value = value.min(self.max);
        if value < self.value {
            return GoalSignal::NONE;
        }
        self.value = value;
        if self.is_above_threshold() && self.reached.trip() {
            return GoalSignal {
                complete: true,
                celebrate: true,
            };
        }
        GoalSignal::NONE
    }
}

/// A fixed number of collectibles that must all be gathered.
#[derive(Debug, Clone)]
pub struct CollectGoal {
    total: u32,
    collected: BTreeSet<u32>,
    done: Latch,
}

impl CollectGoal {
    /// A goal over collectibles `0..total`. A goal always has at least one
    /// collectible, so a zero total is raised to one.
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            collected: BTreeSet::new(),
            done: Latch::Open,
        }
    }

    /// Number gathered so far.
    #[must_use]
    pub fn collected(&self) -> u32 {
        u32::try_from(self.collected.len()).unwrap_or(u32::MAX)
    }

    /// Total number of collectibles.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Gathers one collectible. Repeats and out-of-range ids are ignored.
    pub fn collect(&mut self, token: u32) -> GoalSignal {
        if token >= self.total || !self.collected.insert(token) {
            return GoalSignal::NONE;
        }
        if self.collected() == self.total && self.done.trip() {
            return GoalSignal {
                complete: true,
                celebrate: false,
            };
        }
        GoalSignal::NONE
    }
}

/// Completes once the section has been revealed past a fraction.
#[derive(Debug, Clone)]
pub struct RevealGoal {
    threshold: f64,
    progress: f64,
    revealed: Latch,
}

impl RevealGoal {
    /// Completes when reveal progress exceeds `threshold`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            progress: 0.0,
            revealed: Latch::Open,
        }
    }

    /// Last observed reveal progress.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Reveal progress of a section from its top edge: `1 - top / viewport_height`,
    /// clamped to `[0, 1]`.
    #[must_use]
    pub fn progress_from_top(top: f64, viewport_height: f64) -> f64 {
        if viewport_height <= 0.0 {
            return 0.0;
        }
        sanitize_progress(1.0 - top / viewport_height)
    }

    /// Feeds the current reveal progress.
    pub fn observe(&mut self, progress: f64) -> GoalSignal {
        self.progress = sanitize_progress(progress);
        if self.progress > self.threshold && self.revealed.trip() {
            return GoalSignal {
                complete: true,
                celebrate: false,
            };
        }
        GoalSignal::NONE
    }
}

impl Default for RevealGoal {
    fn default() -> Self {
        Self::new(0.7)
    }
}

/// A question where any answer completes the section and one answer earns
/// a celebration.
#[derive(Debug, Clone)]
pub struct ChoiceGoal {
    celebrated_answer: String,
    selected: Option<String>,
    answered: Latch,
}

impl ChoiceGoal {
    /// Creates a goal that celebrates `celebrated_answer`.
    #[must_use]
    pub fn new(celebrated_answer: impl Into<String>) -> Self {
        Self {
            celebrated_answer: celebrated_answer.into(),
            selected: None,
            answered: Latch::Open,
        }
    }

    /// The current selection, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Records an answer. Completes on the first answer; celebrates every
    /// time the celebrated answer is chosen.
    pub fn choose(&mut self, answer: &str) -> GoalSignal {
        self.selected = Some(answer.to_owned());
        GoalSignal {
            complete: self.answered.trip(),
            celebrate: answer == self.celebrated_answer,
        }
    }

    /// Clears the selection so the question can be retried. Completion stays.
    pub fn retry(&mut self) {
        self.selected = None;
    }
}
