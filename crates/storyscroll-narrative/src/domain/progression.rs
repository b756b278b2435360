//! Progression Mapper.
//!
//! Maps continuous scroll progress onto the avatar's journey: a waypoint
//! index, an interpolated track position, and whether it is walking. The
//! relocation latch records the one-way move from the track into the scene.

use serde::{Deserialize, Serialize};
use storyscroll_core::geometry::Rect;
use storyscroll_core::latch::Latch;
use tracing::info;

use super::catalog::Catalog;

/// A scroll-progress breakpoint paired with a track position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Breakpoint in `[0, 1]`.
    pub progress: f64,
    /// Track position at the breakpoint.
    pub position: f64,
}

/// Exclusive progress bounds inside which the avatar walks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkingBounds {
    /// Lower exclusive bound; at or below it the journey has not begun.
    pub start: f64,
    /// Upper exclusive bound; at or above it the avatar has arrived.
    pub end: f64,
}

impl Default for WalkingBounds {
    fn default() -> Self {
        Self {
            start: 0.05,
            end: 0.78,
        }
    }
}

impl WalkingBounds {
    /// Whether `progress` lies strictly between the bounds.
    #[must_use]
    pub fn contains(&self, progress: f64) -> bool {
        self.start < progress && progress < self.end
    }
}

/// Avatar pose derived from progress alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvatarPose {
    /// Index of the waypoint whose interval contains the progress.
    pub waypoint_index: usize,
    /// Interpolated track position.
    pub position: f64,
    /// Whether the avatar is mid-journey.
    pub walking: bool,
}

/// Pure `progress -> pose` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionMapper {
    waypoints: Vec<Waypoint>,
    walking: WalkingBounds,
}

impl ProgressionMapper {
    /// Creates a mapper from ascending waypoints.
    ///
    /// An empty list maps everything to position `0`.
    #[must_use]
    pub fn new(waypoints: Vec<Waypoint>, walking: WalkingBounds) -> Self {
        Self { waypoints, walking }
    }

    /// Uses each section's threshold and waypoint position, in catalog order.
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, walking: WalkingBounds) -> Self {
        let waypoints = catalog
            .sections()
            .iter()
            .map(|s| Waypoint {
                progress: s.progress_threshold,
                position: s.waypoint_position,
            })
            .collect();
        Self::new(waypoints, walking)
    }

    /// Waypoints in ascending order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Maps progress to a pose. Progress is clamped to `[0, 1]`; non-finite
    /// values count as `0`.
    #[must_use]
    pub fn map(&self, progress: f64) -> AvatarPose {
        let progress = sanitize_progress(progress);
        let walking = self.walking.contains(progress);

        let Some(first) = self.waypoints.first() else {
            return AvatarPose {
                waypoint_index: 0,
                position: 0.0,
                walking,
            };
        };
        if progress <= first.progress {
            return AvatarPose {
                waypoint_index: 0,
                position: first.position,
                walking,
            };
        }

        // Last breakpoint at or below the progress; equal breakpoints resolve
        // to the later one.
        let index = self
            .waypoints
            .iter()
            .rposition(|w| w.progress <= progress)
            .unwrap_or(0);
        let lower = self.waypoints[index];
        let position = match self.waypoints.get(index + 1) {
            Some(upper) => {
                let span = upper.progress - lower.progress;
                let fraction = (progress - lower.progress) / span;
                lower.position + (upper.position - lower.position) * fraction
            }
            None => lower.position,
        };

        AvatarPose {
            waypoint_index: index,
            position,
            walking,
        }
    }
}

/// Clamps progress into `[0, 1]`, mapping non-finite values to `0`.
#[must_use]
pub fn sanitize_progress(progress: f64) -> f64 {
    if progress.is_finite() {
        progress.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Full avatar state: pose plus the relocation latch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AvatarState {
    /// Pose on the timeline track.
    pub pose: AvatarPose,
    /// Whether the avatar has moved into the narrative scene.
    pub relocated: bool,
}

/// Mapper plus the one-way relocation latch.
#[derive(Debug, Clone)]
pub struct Progression {
    mapper: ProgressionMapper,
    relocation: Latch,
}

impl Progression {
    /// Creates a progression with the avatar on the track.
    #[must_use]
    pub fn new(mapper: ProgressionMapper) -> Self {
        Self {
            mapper,
            relocation: Latch::Open,
        }
    }

    /// The underlying mapper.
    #[must_use]
    pub fn mapper(&self) -> &ProgressionMapper {
        &self.mapper
    }

    /// Avatar state for the given progress.
    #[must_use]
    pub fn avatar(&self, progress: f64) -> AvatarState {
        AvatarState {
            pose: self.mapper.map(progress),
            relocated: self.relocation.is_tripped(),
        }
    }

    /// Feeds the checkpoint's bounding box. Relocates once the checkpoint
    /// crosses the viewport midline; never re-evaluated afterwards. Returns
    /// `true` only on the tick that relocated.
    pub fn observe_checkpoint(&mut self, checkpoint: Rect, viewport_height: f64) -> bool {
        if self.relocation.is_tripped() || !checkpoint.crosses_midline(viewport_height) {
            return false;
        }
        self.relocate()
    }

    /// Relocates unconditionally. Returns `true` if this call moved the avatar.
    pub fn relocate(&mut self) -> bool {
        let moved = self.relocation.trip();
        if moved {
            info!("avatar relocated into the scene");
        }
        moved
    }

    /// Whether the avatar has left the track.
    #[must_use]
    pub fn is_relocated(&self) -> bool {
        self.relocation.is_tripped()
    }

    /// Returns the avatar to the track. Replay only.
    pub fn reset(&mut self) {
        self.relocation.reset();
    }
}
