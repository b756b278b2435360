//! Query handlers for the Narrative Progression context.
//!
//! Read-only views the presentation layer renders from.

use serde::Serialize;

use crate::domain::aggregates::StoryNarrative;
use crate::domain::catalog::SectionId;
use crate::domain::progression::{AvatarPose, sanitize_progress};

/// One checkpoint marker on the timeline track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointView {
    /// The section this marker stands for.
    pub section_id: SectionId,
    /// Whether scroll progress has reached the section's threshold.
    pub reached: bool,
    /// Whether the section has been completed.
    pub completed: bool,
}

/// Read-only view of the timeline track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineView {
    /// Overall scroll progress in `[0, 1]`.
    pub progress: f64,
    /// Filled portion of the track, in percent.
    pub track_fill: f64,
    /// One marker per catalog section, in order.
    pub checkpoints: Vec<CheckpointView>,
    /// Avatar pose on the track; `None` once it has moved into the scene.
    pub avatar: Option<AvatarPose>,
    /// Whether the avatar is in the scene.
    pub relocated: bool,
    /// Whether the closing gallery is visible.
    pub gallery_revealed: bool,
}

/// Filled track percentage: `progress * 100`, capped at `cap`.
#[must_use]
pub fn track_fill(progress: f64, cap: f64) -> f64 {
    (sanitize_progress(progress) * 100.0).min(cap)
}

/// Builds the timeline view for the given progress.
#[must_use]
pub fn get_timeline(narrative: &StoryNarrative, progress: f64, fill_cap: f64) -> TimelineView {
    let progress = sanitize_progress(progress);
    let avatar = narrative.progression().avatar(progress);
    let checkpoints = narrative
        .catalog()
        .sections()
        .iter()
        .map(|s| CheckpointView {
            section_id: s.id.clone(),
            reached: progress >= s.progress_threshold,
            completed: narrative.is_complete(&s.id),
        })
        .collect();

    TimelineView {
        progress,
        track_fill: track_fill(progress, fill_cap),
        checkpoints,
        avatar: (!avatar.relocated).then_some(avatar.pose),
        relocated: avatar.relocated,
        gallery_revealed: narrative.is_gallery_revealed(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use storyscroll_test_support::FixedClock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::catalog::Catalog;
    use crate::domain::progression::WalkingBounds;

    fn narrative() -> StoryNarrative {
        StoryNarrative::new(Uuid::new_v4(), Catalog::standard(), WalkingBounds::default())
    }

    #[test]
    fn test_track_fill_is_capped() {
        assert!((track_fill(0.4, 95.0) - 40.0).abs() < 1e-9);
        assert!((track_fill(0.99, 95.0) - 95.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_checkpoints_reached_by_threshold() {
        // Arrange
        let narrative = narrative();

        // Act
        let view = get_timeline(&narrative, 0.38, 95.0);

        // Assert
        let reached: Vec<&str> = view
            .checkpoints
            .iter()
            .filter(|c| c.reached)
            .map(|c| c.section_id.as_str())
            .collect();
        assert_eq!(reached, vec!["hero", "journey", "quiz-cook", "love-meter"]);
        assert!(view.avatar.is_some());
        assert!(!view.relocated);
    }

    #[test]
    fn test_avatar_hidden_from_track_after_relocation() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 2, 14, 20, 0, 0).unwrap());
        let mut narrative = narrative();
        narrative.open_finale(&clock).unwrap();

        let view = get_timeline(&narrative, 0.85, 95.0);

        assert!(view.avatar.is_none());
        assert!(view.relocated);
        assert!(view.gallery_revealed);
        assert!(view.checkpoints.iter().any(|c| c.completed && c.section_id.as_str() == "rose-delivery"));
    }
}
