//! The fixed, ordered section catalog.
//!
//! Catalog order is narrative order and never changes during a session.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use storyscroll_core::error::StoryError;

/// Stable identifier of a narrative section.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Wraps a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One narrative beat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier.
    pub id: SectionId,
    /// Whether the reader must complete this section before scrolling past it.
    #[serde(default)]
    pub interactive: bool,
    /// Scroll progress at which the narrative considers this section reached.
    pub progress_threshold: f64,
    /// Avatar track position (percent of track height) paired with the threshold.
    pub waypoint_position: f64,
}

impl Section {
    /// Creates a section.
    #[must_use]
    pub fn new(id: &str, interactive: bool, progress_threshold: f64, waypoint_position: f64) -> Self {
        Self {
            id: SectionId::new(id),
            interactive,
            progress_threshold,
            waypoint_position,
        }
    }
}

/// Validated, ordered list of sections plus the two narrative landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    sections: Vec<Section>,
    relocation_checkpoint: SectionId,
    finale: SectionId,
}

impl Catalog {
    /// Builds a catalog.
    ///
    /// Thresholds must lie in `[0, 1]` and never decrease in catalog order;
    /// equal neighbours are allowed.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidCatalog` if the list is empty, an id is
    /// repeated, a threshold is out of range or out of order, or a landmark
    /// does not name a catalog section.
    pub fn new(
        sections: Vec<Section>,
        relocation_checkpoint: SectionId,
        finale: SectionId,
    ) -> Result<Self, StoryError> {
        if sections.is_empty() {
            return Err(StoryError::InvalidCatalog("catalog has no sections".into()));
        }

        let mut seen = HashSet::new();
        let mut previous = f64::NEG_INFINITY;
        for section in &sections {
            if !seen.insert(section.id.clone()) {
                return Err(StoryError::InvalidCatalog(format!(
                    "duplicate section id {}",
                    section.id
                )));
            }
            let threshold = section.progress_threshold;
            if !(0.0..=1.0).contains(&threshold) {
                return Err(StoryError::InvalidCatalog(format!(
                    "threshold {threshold} of {} is outside [0, 1]",
                    section.id
                )));
            }
            if threshold < previous {
                return Err(StoryError::InvalidCatalog(format!(
                    "threshold of {} decreases from {previous} to {threshold}",
                    section.id
                )));
            }
            if !section.waypoint_position.is_finite() {
                return Err(StoryError::InvalidCatalog(format!(
                    "waypoint of {} is not finite",
                    section.id
                )));
            }
            previous = threshold;
        }

        for landmark in [&relocation_checkpoint, &finale] {
            if !seen.contains(landmark) {
                return Err(StoryError::InvalidCatalog(format!(
                    "landmark {landmark} is not a catalog section"
                )));
            }
        }

        Ok(Self {
            sections,
            relocation_checkpoint,
            finale,
        })
    }

    /// The eight-beat narrative the controller ships with.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            sections: standard_sections(),
            relocation_checkpoint: SectionId::new("rose-delivery"),
            finale: SectionId::new("rose-delivery"),
        }
    }

    /// Sections in narrative order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Catalog index of a section.
    #[must_use]
    pub fn position_of(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|s| &s.id == id)
    }

    /// The section following `id`, if any.
    #[must_use]
    pub fn next_after(&self, id: &SectionId) -> Option<&Section> {
        self.position_of(id).and_then(|i| self.sections.get(i + 1))
    }

    /// The opening section.
    #[must_use]
    pub fn first(&self) -> &Section {
        // Non-empty by construction.
        &self.sections[0]
    }

    /// Section whose arrival relocates the avatar into the scene.
    #[must_use]
    pub fn relocation_checkpoint(&self) -> &SectionId {
        &self.relocation_checkpoint
    }

    /// Section whose action triggers the finale.
    #[must_use]
    pub fn finale(&self) -> &SectionId {
        &self.finale
    }
}

/// Sections of the shipped narrative, in order.
#[must_use]
pub fn standard_sections() -> Vec<Section> {
    vec![
        Section::new("hero", false, 0.0, 2.0),
        Section::new("journey", false, 0.12, 14.0),
        Section::new("quiz-cook", true, 0.25, 26.0),
        Section::new("love-meter", true, 0.38, 38.0),
        Section::new("quiz-food", true, 0.50, 50.0),
        Section::new("tokens", false, 0.62, 62.0),
        Section::new("rose-delivery", false, 0.80, 76.0),
        Section::new("letter-gallery", false, 0.95, 90.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_passes_validation() {
        let standard = Catalog::standard();

        let rebuilt = Catalog::new(
            standard.sections().to_vec(),
            standard.relocation_checkpoint().clone(),
            standard.finale().clone(),
        );

        assert_eq!(rebuilt.unwrap(), standard);
    }

    #[test]
    fn test_standard_catalog_gates_only_quizzes_and_meter() {
        let catalog = Catalog::standard();

        let interactive: Vec<&str> = catalog
            .sections()
            .iter()
            .filter(|s| s.interactive)
            .map(|s| s.id.as_str())
            .collect();

        assert_eq!(interactive, vec!["quiz-cook", "love-meter", "quiz-food"]);
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let sections = vec![
            Section::new("a", false, 0.0, 0.0),
            Section::new("a", true, 0.5, 50.0),
        ];

        let result = Catalog::new(sections, SectionId::new("a"), SectionId::new("a"));

        match result {
            Err(StoryError::InvalidCatalog(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("expected InvalidCatalog, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_decreasing_thresholds() {
        let sections = vec![
            Section::new("a", false, 0.4, 0.0),
            Section::new("b", false, 0.2, 50.0),
        ];

        let result = Catalog::new(sections, SectionId::new("a"), SectionId::new("b"));

        assert!(matches!(result, Err(StoryError::InvalidCatalog(_))));
    }

    #[test]
    fn test_new_accepts_equal_thresholds() {
        let sections = vec![
            Section::new("a", false, 0.0, 0.0),
            Section::new("b", false, 0.5, 40.0),
            Section::new("c", false, 0.5, 60.0),
        ];

        assert!(Catalog::new(sections, SectionId::new("b"), SectionId::new("c")).is_ok());
    }

    #[test]
    fn test_new_rejects_unknown_landmark() {
        let sections = vec![Section::new("a", false, 0.0, 0.0)];

        let result = Catalog::new(sections, SectionId::new("missing"), SectionId::new("a"));

        assert!(matches!(result, Err(StoryError::InvalidCatalog(_))));
    }

    #[test]
    fn test_next_after_walks_catalog_order() {
        let catalog = Catalog::standard();

        let next = catalog.next_after(&SectionId::new("hero")).unwrap();

        assert_eq!(next.id.as_str(), "journey");
        assert!(catalog.next_after(&SectionId::new("letter-gallery")).is_none());
    }
}
