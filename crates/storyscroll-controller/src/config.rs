//! Controller configuration.
//!
//! Every field defaults to the shipped narrative, so an empty YAML document
//! (or no document at all) yields the standard eight-section story.

use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use storyscroll_audio::domain::persisted::StorageKeys;
use storyscroll_effects::domain::dispatcher::EffectDispatcher;
use storyscroll_narrative::domain::catalog::{Catalog, Section, SectionId, standard_sections};
use storyscroll_narrative::domain::progression::WalkingBounds;
use tracing::info;

use crate::error::ConfigError;

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "STORYSCROLL_CONFIG";

/// One section entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Stable section identifier, also the anchor id.
    pub id: String,
    /// Whether the section gates scrolling until complete.
    #[serde(default)]
    pub interactive: bool,
    /// Scroll-progress breakpoint where the section counts as reached.
    pub progress_threshold: f64,
    /// Avatar position paired with the breakpoint, in track percent.
    pub waypoint_position: f64,
}

impl From<&Section> for SectionConfig {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.as_str().to_owned(),
            interactive: section.interactive,
            progress_threshold: section.progress_threshold,
            waypoint_position: section.waypoint_position,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Sections in narrative order.
    pub sections: Vec<SectionConfig>,
    /// Section whose visibility moves the avatar into the scene.
    pub relocation_checkpoint: String,
    /// Section opened by the finale action.
    pub finale_section: String,
    /// Progress above which the avatar starts walking.
    pub walk_start: f64,
    /// Progress below which the avatar keeps walking.
    pub walk_end: f64,
    /// Upper bound on the timeline fill, in percent.
    pub track_fill_cap: f64,
    /// How long a celebration stays active, in milliseconds.
    pub hold_ms: i64,
    /// Persistent storage key names.
    pub storage_keys: StorageKeys,
}

impl Default for StoryConfig {
    fn default() -> Self {
        let walking = WalkingBounds::default();
        Self {
            sections: standard_sections().iter().map(SectionConfig::from).collect(),
            relocation_checkpoint: "rose-delivery".to_owned(),
            finale_section: "rose-delivery".to_owned(),
            walk_start: walking.start,
            walk_end: walking.end,
            track_fill_cap: 95.0,
            hold_ms: EffectDispatcher::DEFAULT_HOLD_MS,
            storage_keys: StorageKeys::default(),
        }
    }
}

impl StoryConfig {
    /// Loads the file named by `STORYSCROLL_CONFIG`, or the defaults when the
    /// variable is unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV);
        Self::load(path.as_deref().map(Path::new))
    }

    /// Loads `path` if given, otherwise the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw)?;
        info!(path = %path.display(), sections = config.sections.len(), "loaded story config");
        Ok(config)
    }

    /// Parses and validates a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` on malformed YAML, or a validation error.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks scalar settings and the catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` or `ConfigError::Catalog`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.walk_start) || !(0.0..=1.0).contains(&self.walk_end) {
            return Err(ConfigError::Invalid("walking bounds must lie in [0, 1]".into()));
        }
        if self.walk_start >= self.walk_end {
            return Err(ConfigError::Invalid(format!(
                "walk_start {} must be below walk_end {}",
                self.walk_start, self.walk_end
            )));
        }
        if !(0.0..=100.0).contains(&self.track_fill_cap) {
            return Err(ConfigError::Invalid(format!(
                "track_fill_cap {} must lie in [0, 100]",
                self.track_fill_cap
            )));
        }
        if self.hold_ms < 0 {
            return Err(ConfigError::Invalid(format!("hold_ms {} is negative", self.hold_ms)));
        }
        self.catalog()?;
        Ok(())
    }

    /// Builds the section catalog.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Catalog` when the sections are inconsistent.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let sections = self
            .sections
            .iter()
            .map(|s| Section::new(&s.id, s.interactive, s.progress_threshold, s.waypoint_position))
            .collect();
        Ok(Catalog::new(
            sections,
            SectionId::new(self.relocation_checkpoint.as_str()),
            SectionId::new(self.finale_section.as_str()),
        )?)
    }

    /// The avatar's walking bounds.
    #[must_use]
    pub fn walking_bounds(&self) -> WalkingBounds {
        WalkingBounds {
            start: self.walk_start,
            end: self.walk_end,
        }
    }

    /// The celebration on-period.
    #[must_use]
    pub fn hold(&self) -> TimeDelta {
        TimeDelta::milliseconds(self.hold_ms)
    }
}
