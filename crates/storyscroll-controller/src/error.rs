//! Storyscroll: configuration error types.

use std::path::PathBuf;

use storyscroll_core::error::StoryError;
use thiserror::Error;

/// Errors raised while loading a [`crate::config::StoryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Io {
        /// The file that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The YAML document is malformed or has fields of the wrong type.
    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The section list does not form a valid catalog.
    #[error("config catalog error: {0}")]
    Catalog(#[from] StoryError),

    /// A scalar setting is out of range.
    #[error("configuration error: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_keeps_story_message() {
        let err = ConfigError::from(StoryError::InvalidCatalog("catalog has no sections".into()));

        assert_eq!(
            err.to_string(),
            "config catalog error: invalid catalog: catalog has no sections"
        );
    }

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::Io {
            path: PathBuf::from("/nowhere/story.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };

        assert!(err.to_string().contains("/nowhere/story.yaml"));
    }
}
