//! Error taxonomy for the progression controller.
//!
//! None of these are fatal to the page. Callers at the controller boundary
//! log them and degrade: no music, no persistence, or no nudge this tick.

use thiserror::Error;

/// Top-level error type shared by every storyscroll context.
#[derive(Debug, Error)]
pub enum StoryError {
    /// A section identifier is not part of the catalog.
    #[error("unknown section: {0}")]
    UnknownSection(String),

    /// A section's anchor element is not registered with the viewport yet.
    #[error("section anchor not registered: {0}")]
    MissingAnchor(String),

    /// The persistence backend refused a read or write.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The host environment refused to start playback.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// The section catalog violates an ordering or identity constraint.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
}
