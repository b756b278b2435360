//! Audio playback abstraction.
//!
//! The host's media element. `play` is asynchronous and may be rejected by
//! the environment's autoplay policy after the call has returned.

use async_trait::async_trait;

use crate::error::StoryError;

/// Host playback device for the ambient soundtrack.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Starts or resumes playback.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::PlaybackRejected` when the host refuses to play.
    async fn play(&self) -> Result<(), StoryError>;

    /// Pauses playback. Never fails.
    fn pause(&self);

    /// Moves the playhead to `position_seconds`.
    fn seek(&self, position_seconds: f64);

    /// Mutes or unmutes output.
    fn set_muted(&self, muted: bool);
}
