//! Test audio backend: scripted `AudioBackend` implementation for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use storyscroll_core::audio::AudioBackend;
use storyscroll_core::error::StoryError;

/// A call made against the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCall {
    /// `play` was attempted.
    Play,
    /// `pause` was called.
    Pause,
    /// `seek` was called with this position.
    Seek(f64),
    /// `set_muted` was called with this flag.
    SetMuted(bool),
}

/// A backend whose `play` outcomes follow a script. Once the script runs
/// out, every further attempt uses the fallback outcome.
#[derive(Debug)]
pub struct ScriptedAudioBackend {
    script: Mutex<VecDeque<bool>>,
    fallback_allows: bool,
    calls: Mutex<Vec<AudioCall>>,
}

impl ScriptedAudioBackend {
    /// A backend that always accepts playback.
    #[must_use]
    pub fn allowing() -> Self {
        Self::scripted(&[], true)
    }

    /// A backend that always rejects playback, like a strict autoplay policy.
    #[must_use]
    pub fn rejecting() -> Self {
        Self::scripted(&[], false)
    }

    /// A backend that answers the first attempts from `script`
    /// (`true` = accept), then falls back to `fallback_allows`.
    #[must_use]
    pub fn scripted(script: &[bool], fallback_allows: bool) -> Self {
        Self {
            script: Mutex::new(script.iter().copied().collect()),
            fallback_allows,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of all calls in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<AudioCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `play` attempts so far.
    #[must_use]
    pub fn play_attempts(&self) -> usize {
        self.calls().iter().filter(|c| **c == AudioCall::Play).count()
    }

    fn push(&self, call: AudioCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AudioBackend for ScriptedAudioBackend {
    async fn play(&self) -> Result<(), StoryError> {
        self.push(AudioCall::Play);
        let allowed = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback_allows);
        if allowed {
            Ok(())
        } else {
            Err(StoryError::PlaybackRejected("autoplay blocked".into()))
        }
    }

    fn pause(&self) {
        self.push(AudioCall::Pause);
    }

    fn seek(&self, position_seconds: f64) {
        self.push(AudioCall::Seek(position_seconds));
    }

    fn set_muted(&self, muted: bool) {
        self.push(AudioCall::SetMuted(muted));
    }
}
