//! Command handlers for the Audio Session context.
//!
//! Each handler drives the backend and folds the asynchronous outcome back
//! into the session. None of them fail: rejections and storage faults are
//! absorbed by the session.

use storyscroll_core::audio::AudioBackend;
use storyscroll_core::clock::Clock;
use storyscroll_core::storage::KeyValueStore;
use tracing::debug;

use crate::domain::session::{AudioSession, PlaybackState};

/// What a handler did to playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Playback is now running.
    Started,
    /// The environment refused; retry is armed for the next interaction.
    Deferred,
    /// Playback is now paused.
    Paused,
    /// Nothing was attempted.
    Unchanged,
}

async fn attempt_play<S: KeyValueStore>(
    session: &mut AudioSession<S>,
    backend: &dyn AudioBackend,
    clock: &dyn Clock,
) -> PlaybackOutcome {
    match backend.play().await {
        Ok(()) => {
            session.playback_started(clock);
            PlaybackOutcome::Started
        }
        Err(e) => {
            debug!(error = %e, "play attempt refused");
            session.playback_rejected(clock);
            PlaybackOutcome::Deferred
        }
    }
}

/// Seeds the session from storage, seeks to the saved position, and tries
/// to play when the saved intent is "playing".
pub async fn handle_mount<S: KeyValueStore>(
    session: &mut AudioSession<S>,
    backend: &dyn AudioBackend,
    clock: &dyn Clock,
) -> PlaybackOutcome {
    let restored = session.restore();
    if restored.has_position() {
        backend.seek(restored.position_seconds);
    }
    if restored.is_playing {
        attempt_play(session, backend, clock).await
    } else {
        session.playback_paused(false, clock);
        PlaybackOutcome::Paused
    }
}

/// The reader pressed the music toggle.
pub async fn handle_toggle<S: KeyValueStore>(
    session: &mut AudioSession<S>,
    backend: &dyn AudioBackend,
    clock: &dyn Clock,
) -> PlaybackOutcome {
    if session.state() == PlaybackState::Playing {
        backend.pause();
        session.playback_paused(true, clock);
        return PlaybackOutcome::Paused;
    }
    backend.set_muted(false);
    session.resume_requested();
    attempt_play(session, backend, clock).await
}

/// Any pointer, touch or key interaction. Retries playback once if a
/// rejection armed the fallback and the intent is still "playing".
pub async fn handle_interaction<S: KeyValueStore>(
    session: &mut AudioSession<S>,
    backend: &dyn AudioBackend,
    clock: &dyn Clock,
) -> PlaybackOutcome {
    if !session.take_recovery() || !session.wants_playback() {
        return PlaybackOutcome::Unchanged;
    }
    attempt_play(session, backend, clock).await
}

/// The hero's start button: unmute and play unless already playing.
pub async fn handle_start<S: KeyValueStore>(
    session: &mut AudioSession<S>,
    backend: &dyn AudioBackend,
    clock: &dyn Clock,
) -> PlaybackOutcome {
    if session.state() == PlaybackState::Playing {
        return PlaybackOutcome::Unchanged;
    }
    backend.set_muted(false);
    session.resume_requested();
    attempt_play(session, backend, clock).await
}

/// The playhead advanced.
pub fn handle_time_update<S: KeyValueStore>(session: &mut AudioSession<S>, position_seconds: f64) {
    session.position_advanced(position_seconds);
}

#[cfg(test)]
mod tests {
    use storyscroll_core::event::DomainEvent;
    use storyscroll_test_support::{AudioCall, FixedClock, MemoryStore, ScriptedAudioBackend};
    use uuid::Uuid;

    use super::*;
    use crate::domain::persisted::StorageKeys;
    use crate::domain::session::Recovery;

    fn clock() -> FixedClock {
        FixedClock(chrono::Utc::now())
    }

    fn session_with(entries: &[(&str, &str)]) -> AudioSession<MemoryStore> {
        AudioSession::new(
            Uuid::new_v4(),
            MemoryStore::with_entries(entries),
            StorageKeys::default(),
        )
    }

    #[tokio::test]
    async fn test_mount_seeks_and_recovers_on_click() {
        // Arrange
        let clock = clock();
        let backend = ScriptedAudioBackend::scripted(&[false], true);
        let mut session = session_with(&[("audioTime", "42.0"), ("audioPlaying", "true")]);

        // Act
        let mounted = handle_mount(&mut session, &backend, &clock).await;
        let clicked = handle_interaction(&mut session, &backend, &clock).await;

        // Assert
        assert_eq!(mounted, PlaybackOutcome::Deferred);
        assert_eq!(clicked, PlaybackOutcome::Started);
        assert_eq!(session.state(), PlaybackState::Playing);
        assert_eq!(
            backend.calls(),
            vec![AudioCall::Seek(42.0), AudioCall::Play, AudioCall::Play]
        );
    }

    #[tokio::test]
    async fn test_rejected_mount_leaves_session_paused() {
        let clock = clock();
        let backend = ScriptedAudioBackend::rejecting();
        let mut session = session_with(&[("audioTime", "42.0")]);

        handle_mount(&mut session, &backend, &clock).await;

        assert_eq!(session.state(), PlaybackState::Paused);
        assert_eq!(session.recovery(), Recovery::Armed);
        assert_eq!(session.store().value("audioPlaying"), None);
    }

    #[tokio::test]
    async fn test_mount_with_paused_intent_does_not_play() {
        let clock = clock();
        let backend = ScriptedAudioBackend::allowing();
        let mut session = session_with(&[("audioPlaying", "false")]);

        let outcome = handle_mount(&mut session, &backend, &clock).await;
        let clicked = handle_interaction(&mut session, &backend, &clock).await;

        assert_eq!(outcome, PlaybackOutcome::Paused);
        assert_eq!(clicked, PlaybackOutcome::Unchanged);
        assert_eq!(backend.play_attempts(), 0);
    }

    #[tokio::test]
    async fn test_interaction_fallback_is_one_shot() {
        let clock = clock();
        let backend = ScriptedAudioBackend::scripted(&[false], true);
        let mut session = session_with(&[]);
        handle_mount(&mut session, &backend, &clock).await;

        handle_interaction(&mut session, &backend, &clock).await;
        let again = handle_interaction(&mut session, &backend, &clock).await;

        assert_eq!(again, PlaybackOutcome::Unchanged);
        assert_eq!(backend.play_attempts(), 2);
    }

    #[tokio::test]
    async fn test_second_rejection_rearms_fallback() {
        let clock = clock();
        let backend = ScriptedAudioBackend::scripted(&[false, false], true);
        let mut session = session_with(&[]);
        handle_mount(&mut session, &backend, &clock).await;

        let first = handle_interaction(&mut session, &backend, &clock).await;
        let second = handle_interaction(&mut session, &backend, &clock).await;

        assert_eq!(first, PlaybackOutcome::Deferred);
        assert_eq!(second, PlaybackOutcome::Started);
    }

    #[tokio::test]
    async fn test_user_pause_cancels_pending_fallback() {
        // Arrange
        let clock = clock();
        let backend = ScriptedAudioBackend::scripted(&[true], false);
        let mut session = session_with(&[]);
        handle_mount(&mut session, &backend, &clock).await;

        // Act
        let toggled = handle_toggle(&mut session, &backend, &clock).await;
        let clicked = handle_interaction(&mut session, &backend, &clock).await;

        // Assert
        assert_eq!(toggled, PlaybackOutcome::Paused);
        assert_eq!(clicked, PlaybackOutcome::Unchanged);
        assert_eq!(session.store().value("audioPlaying"), Some("false"));
    }

    #[tokio::test]
    async fn test_toggle_resume_unmutes_and_persists_intent() {
        let clock = clock();
        let backend = ScriptedAudioBackend::allowing();
        let mut session = session_with(&[("audioPlaying", "false")]);
        handle_mount(&mut session, &backend, &clock).await;

        let outcome = handle_toggle(&mut session, &backend, &clock).await;

        assert_eq!(outcome, PlaybackOutcome::Started);
        assert!(backend.calls().contains(&AudioCall::SetMuted(false)));
        assert_eq!(session.store().value("audioPlaying"), Some("true"));
    }

    #[tokio::test]
    async fn test_start_is_noop_while_playing() {
        let clock = clock();
        let backend = ScriptedAudioBackend::allowing();
        let mut session = session_with(&[]);
        handle_mount(&mut session, &backend, &clock).await;

        let outcome = handle_start(&mut session, &backend, &clock).await;

        assert_eq!(outcome, PlaybackOutcome::Unchanged);
        assert_eq!(backend.play_attempts(), 1);
    }

    #[tokio::test]
    async fn test_playback_events_are_recorded() {
        let clock = clock();
        let backend = ScriptedAudioBackend::scripted(&[false], true);
        let mut session = session_with(&[]);

        handle_mount(&mut session, &backend, &clock).await;
        handle_interaction(&mut session, &backend, &clock).await;
        handle_time_update(&mut session, 7.5);
        let events = session.take_uncommitted_events();

        let types: Vec<&str> = events.iter().map(DomainEvent::event_type).collect();
        assert_eq!(types, vec!["audio.playback_deferred", "audio.playback_started"]);
        assert_eq!(events[1].metadata.sequence_number, 2);
        assert_eq!(session.store().value("audioTime"), Some("7.5"));
    }
}
