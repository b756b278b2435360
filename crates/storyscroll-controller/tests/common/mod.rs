//! Shared test helpers for controller integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use storyscroll_controller::{StoryConfig, StoryController};
use storyscroll_core::event::DomainEvent;
use storyscroll_core::geometry::Rect;
use storyscroll_test_support::{FakeViewport, ManualClock, MemoryStore, MockRng, RecordingHost, ScriptedAudioBackend};

/// Viewport height used across scenarios.
pub const VIEWPORT_HEIGHT: f64 = 1000.0;
/// Document height used across scenarios; the scroll range is 10 000.
pub const DOCUMENT_HEIGHT: f64 = 11000.0;

pub type TestController = StoryController<MemoryStore, RecordingHost>;

/// A controller plus handles on the fakes it owns.
pub struct Harness {
    pub controller: TestController,
    pub clock: Arc<ManualClock>,
    pub backend: Arc<ScriptedAudioBackend>,
}

/// Default story, empty storage, a backend that always plays.
pub fn harness() -> Harness {
    harness_with(ScriptedAudioBackend::allowing(), MemoryStore::new())
}

/// Default story with the given backend and storage.
pub fn harness_with(backend: ScriptedAudioBackend, store: MemoryStore) -> Harness {
    storyscroll_test_support::init_test_tracing();
    let clock = Arc::new(ManualClock::at_epoch());
    let backend = Arc::new(backend);
    let controller = StoryController::new(
        &StoryConfig::default(),
        store,
        RecordingHost::new(),
        backend.clone(),
        clock.clone(),
    )
    .unwrap()
    .with_rng(Box::new(MockRng));

    Harness {
        controller,
        clock,
        backend,
    }
}

/// A viewport scrolled to `scroll_top` with no anchors.
pub fn viewport_at(scroll_top: f64) -> FakeViewport {
    FakeViewport::new(VIEWPORT_HEIGHT, DOCUMENT_HEIGHT).scrolled_to(scroll_top)
}

/// An anchor entirely above the viewport.
pub fn scrolled_past() -> Rect {
    Rect::new(-1500.0, -500.0)
}

/// An anchor straddling the viewport top.
pub fn on_screen() -> Rect {
    Rect::new(-200.0, 800.0)
}

/// Event type names, in order.
pub fn event_types(events: &[impl DomainEvent]) -> Vec<&'static str> {
    events.iter().map(DomainEvent::event_type).collect()
}
