//! Shared test fakes and utilities for the storyscroll progression controller.

mod audio;
mod clock;
mod host;
mod rng;
mod storage;
mod viewport;

pub use audio::{AudioCall, ScriptedAudioBackend};
pub use clock::{FixedClock, ManualClock};
pub use host::RecordingHost;
pub use rng::{MockRng, SequenceRng};
pub use storage::{FailingStore, MemoryStore};
pub use viewport::FakeViewport;

/// Installs a test-writer tracing subscriber so `RUST_LOG` works under
/// `cargo test`. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
