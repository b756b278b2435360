//! Host event listener registration.
//!
//! The controller attaches to the host's scroll and interaction events at
//! mount and must detach every one of them at teardown.

use serde::{Deserialize, Serialize};

/// Host events the controller listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    /// Document scroll.
    Scroll,
    /// Pointer click anywhere in the document.
    Click,
    /// Touch start anywhere in the document.
    TouchStart,
    /// Key press anywhere in the document.
    KeyDown,
}

impl ListenerKind {
    /// The interaction events that can unlock deferred playback.
    pub const INTERACTIONS: [Self; 3] = [Self::Click, Self::TouchStart, Self::KeyDown];
}

/// Registration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerOptions {
    /// A passive listener never delays the host's own scrolling.
    pub passive: bool,
}

impl ListenerOptions {
    /// Options for a passive listener.
    pub const PASSIVE: Self = Self { passive: true };
}

/// Opaque handle for a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListenerHandle(pub u64);

/// The host's event target.
pub trait EventHost {
    /// Attaches a listener and returns its handle.
    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) -> ListenerHandle;

    /// Detaches a listener. Unknown handles are ignored.
    fn remove_listener(&mut self, handle: ListenerHandle);
}
