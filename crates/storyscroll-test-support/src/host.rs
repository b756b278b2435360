//! Test host: an `EventHost` that records registrations.

use std::collections::BTreeMap;

use storyscroll_core::host::{EventHost, ListenerHandle, ListenerKind, ListenerOptions};

/// Keeps the set of currently attached listeners.
#[derive(Debug, Default)]
pub struct RecordingHost {
    next: u64,
    active: BTreeMap<ListenerHandle, (ListenerKind, ListenerOptions)>,
    removed: usize,
}

impl RecordingHost {
    /// A host with nothing attached.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently attached listeners.
    #[must_use]
    pub fn active(&self) -> Vec<(ListenerKind, ListenerOptions)> {
        self.active.values().copied().collect()
    }

    /// Whether a listener of `kind` is attached.
    #[must_use]
    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.active.values().any(|(k, _)| *k == kind)
    }

    /// Number of successful removals.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl EventHost for RecordingHost {
    fn add_listener(&mut self, kind: ListenerKind, options: ListenerOptions) -> ListenerHandle {
        let handle = ListenerHandle(self.next);
        self.next += 1;
        self.active.insert(handle, (kind, options));
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        if self.active.remove(&handle).is_some() {
            self.removed += 1;
        }
    }
}
