//! Time source for celebration holds, deferred scrolls and event stamps.
//!
//! Nothing in the controller reads wall time directly; tests drive a manual
//! clock to step past a hold or a scroll deadline.

use chrono::{DateTime, TimeDelta, Utc};

/// Source of "now" for every timed decision in a session.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Whether `deadline` has been reached.
    fn reached(&self, deadline: DateTime<Utc>) -> bool {
        self.now() >= deadline
    }

    /// Whether at least `interval` has passed since `since`.
    fn elapsed(&self, since: DateTime<Utc>, interval: TimeDelta) -> bool {
        self.reached(since + interval)
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
