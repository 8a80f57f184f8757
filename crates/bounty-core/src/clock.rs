//! # Clock Capability
//!
//! The ledger compares deadlines against "current time" at call time. That
//! time comes from a [`Clock`] injected into the ledger rather than from the
//! system directly, so tests and scenario replays can move time explicitly.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::temporal::Timestamp;

/// A source of current UTC time.
pub trait Clock: Send + Sync {
    /// The current time.
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Interior mutability lets a test keep an `Arc<ManualClock>` while the
/// ledger holds another handle to the same clock.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Start the clock at `start`.
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jump to an absolute time. Moving backwards is allowed.
    pub fn set(&self, to: Timestamp) {
        *self.now.lock() = to;
    }

    /// Move forward by `secs` seconds. Returns the new time, or `None`
    /// (leaving the clock unchanged) if the result is out of range.
    pub fn advance_secs(&self, secs: i64) -> Option<Timestamp> {
        let mut now = self.now.lock();
        let next = now.checked_add_secs(secs)?;
        *now = next;
        Some(next)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Timestamp {
        Timestamp::parse("2026-01-15T12:00:00Z").unwrap()
    }

    #[test]
    fn manual_clock_holds_still() {
        let clock = ManualClock::new(start());
        assert_eq!(clock.now(), start());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(start());
        let next = clock.advance_secs(60).unwrap();
        assert_eq!(next.to_iso8601(), "2026-01-15T12:01:00Z");
        assert_eq!(clock.now(), next);
    }

    #[test]
    fn manual_clock_overflow_leaves_time_unchanged() {
        let clock = ManualClock::new(start());
        assert!(clock.advance_secs(i64::MAX).is_none());
        assert_eq!(clock.now(), start());
    }

    #[test]
    fn shared_clock_sees_updates() {
        let clock = Arc::new(ManualClock::new(start()));
        let handle: Arc<dyn Clock> = clock.clone();
        clock.set(Timestamp::parse("2030-01-01T00:00:00Z").unwrap());
        assert_eq!(handle.now().to_iso8601(), "2030-01-01T00:00:00Z");
    }

    #[test]
    fn system_clock_is_truncated() {
        use chrono::Timelike;
        assert_eq!(SystemClock.now().as_datetime().nanosecond(), 0);
    }
}
