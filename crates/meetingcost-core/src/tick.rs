//! Tick scheduling for running meetings.
//!
//! A [`TickScheduler`] hands out a [`TickHandle`] per recurring schedule.
//! The scheduler itself never touches a session: fired ticks travel back to
//! the host's event loop as handles, and the host passes them to
//! [`MeetingSession::tick`](crate::session::MeetingSession::tick). The session
//! only accepts ticks carrying its current live handle, so a tick that was
//! already queued when the schedule got cancelled is dropped.

use std::time::Duration;

/// The fixed cadence of a running meeting clock.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Opaque identifier of one recurring tick schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    /// Creates a handle from a scheduler-assigned id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedule/cancel pair for a recurring tick.
pub trait TickScheduler {
    /// Starts a recurring tick at `interval` and returns its handle.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Stops the schedule identified by `handle`.
    ///
    /// Cancelling an unknown or already cancelled handle does nothing.
    fn cancel(&mut self, handle: TickHandle);
}

/// A scheduler driven entirely by its caller.
///
/// Nothing fires on its own: the caller reads the session's live handle and
/// feeds it to `tick` whenever a second has passed. Used by tests, by the
/// `estimate` replay and by hosts that already own a timer.
#[derive(Debug, Default)]
pub struct ManualTicker {
    next_id: u64,
    live: Vec<TickHandle>,
    scheduled: u64,
    cancelled: u64,
}

impl ManualTicker {
    /// Creates an idle ticker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that are currently scheduled and not cancelled.
    pub fn live(&self) -> &[TickHandle] {
        &self.live
    }

    /// Total number of schedules created.
    pub fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    /// Total number of effective cancellations.
    pub fn cancelled_count(&self) -> u64 {
        self.cancelled
    }
}

impl TickScheduler for ManualTicker {
    fn schedule(&mut self, _interval: Duration) -> TickHandle {
        self.next_id += 1;
        self.scheduled += 1;
        let handle = TickHandle::new(self.next_id);
        self.live.push(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        let before = self.live.len();
        self.live.retain(|h| *h != handle);
        if self.live.len() != before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticker_hands_out_distinct_handles() {
        let mut ticker = ManualTicker::new();
        let a = ticker.schedule(TICK_INTERVAL);
        let b = ticker.schedule(TICK_INTERVAL);

        assert_ne!(a, b);
        assert_eq!(ticker.live(), &[a, b]);
        assert_eq!(ticker.scheduled_count(), 2);
    }

    #[test]
    fn manual_ticker_cancel_is_idempotent() {
        let mut ticker = ManualTicker::new();
        let handle = ticker.schedule(TICK_INTERVAL);

        ticker.cancel(handle);
        ticker.cancel(handle);

        assert!(ticker.live().is_empty());
        assert_eq!(ticker.cancelled_count(), 1);
    }
}
