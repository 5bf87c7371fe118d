//! Tokio-backed tick scheduler.
//!
//! Each schedule is a spawned task driving a [`tokio::time::interval`] and
//! sending its handle down an unbounded channel on every fire. The host's
//! event loop owns the receiving end and forwards each handle to
//! `MeetingSession::tick`. Cancelling aborts the task; a handle that was
//! already queued is then rejected by the session.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use meetingcost_core::{TickHandle, TickScheduler};

/// Receiving end of a [`TokioTicker`].
pub type TickReceiver = mpsc::UnboundedReceiver<TickHandle>;

/// A [`TickScheduler`] running on the current tokio runtime.
#[derive(Debug)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<TickHandle>,
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioTicker {
    /// Creates a ticker and the receiver its fires arrive on.
    pub fn channel() -> (Self, TickReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        let ticker = Self {
            tx,
            next_id: 0,
            tasks: HashMap::new(),
        };
        (ticker, rx)
    }

    /// Number of schedules whose task is still alive.
    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }
}

impl TickScheduler for TokioTicker {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle::new(self.next_id);
        let tx = self.tx.clone();

        let task = tokio::spawn(async move {
            // First fire one full interval after scheduling, not immediately.
            let mut ticks = tokio::time::interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        debug!(
            handle = handle.id(),
            interval_ms = interval.as_millis() as u64,
            "tick task spawned"
        );
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!(handle = handle.id(), "tick task aborted");
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use meetingcost_core::{MeetingSession, Phase, TICK_INTERVAL};

    /// Applies every tick queued so far.
    fn drain(session: &mut MeetingSession<TokioTicker>, rx: &mut TickReceiver) {
        while let Ok(handle) = rx.try_recv() {
            session.tick(handle);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_interval() {
        let (mut ticker, mut rx) = TokioTicker::channel();
        let handle = ticker.schedule(TICK_INTERVAL);

        tokio::time::sleep(Duration::from_millis(3500)).await;

        let mut fired = Vec::new();
        while let Ok(h) = rx.try_recv() {
            fired.push(h);
        }
        assert_eq!(fired, vec![handle; 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_fires() {
        let (mut ticker, mut rx) = TokioTicker::channel();
        let handle = ticker.schedule(TICK_INTERVAL);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        ticker.cancel(handle);
        assert_eq!(ticker.live_count(), 0);
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drives_session_clock() {
        let (ticker, mut rx) = TokioTicker::channel();
        let mut session = MeetingSession::new(ticker);

        session.start_meeting();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.elapsed_seconds(), 10);

        session.pause_meeting();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drain(&mut session, &mut rx);
        assert_eq!(session.elapsed_seconds(), 10);
        assert_eq!(session.ticker().live_count(), 0);

        session.resume_meeting();
        tokio::time::sleep(Duration::from_millis(5_500)).await;
        drain(&mut session, &mut rx);
        session.end_meeting();

        assert_eq!(session.elapsed_seconds(), 15);
        assert_eq!(session.phase(), Phase::Summary);
    }

    #[tokio::test(start_paused = true)]
    async fn queued_tick_after_pause_is_ignored() {
        let (ticker, mut rx) = TokioTicker::channel();
        let mut session = MeetingSession::new(ticker);

        session.start_meeting();
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        // Two fires are queued but not yet applied when the pause lands.
        session.pause_meeting();
        session.resume_meeting();
        drain(&mut session, &mut rx);

        assert_eq!(session.elapsed_seconds(), 0);
    }
}
