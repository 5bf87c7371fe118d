//! Short-lived UI feedback flags.

use std::time::Duration;

use tokio::time::Instant;

/// A flag that clears itself a fixed time after being raised.
///
/// Raising it again restarts the countdown. The host loop awaits
/// [`expired`](Self::expired) and calls [`clear`](Self::clear) when it
/// resolves, so there is only ever one pending deadline.
#[derive(Debug, Clone)]
pub struct EphemeralFlag {
    duration: Duration,
    deadline: Option<Instant>,
}

impl EphemeralFlag {
    /// Creates a lowered flag that stays up for `duration` once raised.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            deadline: None,
        }
    }

    /// Raises the flag and (re)starts its countdown.
    pub fn raise(&mut self) {
        self.deadline = Some(Instant::now() + self.duration);
    }

    /// Lowers the flag.
    pub fn clear(&mut self) {
        self.deadline = None;
    }

    /// Whether the flag is up and its countdown has not run out.
    pub fn is_raised(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() < d)
    }

    /// When the flag will clear, if raised.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves at the deadline; never resolves while lowered.
    pub async fn expired(&self) {
        wait_until(self.deadline).await;
    }
}

/// Sleeps until `deadline`, or forever when there is none.
pub async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn clears_after_duration() {
        let mut flag = EphemeralFlag::new(Duration::from_secs(2));
        assert!(!flag.is_raised());

        flag.raise();
        assert!(flag.is_raised());

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(flag.is_raised());

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!flag.is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn raising_again_restarts_countdown() {
        let mut flag = EphemeralFlag::new(Duration::from_secs(2));
        flag.raise();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        flag.raise();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(flag.is_raised());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_resolves_at_deadline() {
        let mut flag = EphemeralFlag::new(Duration::from_secs(2));
        flag.raise();
        let start = Instant::now();

        flag.expired().await;
        flag.clear();

        assert!(start.elapsed() >= Duration::from_secs(2));
        assert!(start.elapsed() < Duration::from_millis(2010));
        assert!(flag.deadline().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn lowered_flag_never_expires() {
        let flag = EphemeralFlag::new(Duration::from_secs(2));
        let timed_out = tokio::time::timeout(Duration::from_secs(60), flag.expired()).await;
        assert!(timed_out.is_err());
    }
}
