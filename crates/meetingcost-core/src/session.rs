//! The meeting session state machine.
//!
//! [`MeetingSession`] holds the meeting settings and the elapsed clock, moves
//! between [`Phase`]s, and derives cost figures on every read. Every
//! operation is total: out-of-range input is clamped, over-long names are
//! truncated, and transitions attempted from the wrong phase do nothing.
//!
//! ```rust
//! use meetingcost_core::{ManualTicker, MeetingSession, Phase};
//!
//! let mut session = MeetingSession::new(ManualTicker::new());
//! session.set_attendees(4);
//! session.set_hourly_rate(150.0);
//! session.start_meeting();
//!
//! for _ in 0..90 {
//!     if let Some(handle) = session.active_tick() {
//!         session.tick(handle);
//!     }
//! }
//! session.end_meeting();
//!
//! assert_eq!(session.phase(), Phase::Summary);
//! assert_eq!(session.formatted_time(), "00:01:30");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::format::{CurrencyFormatter, SummaryFormatter};
use crate::tick::{TICK_INTERVAL, TickHandle, TickScheduler};
use crate::time::format_elapsed;

/// Smallest accepted attendee count.
pub const MIN_ATTENDEES: u32 = 1;
/// Largest accepted attendee count.
pub const MAX_ATTENDEES: u32 = 50;
/// Smallest accepted hourly rate.
pub const MIN_HOURLY_RATE: f64 = 1.0;
/// Largest accepted hourly rate.
pub const MAX_HOURLY_RATE: f64 = 1000.0;
/// Longest accepted meeting name, in characters.
pub const MAX_NAME_CHARS: usize = 50;

/// Attendee count of a fresh session.
pub const DEFAULT_ATTENDEES: u32 = 4;
/// Hourly rate of a fresh session.
pub const DEFAULT_HOURLY_RATE: f64 = 150.0;

/// Lifecycle phase of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Settings are editable, the clock is stopped.
    #[default]
    Setup,
    /// The clock is ticking.
    Running,
    /// The clock is frozen, the meeting can resume.
    Paused,
    /// The meeting is over, figures are final.
    Summary,
}

impl Phase {
    /// Returns the lowercase name of this phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Summary => "summary",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a session, derived values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Meeting name, possibly empty.
    pub meeting_name: String,
    /// Attendee count.
    pub attendees: u32,
    /// Hourly rate per attendee.
    pub hourly_rate: f64,
    /// Seconds the clock has run.
    pub elapsed_seconds: u64,
    /// Elapsed time as `HH:MM:SS`.
    pub formatted_time: String,
    /// Cost accrued so far.
    pub running_cost: f64,
    /// Cost of one minute at the current settings.
    pub cost_per_minute: f64,
    /// Accrued cost divided by attendees.
    pub cost_per_person: f64,
    /// Whether settings are locked (any phase but setup).
    pub inputs_locked: bool,
}

/// Identifies a change subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&SessionSnapshot)>;

/// Cost of one second for the given settings.
pub fn cost_per_second(attendees: u32, hourly_rate: f64) -> f64 {
    (f64::from(attendees) * hourly_rate) / 3600.0
}

/// Cost of one minute for the given settings.
pub fn cost_per_minute(attendees: u32, hourly_rate: f64) -> f64 {
    (f64::from(attendees) * hourly_rate) / 60.0
}

/// Clamps any integer into the attendee range.
pub fn clamp_attendees(value: i64) -> u32 {
    value.clamp(i64::from(MIN_ATTENDEES), i64::from(MAX_ATTENDEES)) as u32
}

/// Clamps any real into the hourly rate range. NaN maps to the minimum.
pub fn clamp_hourly_rate(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_HOURLY_RATE;
    }
    value.clamp(MIN_HOURLY_RATE, MAX_HOURLY_RATE)
}

/// Keeps the first [`MAX_NAME_CHARS`] characters of a name.
///
/// Characters here are Unicode scalar values, not grapheme clusters: a base
/// letter followed by a combining mark counts as two, and the cut can fall
/// between them.
pub fn truncate_name(name: &str) -> String {
    match name.char_indices().nth(MAX_NAME_CHARS) {
        Some((idx, _)) => name[..idx].to_string(),
        None => name.to_string(),
    }
}

/// A single meeting being timed.
///
/// The session owns its tick scheduler and holds at most one live handle.
/// Observers registered with [`subscribe`](Self::subscribe) receive a fresh
/// snapshot after every operation that changed state.
pub struct MeetingSession<T: TickScheduler> {
    phase: Phase,
    attendees: u32,
    hourly_rate: f64,
    meeting_name: String,
    elapsed_seconds: u64,
    ticker: T,
    live_tick: Option<TickHandle>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<T: TickScheduler> MeetingSession<T> {
    /// Creates a session in setup with the default settings.
    pub fn new(ticker: T) -> Self {
        Self::with_settings(ticker, i64::from(DEFAULT_ATTENDEES), DEFAULT_HOURLY_RATE)
    }

    /// Creates a session in setup with the given settings, clamped.
    pub fn with_settings(ticker: T, attendees: i64, hourly_rate: f64) -> Self {
        Self {
            phase: Phase::Setup,
            attendees: clamp_attendees(attendees),
            hourly_rate: clamp_hourly_rate(hourly_rate),
            meeting_name: String::new(),
            elapsed_seconds: 0,
            ticker,
            live_tick: None,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    // -- observations -------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attendees(&self) -> u32 {
        self.attendees
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    pub fn meeting_name(&self) -> &str {
        &self.meeting_name
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Settings can only change during setup.
    pub fn inputs_locked(&self) -> bool {
        self.phase != Phase::Setup
    }

    pub fn cost_per_second(&self) -> f64 {
        cost_per_second(self.attendees, self.hourly_rate)
    }

    pub fn running_cost(&self) -> f64 {
        self.cost_per_second() * self.elapsed_seconds as f64
    }

    pub fn cost_per_minute(&self) -> f64 {
        cost_per_minute(self.attendees, self.hourly_rate)
    }

    pub fn cost_per_person(&self) -> f64 {
        if self.attendees == 0 {
            return 0.0;
        }
        self.running_cost() / f64::from(self.attendees)
    }

    pub fn formatted_time(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    /// The handle of the live tick schedule, if the clock is running.
    pub fn active_tick(&self) -> Option<TickHandle> {
        self.live_tick
    }

    /// The session's tick scheduler.
    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Captures every current and derived value.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            meeting_name: self.meeting_name.clone(),
            attendees: self.attendees,
            hourly_rate: self.hourly_rate,
            elapsed_seconds: self.elapsed_seconds,
            formatted_time: self.formatted_time(),
            running_cost: self.running_cost(),
            cost_per_minute: self.cost_per_minute(),
            cost_per_person: self.cost_per_person(),
            inputs_locked: self.inputs_locked(),
        }
    }

    /// Renders the shareable summary of the current state.
    pub fn render_summary<C: CurrencyFormatter>(&self, currency: &C) -> String {
        SummaryFormatter::new(currency).render(&self.snapshot())
    }

    // -- change notification ------------------------------------------------

    /// Registers a callback invoked with a snapshot after each change.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&SessionSnapshot) + 'static,
    {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes a subscription. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in &mut self.observers {
            observer(&snapshot);
        }
    }

    // -- settings -----------------------------------------------------------

    /// Sets the attendee count, clamped to the accepted range.
    ///
    /// Ignored outside setup.
    pub fn set_attendees(&mut self, value: i64) {
        if self.inputs_locked() {
            debug!(phase = %self.phase, value, "ignoring attendees change");
            return;
        }
        let clamped = clamp_attendees(value);
        if i64::from(clamped) != value {
            debug!(value, clamped, "attendees clamped");
        }
        if clamped != self.attendees {
            self.attendees = clamped;
            self.notify();
        }
    }

    /// Moves the attendee count by `delta`, clamped. Ignored outside setup.
    pub fn step_attendees(&mut self, delta: i64) {
        self.set_attendees(i64::from(self.attendees).saturating_add(delta));
    }

    /// Sets the hourly rate, clamped to the accepted range.
    ///
    /// Ignored outside setup.
    pub fn set_hourly_rate(&mut self, value: f64) {
        if self.inputs_locked() {
            debug!(phase = %self.phase, value, "ignoring hourly rate change");
            return;
        }
        let clamped = clamp_hourly_rate(value);
        if clamped != value {
            debug!(value, clamped, "hourly rate clamped");
        }
        if clamped != self.hourly_rate {
            self.hourly_rate = clamped;
            self.notify();
        }
    }

    /// Sets the meeting name, truncated to [`MAX_NAME_CHARS`] characters.
    ///
    /// Ignored outside setup.
    pub fn set_meeting_name(&mut self, name: &str) {
        if self.inputs_locked() {
            debug!(phase = %self.phase, "ignoring meeting name change");
            return;
        }
        let name = truncate_name(name);
        if name != self.meeting_name {
            self.meeting_name = name;
            self.notify();
        }
    }

    // -- transitions --------------------------------------------------------

    /// Setup → Running. Resets the clock and starts ticking.
    pub fn start_meeting(&mut self) {
        if self.phase != Phase::Setup {
            debug!(phase = %self.phase, "start ignored");
            return;
        }
        self.elapsed_seconds = 0;
        self.phase = Phase::Running;
        self.start_clock();
        info!(
            attendees = self.attendees,
            hourly_rate = self.hourly_rate,
            "meeting started"
        );
        self.notify();
    }

    /// Running → Paused. Stops ticking.
    pub fn pause_meeting(&mut self) {
        if self.phase != Phase::Running {
            debug!(phase = %self.phase, "pause ignored");
            return;
        }
        self.phase = Phase::Paused;
        self.stop_clock();
        info!(elapsed = self.elapsed_seconds, "meeting paused");
        self.notify();
    }

    /// Paused → Running. Starts ticking again.
    pub fn resume_meeting(&mut self) {
        if self.phase != Phase::Paused {
            debug!(phase = %self.phase, "resume ignored");
            return;
        }
        self.phase = Phase::Running;
        self.start_clock();
        info!(elapsed = self.elapsed_seconds, "meeting resumed");
        self.notify();
    }

    /// Running or Paused → Summary. Stops ticking.
    pub fn end_meeting(&mut self) {
        if !matches!(self.phase, Phase::Running | Phase::Paused) {
            debug!(phase = %self.phase, "end ignored");
            return;
        }
        self.phase = Phase::Summary;
        self.stop_clock();
        info!(
            elapsed = self.elapsed_seconds,
            total_cost = self.running_cost(),
            "meeting ended"
        );
        self.notify();
    }

    /// Any phase → Setup. Clears the name and clock, keeps attendees and rate.
    pub fn new_meeting(&mut self) {
        self.stop_clock();
        let changed = self.phase != Phase::Setup
            || self.elapsed_seconds != 0
            || !self.meeting_name.is_empty();
        self.phase = Phase::Setup;
        self.elapsed_seconds = 0;
        self.meeting_name.clear();
        if changed {
            info!("new meeting");
            self.notify();
        }
    }

    /// Applies one fired tick.
    ///
    /// Only counts while running and only for the live handle; ticks from a
    /// cancelled schedule are dropped.
    pub fn tick(&mut self, handle: TickHandle) {
        if self.phase != Phase::Running || self.live_tick != Some(handle) {
            trace!(handle = handle.id(), phase = %self.phase, "stale tick dropped");
            return;
        }
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
        trace!(elapsed = self.elapsed_seconds, "tick");
        self.notify();
    }

    fn start_clock(&mut self) {
        self.stop_clock();
        let handle = self.ticker.schedule(TICK_INTERVAL);
        debug!(handle = handle.id(), "tick scheduled");
        self.live_tick = Some(handle);
    }

    fn stop_clock(&mut self) {
        if let Some(handle) = self.live_tick.take() {
            self.ticker.cancel(handle);
            debug!(handle = handle.id(), "tick cancelled");
        }
    }
}

impl<T: TickScheduler> Drop for MeetingSession<T> {
    fn drop(&mut self) {
        self.stop_clock();
    }
}

impl<T: TickScheduler> fmt::Debug for MeetingSession<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeetingSession")
            .field("phase", &self.phase)
            .field("attendees", &self.attendees)
            .field("hourly_rate", &self.hourly_rate)
            .field("meeting_name", &self.meeting_name)
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("live_tick", &self.live_tick)
            .field("observers", &self.observers.len())
            .finish()
    }
}
