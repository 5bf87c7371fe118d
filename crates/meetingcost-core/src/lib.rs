//! Core types: meeting session, cost arithmetic, tick scheduling, formatting

pub mod format;
pub mod session;
pub mod tick;
pub mod time;
pub mod tracing;

pub use format::{CurrencyFormatter, SummaryFormatter, SymbolCurrency, group_thousands};
pub use session::{
    DEFAULT_ATTENDEES, DEFAULT_HOURLY_RATE, MAX_ATTENDEES, MAX_HOURLY_RATE, MAX_NAME_CHARS,
    MIN_ATTENDEES, MIN_HOURLY_RATE, MeetingSession, Phase, SessionSnapshot, SubscriptionId,
    clamp_attendees, clamp_hourly_rate, cost_per_minute, cost_per_second, truncate_name,
};
pub use tick::{ManualTicker, TICK_INTERVAL, TickHandle, TickScheduler};
pub use time::{DurationParseError, format_elapsed, parse_duration, parse_duration_at_most};
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
