//! Elapsed-time helpers.
//!
//! This module provides [`format_elapsed`] for the `HH:MM:SS` clock shown
//! while a meeting runs, and [`parse_duration`] for turning user input such
//! as `01:30:00`, `90`, or `1h 30m` back into whole seconds.

use thiserror::Error;

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;

/// Errors produced while parsing a duration string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationParseError {
    /// Nothing to parse.
    #[error("duration is empty")]
    Empty,

    /// A clock-style value (`HH:MM:SS` or `MM:SS`) was malformed.
    #[error("invalid clock duration '{0}': expected HH:MM:SS or MM:SS")]
    InvalidClock(String),

    /// The value does not fit in a second counter.
    #[error("duration '{0}' is too large")]
    Overflow(String),

    /// The value parsed but exceeds the caller's limit.
    #[error("duration of {seconds}s exceeds the limit of {max}s")]
    TooLong { seconds: u64, max: u64 },

    /// A humantime-style value (`1h 30m`) could not be parsed.
    #[error("invalid duration '{input}': {message}")]
    Invalid { input: String, message: String },
}

/// Formats elapsed seconds as `HH:MM:SS`.
///
/// Every field is zero-padded to two digits. Hours are not capped, so a
/// meeting past 99 hours renders with a wider hour field (`100:00:00`).
pub fn format_elapsed(elapsed_seconds: u64) -> String {
    let hours = elapsed_seconds / SECONDS_PER_HOUR;
    let minutes = (elapsed_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = elapsed_seconds % SECONDS_PER_MINUTE;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Parses a duration into whole seconds.
///
/// Accepted forms:
/// - `HH:MM:SS` (minutes and seconds below 60)
/// - `MM:SS` (seconds below 60)
/// - a bare number of seconds
/// - anything [`humantime`] understands, e.g. `1h 30m` or `45min`
///
/// Sub-second precision is dropped.
pub fn parse_duration(input: &str) -> Result<u64, DurationParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DurationParseError::Empty);
    }

    if trimmed.contains(':') {
        return parse_clock(trimmed);
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return trimmed
            .parse::<u64>()
            .map_err(|_| DurationParseError::Overflow(trimmed.to_string()));
    }

    humantime::parse_duration(trimmed)
        .map(|d| d.as_secs())
        .map_err(|e| DurationParseError::Invalid {
            input: trimmed.to_string(),
            message: e.to_string(),
        })
}

/// Like [`parse_duration`], rejecting results longer than `max` seconds.
pub fn parse_duration_at_most(input: &str, max: u64) -> Result<u64, DurationParseError> {
    let seconds = parse_duration(input)?;
    if seconds > max {
        return Err(DurationParseError::TooLong { seconds, max });
    }
    Ok(seconds)
}

fn parse_clock(input: &str) -> Result<u64, DurationParseError> {
    let invalid = || DurationParseError::InvalidClock(input.to_string());

    let fields = input
        .split(':')
        .map(|part| {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>()
                .map_err(|_| DurationParseError::Overflow(input.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (hours, minutes, seconds) = match fields.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] if *m < SECONDS_PER_MINUTE => (*h, *m, *s),
        _ => return Err(invalid()),
    };

    if seconds >= SECONDS_PER_MINUTE {
        return Err(invalid());
    }

    hours
        .checked_mul(SECONDS_PER_HOUR)
        .and_then(|h| minutes.checked_mul(SECONDS_PER_MINUTE).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .ok_or_else(|| DurationParseError::Overflow(input.to_string()))
}
