//! One-shot cost estimate for a meeting of known length.
//!
//! The meeting is replayed through the state machine with a
//! [`ManualTicker`], one tick per second, so the figures are exactly what
//! the interactive clock would have shown at that point.

use tracing::info;

use meetingcost_core::{ManualTicker, MeetingSession, SummaryFormatter, parse_duration_at_most};

use crate::app::AppOptions;
use crate::error::ClientResult;
use crate::sink::TextSink;

/// Longest meeting `estimate` will replay (500 hours).
pub const MAX_ESTIMATE_SECONDS: u64 = 500 * 3600;

/// Runs a finished meeting of `seconds` length with the given settings.
pub fn replay(options: &AppOptions, seconds: u64) -> MeetingSession<ManualTicker> {
    let mut session =
        MeetingSession::with_settings(ManualTicker::new(), options.attendees, options.hourly_rate);
    session.set_meeting_name(&options.meeting_name);
    session.start_meeting();
    for _ in 0..seconds {
        if let Some(handle) = session.active_tick() {
            session.tick(handle);
        }
    }
    session.end_meeting();
    session
}

/// Renders the estimate as the summary report or as a JSON snapshot.
pub fn render(options: &AppOptions, duration: &str, json: bool) -> ClientResult<String> {
    let seconds = parse_duration_at_most(duration, MAX_ESTIMATE_SECONDS)?;
    let session = replay(options, seconds);
    info!(seconds, total_cost = session.running_cost(), "estimate computed");

    if json {
        Ok(serde_json::to_string_pretty(&session.snapshot())?)
    } else {
        Ok(SummaryFormatter::new(&options.currency).render(&session.snapshot()))
    }
}

/// Prints the estimate, optionally also sending it to `sink`.
pub fn run(
    options: &AppOptions,
    duration: &str,
    json: bool,
    sink: Option<&mut dyn TextSink>,
) -> ClientResult<()> {
    let text = render(options, duration, json)?;
    println!("{}", text);

    if let Some(sink) = sink {
        sink.put_text(&text)?;
        eprintln!("Copied! (summary sent to {})", sink.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use meetingcost_core::{DurationParseError, Phase};

    use crate::error::ClientError;

    fn options(attendees: i64, hourly_rate: f64, name: &str) -> AppOptions {
        AppOptions {
            attendees,
            hourly_rate,
            meeting_name: name.to_string(),
            ..AppOptions::default()
        }
    }

    #[test]
    fn replay_ends_in_summary() {
        let session = replay(&options(4, 150.0, ""), 3600);
        assert_eq!(session.phase(), Phase::Summary);
        assert_eq!(session.elapsed_seconds(), 3600);
        assert!((session.running_cost() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn render_text_summary() {
        let text = render(&options(1, 60.0, "Pairing"), "1:30", false).unwrap();
        assert_eq!(
            text,
            "Meeting Cost Summary\n\
             ------------------------------\n\
             Meeting: Pairing\n\
             Duration: 00:01:30\n\
             Attendees: 1\n\
             Hourly Rate: $60.00\n\
             Total Cost: $1.50\n\
             Cost/Person: $1.50"
        );
    }

    #[test]
    fn render_clamps_settings() {
        let text = render(&options(200, 5000.0, ""), "60", false).unwrap();
        assert!(text.contains("Attendees: 50"));
        assert!(text.contains("Hourly Rate: $1,000.00"));
    }

    #[test]
    fn render_json_snapshot() {
        let text = render(&options(2, 90.0, "Sync"), "30m", true).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(json["phase"], "summary");
        assert_eq!(json["meeting_name"], "Sync");
        assert_eq!(json["elapsed_seconds"], 1800);
        assert_eq!(json["formatted_time"], "00:30:00");
        assert_eq!(json["inputs_locked"], true);
    }

    #[test]
    fn bad_duration_is_reported() {
        let err = render(&options(2, 90.0, ""), "later", false).unwrap_err();
        assert!(matches!(err, ClientError::Duration(_)));
    }

    #[test]
    fn longest_estimate_is_accepted() {
        let text = render(&options(1, 60.0, ""), "500h", false).unwrap();
        assert!(text.contains("Duration: 500:00:00"));
    }

    #[test]
    fn oversized_duration_is_rejected_without_replay() {
        let started = Instant::now();
        for input in ["500h 1s", "1000years", "99999999999"] {
            let err = render(&options(2, 90.0, ""), input, false).unwrap_err();
            assert!(
                matches!(
                    err,
                    ClientError::Duration(DurationParseError::TooLong {
                        max: MAX_ESTIMATE_SECONDS,
                        ..
                    })
                ),
                "{input}: {err:?}"
            );
        }
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
