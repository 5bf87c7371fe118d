//! Interactive terminal host.
//!
//! Reads line commands from an async reader, drives a [`MeetingSession`]
//! with a [`TokioTicker`], and prints the live readout. Everything runs on
//! one task: user commands, fired ticks, and the "copied" flag countdown
//! are multiplexed with `tokio::select!`, so the session has a single
//! writer.

use std::io::Write;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::watch;
use tracing::{debug, warn};

use meetingcost_core::{
    CurrencyFormatter, DEFAULT_ATTENDEES, DEFAULT_HOURLY_RATE, MeetingSession, Phase,
    SessionSnapshot, SummaryFormatter, SymbolCurrency,
};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::feedback::{EphemeralFlag, wait_until};
use crate::sink::TextSink;
use crate::ticker::{TickReceiver, TokioTicker};

const HELP: &str = "\
commands:
  start | pause | resume | end | new
  <enter>            start, pause or resume depending on the phase
  name <text>        set the meeting name (setup only)
  attendees <n>      set the attendee count, 1-50 (setup only)
  + | -              add or remove one attendee (setup only)
  rate <amount>      set the hourly rate, 1-1000 (setup only)
  copy               copy the summary (after end)
  status             show the current figures
  help | quit";

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    Start,
    Pause,
    Resume,
    End,
    New,
    /// Start, pause or resume, whichever the phase allows.
    Primary,
    Copy,
    Name(String),
    Attendees(i64),
    StepAttendees(i64),
    Rate(f64),
    Status,
    Help,
    Quit,
}

/// Why a line could not be understood.
#[derive(Debug, Error, PartialEq)]
pub enum CommandParseError {
    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("'{0}' needs a value")]
    MissingArgument(&'static str),

    #[error("'{value}' is not a valid {what}")]
    InvalidNumber { what: &'static str, value: String },
}

impl HostCommand {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, CommandParseError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => Self::Primary,
            "start" | "s" => Self::Start,
            "pause" | "p" => Self::Pause,
            "resume" | "r" => Self::Resume,
            "end" | "e" => Self::End,
            "new" | "n" => Self::New,
            "copy" | "c" => Self::Copy,
            "status" => Self::Status,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            "+" => Self::StepAttendees(1),
            "-" => Self::StepAttendees(-1),
            "name" => Self::Name(rest.to_string()),
            "attendees" | "a" => Self::Attendees(parse_attendees(rest)?),
            "rate" => Self::Rate(parse_number(rest, "rate", "hourly rate")?),
            _ => return Err(CommandParseError::Unknown(word.to_string())),
        };
        Ok(command)
    }

    fn is_setting(&self) -> bool {
        matches!(
            self,
            Self::Name(_) | Self::Attendees(_) | Self::StepAttendees(_) | Self::Rate(_)
        )
    }
}

fn parse_number<N: std::str::FromStr>(
    raw: &str,
    command: &'static str,
    what: &'static str,
) -> Result<N, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument(command));
    }
    strip_separators(raw)
        .parse()
        .map_err(|_| CommandParseError::InvalidNumber {
            what,
            value: raw.to_string(),
        })
}

fn parse_attendees(raw: &str) -> Result<i64, CommandParseError> {
    if raw.is_empty() {
        return Err(CommandParseError::MissingArgument("attendees"));
    }
    saturating_integer(&strip_separators(raw)).ok_or_else(|| CommandParseError::InvalidNumber {
        what: "attendee count",
        value: raw.to_string(),
    })
}

/// Accepts "$150" and "1,000" the way they are displayed.
fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | '_'))
        .collect()
}

/// Parses an optionally signed run of digits, saturating at the `i64`
/// bounds so huge counts still reach the clamp.
pub(crate) fn saturating_integer(raw: &str) -> Option<i64> {
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bound = if negative { i64::MIN } else { i64::MAX };
    Some(raw.parse().unwrap_or(bound))
}

/// Starting values for an interactive session.
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub attendees: i64,
    pub hourly_rate: f64,
    pub meeting_name: String,
    pub currency: SymbolCurrency,
    pub copied_feedback: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            attendees: i64::from(DEFAULT_ATTENDEES),
            hourly_rate: DEFAULT_HOURLY_RATE,
            meeting_name: String::new(),
            currency: SymbolCurrency::default(),
            copied_feedback: Duration::from_secs(2),
        }
    }
}

impl AppOptions {
    /// Options taken from a loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            attendees: config.defaults.attendees,
            hourly_rate: config.defaults.hourly_rate,
            meeting_name: config.defaults.meeting_name.clone(),
            currency: config.display.currency(),
            copied_feedback: config.clipboard.copied_feedback(),
        }
    }
}

/// The interactive host.
pub struct App<S> {
    session: MeetingSession<TokioTicker>,
    ticks: TickReceiver,
    updates: watch::Receiver<SessionSnapshot>,
    formatter: SummaryFormatter<SymbolCurrency>,
    sink: S,
    copied: EphemeralFlag,
}

impl<S: TextSink> App<S> {
    /// Builds the host. Must be called inside a tokio runtime.
    pub fn new(options: AppOptions, sink: S) -> Self {
        let (ticker, ticks) = TokioTicker::channel();
        let mut session =
            MeetingSession::with_settings(ticker, options.attendees, options.hourly_rate);
        session.set_meeting_name(&options.meeting_name);

        let (tx, updates) = watch::channel(session.snapshot());
        session.subscribe(move |snapshot| {
            tx.send_replace(snapshot.clone());
        });

        Self {
            session,
            ticks,
            updates,
            formatter: SummaryFormatter::new(options.currency),
            sink,
            copied: EphemeralFlag::new(options.copied_feedback),
        }
    }

    /// The session being driven.
    pub fn session(&self) -> &MeetingSession<TokioTicker> {
        &self.session
    }

    /// Runs until `quit` or end of input.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> ClientResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        let mut last_phase = self.session.phase();

        writeln!(out, "Meeting Cost Calculator  (type 'help' for commands)")?;
        self.print_setup(out)?;

        loop {
            let copied_deadline = self.copied.deadline();

            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("input closed");
                        break;
                    };
                    match HostCommand::parse(&line) {
                        Ok(HostCommand::Quit) => break,
                        Ok(command) => self.apply(command, out)?,
                        Err(e) => writeln!(out, "{} (type 'help')", e)?,
                    }
                }
                Some(handle) = self.ticks.recv() => {
                    self.session.tick(handle);
                }
                () = wait_until(copied_deadline) => {
                    debug!("copied acknowledgement cleared");
                    self.copied.clear();
                }
            }

            if self.updates.has_changed().unwrap_or(false) {
                let snapshot = self.updates.borrow_and_update().clone();
                self.render(&snapshot, last_phase, out)?;
                last_phase = snapshot.phase;
            }
        }

        if matches!(self.session.phase(), Phase::Running | Phase::Paused) {
            writeln!(out)?;
            writeln!(out, "{}", self.session.render_summary(self.formatter.currency()))?;
        }
        Ok(())
    }

    fn apply<W: Write>(&mut self, command: HostCommand, out: &mut W) -> ClientResult<()> {
        if command.is_setting() && self.session.inputs_locked() {
            writeln!(out, "settings are locked until 'new'")?;
            return Ok(());
        }

        match command {
            HostCommand::Start => self.session.start_meeting(),
            HostCommand::Pause => self.session.pause_meeting(),
            HostCommand::Resume => self.session.resume_meeting(),
            HostCommand::End => self.session.end_meeting(),
            HostCommand::New => self.session.new_meeting(),
            HostCommand::Primary => match self.session.phase() {
                Phase::Setup => self.session.start_meeting(),
                Phase::Running => self.session.pause_meeting(),
                Phase::Paused => self.session.resume_meeting(),
                Phase::Summary => {}
            },
            HostCommand::Name(name) => self.session.set_meeting_name(&name),
            HostCommand::Attendees(n) => self.session.set_attendees(n),
            HostCommand::StepAttendees(delta) => self.session.step_attendees(delta),
            HostCommand::Rate(rate) => self.session.set_hourly_rate(rate),
            HostCommand::Copy => self.copy_summary(out)?,
            HostCommand::Status => self.print_status(out)?,
            HostCommand::Help => writeln!(out, "{}", HELP)?,
            HostCommand::Quit => {}
        }
        Ok(())
    }

    fn copy_summary<W: Write>(&mut self, out: &mut W) -> ClientResult<()> {
        if self.session.phase() != Phase::Summary {
            writeln!(out, "the summary is available after 'end'")?;
            return Ok(());
        }

        let text = self.session.render_summary(self.formatter.currency());
        match self.sink.put_text(&text) {
            Ok(()) => {
                self.copied.raise();
                writeln!(out, "Copied! (summary sent to {})", self.sink.name())?;
            }
            Err(e) => {
                warn!(error = %e, "copy failed");
                writeln!(out, "{}", e)?;
            }
        }
        Ok(())
    }

    fn render<W: Write>(
        &self,
        snapshot: &SessionSnapshot,
        last_phase: Phase,
        out: &mut W,
    ) -> ClientResult<()> {
        if snapshot.phase == last_phase {
            match snapshot.phase {
                Phase::Setup => self.print_setup(out)?,
                Phase::Running | Phase::Paused => {
                    write!(out, "\r{}", self.formatter.status_line(snapshot))?;
                    out.flush()?;
                }
                Phase::Summary => {}
            }
            return Ok(());
        }

        if matches!(last_phase, Phase::Running | Phase::Paused) {
            writeln!(out)?;
        }
        match snapshot.phase {
            Phase::Setup => {
                writeln!(out, "New meeting.")?;
                self.print_setup(out)?;
            }
            Phase::Running => {
                writeln!(out, "Running.  <enter>/pause, end")?;
                write!(out, "{}", self.formatter.status_line(snapshot))?;
                out.flush()?;
            }
            Phase::Paused => {
                writeln!(out, "Paused.  <enter>/resume, end")?;
                write!(out, "{}", self.formatter.status_line(snapshot))?;
                out.flush()?;
            }
            Phase::Summary => {
                writeln!(out, "{}", self.formatter.render(snapshot))?;
                writeln!(out, "copy | new")?;
            }
        }
        Ok(())
    }

    fn print_setup<W: Write>(&self, out: &mut W) -> ClientResult<()> {
        let currency = self.formatter.currency();
        let name = self.session.meeting_name();
        writeln!(
            out,
            "Setup: {}{} attendees at {}/h ({}/min)",
            if name.is_empty() {
                String::new()
            } else {
                format!("'{}', ", name)
            },
            self.session.attendees(),
            currency.format_amount(self.session.hourly_rate()),
            currency.format_amount(self.session.cost_per_minute()),
        )?;
        Ok(())
    }

    fn print_status<W: Write>(&self, out: &mut W) -> ClientResult<()> {
        let snapshot = self.session.snapshot();
        match snapshot.phase {
            Phase::Setup => self.print_setup(out)?,
            _ => {
                writeln!(
                    out,
                    "[{}] {}{}",
                    snapshot.phase,
                    self.formatter.status_line(&snapshot),
                    if self.copied.is_raised() { "  (copied)" } else { "" }
                )?;
            }
        }
        Ok(())
    }
}
