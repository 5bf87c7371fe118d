//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::{AppOptions, saturating_integer};
use crate::config::ClientConfig;

/// meetingcost - What is this meeting costing?
#[derive(Debug, Parser)]
#[command(name = "meetingcost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "MEETINGCOST_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    // --- Meeting settings (clamped like any other input) ---
    /// Number of attendees (1-50)
    #[arg(
        long,
        short,
        allow_hyphen_values = true,
        global = true,
        value_parser = parse_attendees
    )]
    pub attendees: Option<i64>,

    /// Hourly rate per attendee (1-1000)
    #[arg(long, short, allow_hyphen_values = true, global = true)]
    pub rate: Option<f64>,

    /// Meeting name (first 50 characters are kept)
    #[arg(long, short, global = true)]
    pub name: Option<String>,

    // --- Output ---
    /// Print copied summaries instead of using the system clipboard
    #[arg(long, global = true)]
    pub no_clipboard: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Session options: config values overridden by command-line flags.
    pub fn app_options(&self, config: &ClientConfig) -> AppOptions {
        let mut options = AppOptions::from_config(config);
        if let Some(attendees) = self.attendees {
            options.attendees = attendees;
        }
        if let Some(rate) = self.rate {
            options.hourly_rate = rate;
        }
        if let Some(ref name) = self.name {
            options.meeting_name = name.clone();
        }
        options
    }

    /// Whether copies should go to the system clipboard.
    pub fn clipboard_enabled(&self, config: &ClientConfig) -> bool {
        config.clipboard.enabled && !self.no_clipboard
    }
}

fn parse_attendees(raw: &str) -> Result<i64, String> {
    saturating_integer(raw).ok_or_else(|| format!("'{raw}' is not a whole number"))
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Time a meeting interactively (the default)
    Run,

    /// Print the summary for a meeting of known length
    Estimate {
        /// Meeting length: HH:MM:SS, MM:SS, seconds, or e.g. "1h 30m" (at most 500 hours)
        #[arg(long, short)]
        duration: String,

        /// Output the session snapshot as JSON
        #[arg(long)]
        json: bool,

        /// Also copy the output
        #[arg(long)]
        copy: bool,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "meetingcost",
            "--attendees",
            "7",
            "--rate",
            "99.5",
            "-n",
            "Sync",
        ]);
        let mut config = ClientConfig::default();
        config.defaults.attendees = 3;
        config.defaults.meeting_name = "From config".into();

        let options = cli.app_options(&config);
        assert_eq!(options.attendees, 7);
        assert_eq!(options.hourly_rate, 99.5);
        assert_eq!(options.meeting_name, "Sync");
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_used_without_flags() {
        let cli = Cli::parse_from(["meetingcost"]);
        let mut config = ClientConfig::default();
        config.defaults.hourly_rate = 42.0;

        assert_eq!(cli.app_options(&config).hourly_rate, 42.0);
    }

    #[test]
    fn negative_attendees_accepted_for_clamping() {
        let cli = Cli::parse_from(["meetingcost", "--attendees", "-2"]);
        assert_eq!(cli.attendees, Some(-2));
    }

    #[test]
    fn oversized_attendees_saturate() {
        let cli = Cli::parse_from(["meetingcost", "-a", "99999999999999999999"]);
        assert_eq!(cli.attendees, Some(i64::MAX));
        assert!(Cli::try_parse_from(["meetingcost", "-a", "lots"]).is_err());
    }

    #[test]
    fn estimate_subcommand() {
        let cli = Cli::parse_from(["meetingcost", "estimate", "-d", "1h 30m", "--json", "-a", "3"]);
        match cli.command {
            Some(Command::Estimate { duration, json, copy }) => {
                assert_eq!(duration, "1h 30m");
                assert!(json);
                assert!(!copy);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.attendees, Some(3));
    }

    #[test]
    fn no_clipboard_flag_wins() {
        let cli = Cli::parse_from(["meetingcost", "--no-clipboard"]);
        assert!(!cli.clipboard_enabled(&ClientConfig::default()));

        let cli = Cli::parse_from(["meetingcost"]);
        assert!(cli.clipboard_enabled(&ClientConfig::default()));
    }
}
