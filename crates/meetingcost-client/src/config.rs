//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/meetingcost/config.toml` by default. A missing file means
//! defaults. Values are not rejected when out of range: the session clamps
//! them like any other input, and `config validate` lists what will change.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use meetingcost_core::{
    DEFAULT_ATTENDEES, DEFAULT_HOURLY_RATE, MAX_ATTENDEES, MAX_HOURLY_RATE, MAX_NAME_CHARS,
    MIN_ATTENDEES, MIN_HOURLY_RATE, SymbolCurrency, TracingOutputFormat, clamp_attendees,
    clamp_hourly_rate,
};

use crate::error::{ClientError, ClientResult};

// ---------------------------------------------------------------------------
// ClientConfig (config.toml)
// ---------------------------------------------------------------------------

/// Configuration for the meetingcost client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Log output format.
    pub log_format: TracingOutputFormat,

    /// Initial meeting settings.
    #[serde(default)]
    pub defaults: MeetingDefaults,

    /// Display settings.
    #[serde(default)]
    pub display: DisplaySettings,

    /// Clipboard settings.
    #[serde(default)]
    pub clipboard: ClipboardSettings,
}

/// Initial values for a fresh session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingDefaults {
    /// Attendee count.
    pub attendees: i64,

    /// Hourly rate per attendee.
    pub hourly_rate: f64,

    /// Meeting name.
    pub meeting_name: String,
}

impl Default for MeetingDefaults {
    fn default() -> Self {
        Self {
            attendees: i64::from(DEFAULT_ATTENDEES),
            hourly_rate: DEFAULT_HOURLY_RATE,
            meeting_name: String::new(),
        }
    }
}

/// Display settings for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Symbol placed before currency amounts.
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
        }
    }
}

impl DisplaySettings {
    /// Builds the currency formatter for these settings.
    pub fn currency(&self) -> SymbolCurrency {
        SymbolCurrency::new(self.currency_symbol.clone())
    }
}

/// Clipboard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardSettings {
    /// Copy to the system clipboard; when false, `copy` prints instead.
    pub enabled: bool,

    /// How long the "copied" acknowledgement stays visible, in seconds.
    pub copied_feedback_secs: u64,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            copied_feedback_secs: 2,
        }
    }
}

impl ClipboardSettings {
    /// The acknowledgement duration.
    pub fn copied_feedback(&self) -> Duration {
        Duration::from_secs(self.copied_feedback_secs)
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        toml::from_str(content)
            .map_err(|e| ClientError::config(format!("failed to parse config: {}", e)))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("meetingcost")
    }

    /// Lists values that the session will clamp or truncate.
    pub fn adjustments(&self) -> Vec<String> {
        let mut notes = Vec::new();
        let d = &self.defaults;

        let attendees = clamp_attendees(d.attendees);
        if i64::from(attendees) != d.attendees {
            notes.push(format!(
                "defaults.attendees = {} is outside {}..={} and will be used as {}",
                d.attendees, MIN_ATTENDEES, MAX_ATTENDEES, attendees
            ));
        }

        let rate = clamp_hourly_rate(d.hourly_rate);
        if rate != d.hourly_rate {
            notes.push(format!(
                "defaults.hourly_rate = {} is outside {}..={} and will be used as {}",
                d.hourly_rate, MIN_HOURLY_RATE, MAX_HOURLY_RATE, rate
            ));
        }

        let name_len = d.meeting_name.chars().count();
        if name_len > MAX_NAME_CHARS {
            notes.push(format!(
                "defaults.meeting_name has {} characters and will be cut to {}",
                name_len, MAX_NAME_CHARS
            ));
        }

        notes
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_sections_use_defaults() {
        let config = ClientConfig::parse("").unwrap();
        assert!(!config.debug);
        assert_eq!(config.log_format, TracingOutputFormat::Compact);
        assert_eq!(config.defaults.attendees, 4);
        assert_eq!(config.defaults.hourly_rate, 150.0);
        assert_eq!(config.display.currency_symbol, "$");
        assert!(config.clipboard.enabled);
        assert_eq!(config.clipboard.copied_feedback(), Duration::from_secs(2));
    }

    #[test]
    fn parses_full_file() {
        let config = ClientConfig::parse(
            r#"
            debug = true
            log_format = "json"

            [defaults]
            attendees = 8
            hourly_rate = 95.5
            meeting_name = "Weekly"

            [display]
            currency_symbol = "£"

            [clipboard]
            enabled = false
            copied_feedback_secs = 5
            "#,
        )
        .unwrap();

        assert!(config.debug);
        assert_eq!(config.log_format, TracingOutputFormat::Json);
        assert_eq!(config.defaults.attendees, 8);
        assert_eq!(config.defaults.hourly_rate, 95.5);
        assert_eq!(config.defaults.meeting_name, "Weekly");
        assert_eq!(config.display.currency().symbol, "£");
        assert!(!config.clipboard.enabled);
        assert_eq!(config.clipboard.copied_feedback_secs, 5);
    }

    #[test]
    fn parse_error_is_config_error() {
        let err = ClientConfig::parse("defaults = 3").unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\nattendees = 12").unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.defaults.attendees, 12);
    }

    #[test]
    fn load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn adjustments_flag_out_of_range_values() {
        let mut config = ClientConfig::default();
        assert!(config.adjustments().is_empty());

        config.defaults.attendees = 80;
        config.defaults.hourly_rate = 0.0;
        config.defaults.meeting_name = "n".repeat(60);

        let notes = config.adjustments();
        assert_eq!(notes.len(), 3);
        assert!(notes[0].contains("will be used as 50"));
        assert!(notes[1].contains("will be used as 1"));
        assert!(notes[2].contains("cut to 50"));
    }

    #[test]
    fn default_path_ends_with_config_toml() {
        let path = ClientConfig::default_path();
        assert!(path.ends_with("meetingcost/config.toml"));
    }
}
