//! Logging setup for meetingcost.
//!
//! Everything is written to stderr so log lines never interleave with the
//! live readout on stdout. `RUST_LOG` overrides the level chosen here.
//!
//! ```ignore
//! use meetingcost_core::tracing::{init_tracing, TracingConfig, TracingOutputFormat};
//!
//! init_tracing(TracingConfig::for_host(true, TracingOutputFormat::Json))?;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// Log line layout, selectable from the config file as `log_format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TracingOutputFormat {
    /// Multi-line, for reading by eye
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// How the host wants its logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for the meetingcost crates when `RUST_LOG` is unset
    pub level: Level,
    pub format: TracingOutputFormat,
    /// Adds file:line to every event; compact output also drops timestamps
    pub verbose: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: TracingOutputFormat::Compact,
            verbose: false,
        }
    }
}

impl TracingConfig {
    /// Debug-level compact logs with source locations.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            format: TracingOutputFormat::Compact,
            verbose: true,
        }
    }

    /// Config for the terminal host: `debug` picks the level, `format` the layout.
    #[must_use]
    pub fn for_host(debug: bool, format: TracingOutputFormat) -> Self {
        let base = if debug { Self::cli_debug() } else { Self::default() };
        Self { format, ..base }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set or the
/// generated filter directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(config.level)))?;

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(config.verbose)
        .with_line_number(config.verbose);
    let layer = match config.format {
        TracingOutputFormat::Pretty => layer.pretty().boxed(),
        TracingOutputFormat::Compact if config.verbose => layer.compact().without_time().boxed(),
        TracingOutputFormat::Compact => layer.compact().boxed(),
        TracingOutputFormat::Json => layer.json().boxed(),
    };

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Filter directive covering every meetingcost crate at `level`.
fn default_directive(level: Level) -> String {
    format!("meetingcost_core={level},meetingcost_client={level},meetingcost={level}")
}
