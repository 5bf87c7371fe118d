//! Terminal host: CLI, interactive session, clipboard export
//!
//! This crate provides the `meetingcost` command-line interface.

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod feedback;
pub mod sink;
pub mod ticker;

pub use app::{App, AppOptions, HostCommand};
pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use feedback::EphemeralFlag;
pub use sink::{ClipboardSink, TextSink, WriterSink};
pub use ticker::TokioTicker;
