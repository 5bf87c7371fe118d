//! Non-interactive subcommands.

pub mod config;
pub mod estimate;
