//! meetingcost CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing::debug;

use meetingcost_client::cli::{Cli, Command, ConfigAction};
use meetingcost_client::config::ClientConfig;
use meetingcost_client::error::ClientResult;
use meetingcost_client::sink::default_sink;
use meetingcost_client::{App, commands};
use meetingcost_core::tracing::{TracingConfig, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClientResult<()> {
    // Load configuration
    let config = if let Some(ref path) = cli.config {
        ClientConfig::load_from(path)?
    } else {
        ClientConfig::load()?
    };

    // Initialize tracing
    init_tracing(TracingConfig::for_host(cli.debug || config.debug, config.log_format))?;
    debug!(?config, "configuration loaded");

    let options = cli.app_options(&config);

    match cli.command {
        None | Some(Command::Run) => {
            let mut app = App::new(options, default_sink(cli.clipboard_enabled(&config)));
            let mut stdout = std::io::stdout();
            app.run(BufReader::new(tokio::io::stdin()), &mut stdout).await
        }
        Some(Command::Estimate {
            ref duration,
            json,
            copy,
        }) => {
            if copy {
                let mut sink = default_sink(cli.clipboard_enabled(&config));
                commands::estimate::run(&options, duration, json, Some(sink.as_mut()))
            } else {
                commands::estimate::run(&options, duration, json, None)
            }
        }
        Some(Command::Config { ref action }) => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
