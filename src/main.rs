//! mprisctl entry point
//!
//! `mprisctl watch` runs the watcher until interrupted; anything else is
//! routed to the command registry.

use std::{env, error::Error, process, sync::Arc};

use mprisctl::{
    cli::{CliService, SessionBus, formatting::format_error},
    config::Config,
    services::mpris::{PlayerWatcher, StdoutPresenter, ZbusClient},
    tracing_config,
};
use tracing::{error, info, instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    match args.get(1).map(|s| s.as_str()) {
        Some("watch") => run_watch(config).await,
        _ => {
            tracing_config::init_cli_mode(config.general.log_level)?;
            run_cli_command(config, args.get(1..).unwrap_or(&[])).await
        }
    }
}

/// Runs the watcher until the bus connection closes or Ctrl-C arrives.
///
/// A failed bus connection is fatal and exits non-zero.
///
/// # Errors
/// Returns error if logging cannot be initialized
#[instrument(skip_all)]
async fn run_watch(config: Config) -> Result<(), Box<dyn Error>> {
    let _guard =
        tracing_config::init_watch(config.general.log_level, config.watch.log_to_file)?;

    let bus = match ZbusClient::connect().await {
        Ok(bus) => Arc::new(bus),
        Err(e) => {
            error!(error = %e, "Cannot connect to the session bus");
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let mut watcher =
        PlayerWatcher::new(bus, Arc::new(StdoutPresenter), config.watch.ignored_players);

    tokio::select! {
        result = watcher.run() => {
            if let Err(e) = result {
                error!(error = %e, "Watcher failed");
                eprintln!("{}", format_error(&e.to_string()));
                process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
        }
    }

    Ok(())
}

/// Executes CLI commands through the CliService.
///
/// `mprisctl <category> <command> [args]`; with no arguments the command
/// overview is printed.
///
/// # Errors
/// Never returns an error; command failures exit with status 1.
async fn run_cli_command(config: Config, args: &[String]) -> Result<(), Box<dyn Error>> {
    let cli_service = CliService::new(config, Arc::new(SessionBus));

    let category = args.first().map(|s| s.as_str()).unwrap_or("help");
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    let result = cli_service
        .execute_command(category, command, command_args)
        .await;

    match result {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
