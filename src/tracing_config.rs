use std::{env, error::Error};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{ConfigPaths, LogLevel};

fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

fn log_format() -> String {
    env::var("MPRISCTL_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string())
}

/// Initialize tracing for one-shot commands
///
/// Logs go to stderr so stdout carries only command output.
/// Uses RUST_LOG if set, otherwise `level`. MPRISCTL_LOG_FORMAT selects
/// `json` or compact text.
///
/// # Errors
/// Returns error if tracing subscriber initialization fails
pub fn init_cli_mode(level: LogLevel) -> Result<(), Box<dyn Error>> {
    let registry = tracing_subscriber::registry().with(env_filter(level));

    match log_format().as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize tracing for the watcher
///
/// Logs go to stderr, leaving stdout to the status lines. With `to_file` they
/// are also written to daily-rotated files under `$HOME/.mprisctl/logs`; the
/// returned guard must be kept alive for those writes to flush.
///
/// # Errors
/// Returns error if the log directory cannot be created or tracing subscriber
/// initialization fails
pub fn init_watch(level: LogLevel, to_file: bool) -> Result<Option<WorkerGuard>, Box<dyn Error>> {
    const DAYS_TO_KEEP: usize = 7;

    if !to_file {
        init_cli_mode(level)?;
        return Ok(None);
    }

    let log_dir = ConfigPaths::log_dir()?;
    let file_appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(DAYS_TO_KEEP)
        .filename_prefix("mprisctl")
        .filename_suffix("log")
        .build(&log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let registry = tracing_subscriber::registry().with(env_filter(level));

    match log_format().as_str() {
        "json" => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .try_init()?;
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_level(true)
                        .with_thread_ids(true)
                        .with_writer(std::io::stderr),
                )
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .try_init()?;
        }
    }

    Ok(Some(guard))
}
