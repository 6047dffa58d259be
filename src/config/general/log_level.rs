use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::level_filters::LevelFilter;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from critical errors only
/// to detailed trace information. `RUST_LOG` takes precedence when set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only show errors.
    Error,

    /// Show warnings and errors.
    Warn,

    /// Show player lifecycle messages, warnings and errors (default level).
    #[default]
    Info,

    /// Show every notification the watcher handles.
    Debug,

    /// Show ticker transitions as well (very verbose).
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
