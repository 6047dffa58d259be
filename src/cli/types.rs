use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::services::mpris::{BusClient, MediaError};

/// Errors that can occur during CLI command execution.
///
/// Covers command lookup, argument validation and failures reported by the
/// services a command talks to.
#[derive(Error, Debug)]
pub enum CliError {
    /// A command or category was not found in the registry.
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    /// Wrong number of arguments for a command.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// An argument was present but its value was rejected.
    #[error("Invalid value for '{arg}': {reason}")]
    InvalidArgument {
        /// Argument name as shown in help
        arg: String,
        /// Why the value was rejected
        reason: String,
    },

    /// A required argument was not supplied.
    #[error("Missing argument '{arg}' for '{command}'")]
    MissingArgument {
        /// Argument name as shown in help
        arg: String,
        /// Command that needed it
        command: String,
    },

    /// The configuration could not be rendered.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A backing service failed.
    #[error("{service} service error: {details}")]
    ServiceError {
        /// Service that failed
        service: String,
        /// Failure details
        details: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<MediaError> for CliError {
    fn from(error: MediaError) -> Self {
        CliError::ServiceError {
            service: "Media".to_string(),
            details: error.to_string(),
        }
    }
}

/// Type alias for command execution results.
///
/// Commands return their printable output on success.
pub type CommandResult = Result<String, CliError>;

/// Specification for a single command argument.
#[derive(Debug, Clone)]
pub struct CommandArg {
    /// The name of the argument (e.g., "player", "status").
    pub name: String,

    /// Human-readable description of what this argument does.
    pub description: String,

    /// Whether this argument is required for command execution.
    pub required: bool,

    /// The expected type of this argument for help display.
    pub value_type: ArgType,
}

/// Type classification for command arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// A general string value.
    String,

    /// An integer value.
    Number,

    /// A boolean value (true/false).
    Boolean,
}

/// Complete metadata for a CLI command.
///
/// The registry uses it for help generation, argument count validation and
/// command lookup.
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    /// The command name (e.g., "play", "show").
    pub name: String,

    /// Brief description of what this command does.
    pub description: String,

    /// Specification of all arguments this command accepts.
    pub args: Vec<CommandArg>,

    /// Example usage strings to show in help text.
    pub examples: Vec<String>,

    /// Category this command belongs to (e.g., "player", "config").
    pub category: String,
}

/// Trait defining the interface for all CLI commands.
///
/// Commands receive their dependencies through their constructors.
#[async_trait]
pub trait Command: Send + Sync {
    /// Executes the command with the provided arguments.
    ///
    /// The registry has already checked the argument count against
    /// [`Command::metadata`]; the command validates the values.
    ///
    /// # Errors
    ///
    /// Returns `CliError` for rejected argument values or service failures.
    async fn execute(&self, args: &[String]) -> CommandResult;

    /// Returns the complete metadata for this command.
    fn metadata(&self) -> CommandMetadata;
}

/// Opens the bus connection used by player commands.
///
/// Deferred until a player command runs, so config commands work without a
/// session bus.
#[async_trait]
pub trait BusConnector: Send + Sync {
    /// Connect to the bus.
    ///
    /// # Errors
    /// Returns error if no connection can be established
    async fn connect(&self) -> Result<Arc<dyn BusClient>, MediaError>;
}
