use std::path::Path;

use thiserror::Error;

use crate::services::mpris::MediaError;

/// Error types for the mprisctl application.
///
/// Covers configuration loading and the failures that end the process
/// before any command runs.
#[derive(Error, Debug)]
pub enum MprisctlError {
    /// I/O operation error
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where I/O error occurred
        path: std::path::PathBuf,
        /// I/O error details
        details: String,
    },

    /// Standard I/O operation error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },

    /// Configuration could not be serialized
    #[error("failed to serialize configuration: {0}")]
    Serialize(String),

    /// Required directory could not be determined
    #[error("cannot determine {0}")]
    MissingDirectory(&'static str),

    /// Media player service error
    #[error(transparent)]
    Media(#[from] MediaError),
}

/// A specialized `Result` type for mprisctl operations.
pub type Result<T> = std::result::Result<T, MprisctlError>;

impl MprisctlError {
    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl std::fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        MprisctlError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an I/O error with file path context.
    pub fn io(error: impl std::fmt::Display, path: &Path) -> Self {
        MprisctlError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }
}
