use std::{fs, io::ErrorKind, path::Path};

use tracing::debug;

use super::{Config, ConfigPaths};
use crate::{MprisctlError, Result};

impl Config {
    /// Loads the configuration from the standard location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration directory cannot be determined
    /// - The file exists but cannot be read
    /// - The TOML content is invalid
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Loads a configuration file, falling back to defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid configuration
    pub fn load_from(path: &Path) -> Result<Config> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(MprisctlError::io(e, path)),
        };

        Self::from_toml(&content).map_err(|e| match e {
            MprisctlError::TomlParseError { details, .. } => {
                MprisctlError::toml_parse(details, Some(path))
            }
            other => other,
        })
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or does not match the schema
    pub fn from_toml(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| MprisctlError::toml_parse(e, None))
    }

    /// Renders the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| MprisctlError::Serialize(e.to_string()))
    }

    /// JSON schema of the configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn schema_json() -> Result<String> {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).map_err(|e| MprisctlError::Serialize(e.to_string()))
    }
}
