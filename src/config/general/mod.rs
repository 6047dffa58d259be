mod log_level;

pub use log_level::LogLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// General configuration settings for mprisctl.
///
/// Contains global settings that affect every command, such as logging.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct GeneralConfig {
    /// Logging level for the application.
    #[serde(default)]
    pub log_level: LogLevel,
}
