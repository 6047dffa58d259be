//! Configuration schema and loading.
//!
//! The configuration lives in a single TOML file. Every field has a default,
//! so a missing file or a partial one is always valid.

mod general;
mod loading;
mod paths;
mod watch;

#[cfg(test)]
mod tests;

pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use watch::WatchConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for mprisctl.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Watcher settings.
    #[serde(default)]
    pub watch: WatchConfig,
}
