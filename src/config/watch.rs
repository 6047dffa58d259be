use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for `mprisctl watch`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    /// Bus name substrings of players to skip, e.g. `"chromium"`
    pub ignored_players: Vec<String>,

    /// Whether logs are also written to daily-rotated files under
    /// `$HOME/.mprisctl/logs`.
    pub log_to_file: bool,
}
