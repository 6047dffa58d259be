use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    config::Config,
};

/// Command printing the JSON schema of the configuration file
pub struct SchemaCommand;

impl SchemaCommand {
    /// Creates a new SchemaCommand
    pub fn new() -> Self {
        Self
    }
}

impl Default for SchemaCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Command for SchemaCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        Config::schema_json().map_err(|e| CliError::ConfigError(e.to_string()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "schema".to_string(),
            description: "Print the JSON schema of the configuration file".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["mprisctl config schema > mprisctl.schema.json".to_string()],
        }
    }
}
