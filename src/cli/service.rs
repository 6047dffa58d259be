use std::sync::Arc;

use crate::config::Config;

use super::{CliError, CommandRegistry, types::BusConnector};

/// High-level service for managing and executing CLI commands.
///
/// Commands are organized by category and can be listed or executed by name.
/// `help [category]` is answered here rather than by a registered command.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all available commands registered.
    ///
    /// # Arguments
    /// * `config` - Effective configuration, shown by the config commands
    /// * `connector` - Opens the bus for player commands on first use
    pub fn new(config: Config, connector: Arc<dyn BusConnector>) -> Self {
        let mut registry = CommandRegistry::new(Arc::new(config), connector);
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in the
    /// category, or the command's own error if it fails.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        match category {
            "help" | "--help" | "-h" => {
                let wanted = Some(command_name).filter(|name| !name.is_empty());
                self.registry.help(wanted)
            }
            _ if command_name.is_empty() => self.registry.help(Some(category)),
            _ => self.registry.execute(category, command_name, args).await,
        }
    }

    /// Lists all available commands organized by category.
    ///
    /// # Returns
    /// Vector of (category_name, command_names) tuples
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }
}
