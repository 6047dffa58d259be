use std::{collections::HashMap, sync::Arc};

use crate::config::Config;

use super::{
    CliError, Command,
    commands::{config, player},
    formatting::{format_category, format_command, format_description, format_header, format_usage},
    types::{BusConnector, CommandMetadata},
};

/// Registry for CLI commands organized by category.
///
/// ```text
/// registry
/// ├── config
/// │   ├── schema
/// │   └── show
/// └── player
///     ├── list
///     ├── loop
///     ├── play
///     └── ...
/// ```
pub struct CommandRegistry {
    /// Nested HashMap structure: category name -> (command name -> command implementation)
    categories: HashMap<String, HashMap<String, Box<dyn Command>>>,
    config: Arc<Config>,
    connector: Arc<dyn BusConnector>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    ///
    /// Commands are added with `register_command` or `register_all_commands`.
    pub fn new(config: Arc<Config>, connector: Arc<dyn BusConnector>) -> Self {
        Self {
            categories: HashMap::new(),
            config,
            connector,
        }
    }

    /// Registers a command in the specified category.
    ///
    /// The command's metadata name is its key within the category; an
    /// existing command with the same name is replaced.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(command.metadata().name, command);
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command does not
    /// exist, `CliError::InvalidArguments` if the argument count is wrong, and
    /// whatever the command itself returns.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let found_command = self.find(category, command_name)?;

        Self::validate_args(&found_command.metadata(), args)?;

        found_command.execute(args).await
    }

    /// Lists all registered commands organized by category.
    ///
    /// Categories and commands are sorted alphabetically.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        let mut categories: Vec<(String, Vec<String>)> = self
            .categories
            .iter()
            .map(|(category, commands)| {
                let mut command_list: Vec<String> = commands.keys().cloned().collect();
                command_list.sort();

                (category.clone(), command_list)
            })
            .collect();

        categories.sort();

        categories
    }

    /// Metadata of one command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` if the category or command does not exist
    pub fn metadata(&self, category: &str, command_name: &str) -> Result<CommandMetadata, CliError> {
        self.find(category, command_name)
            .map(|command| command.metadata())
    }

    /// Help text for every category, or for one category when given.
    ///
    /// # Errors
    ///
    /// Returns `CliError::CommandNotFound` for an unknown category
    pub fn help(&self, category: Option<&str>) -> Result<String, CliError> {
        let mut lines = vec![
            format_header("mprisctl"),
            format_usage("usage: mprisctl watch | mprisctl <category> <command> [args]"),
            String::new(),
        ];

        let listing = self.list_commands();
        let shown: Vec<&(String, Vec<String>)> = match category {
            Some(wanted) => {
                let found: Vec<_> = listing.iter().filter(|(name, _)| name == wanted).collect();
                if found.is_empty() {
                    return Err(CliError::CommandNotFound(format!(
                        "Failed to find category '{wanted}'"
                    )));
                }
                found
            }
            None => listing.iter().collect(),
        };

        for (category, commands) in shown {
            lines.push(format_category(category));
            for name in commands {
                let metadata = self.metadata(category, name)?;
                let usage: String = metadata
                    .args
                    .iter()
                    .map(|arg| {
                        if arg.required {
                            format!(" <{}>", arg.name)
                        } else {
                            format!(" [{}]", arg.name)
                        }
                    })
                    .collect();
                lines.push(format!(
                    "  {}{}  {}",
                    format_command(name),
                    usage,
                    format_description(&metadata.description)
                ));
            }
            lines.push(String::new());
        }

        Ok(lines.join("\n").trim_end().to_string())
    }

    fn find(&self, category: &str, command_name: &str) -> Result<&dyn Command, CliError> {
        let found_category = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        let found_command = found_category.get(command_name).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find command '{command_name}'"))
        })?;

        Ok(found_command.as_ref())
    }

    fn validate_args(metadata: &CommandMetadata, args: &[String]) -> Result<(), CliError> {
        let required_count = metadata.args.iter().filter(|arg| arg.required).count();
        let total_count = metadata.args.len();

        if args.len() < required_count {
            let missing = metadata
                .args
                .iter()
                .filter(|arg| arg.required)
                .nth(args.len())
                .map(|arg| arg.name.clone())
                .unwrap_or_default();
            return Err(CliError::MissingArgument {
                arg: missing,
                command: format!("{} {}", metadata.category, metadata.name),
            });
        }

        if args.len() > total_count {
            return Err(CliError::InvalidArguments(format!(
                "Expected at most {} arguments, got {}",
                total_count,
                args.len(),
            )));
        }

        Ok(())
    }

    /// Registers all available CLI commands in their respective categories.
    pub fn register_all_commands(&mut self) {
        config::register_commands(self, Arc::clone(&self.config));
        player::register_commands(self, Arc::clone(&self.connector));
    }
}
