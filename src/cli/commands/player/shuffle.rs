use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::{
    CliError, Command, CommandResult,
    types::{ArgType, CommandArg, CommandMetadata},
};

use super::{PlayerContext, player_arg};

/// Command reading or toggling shuffle
pub struct ShuffleCommand {
    context: Arc<PlayerContext>,
}

impl ShuffleCommand {
    /// Creates a new ShuffleCommand
    pub fn new(context: Arc<PlayerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for ShuffleCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let player = args.first().map(String::as_str).unwrap_or_default();

        let Some(requested) = args.get(1) else {
            let shuffle = self.context.control().await?.shuffle(player).await?;
            return Ok(shuffle.to_string());
        };

        let shuffle = requested
            .parse::<bool>()
            .map_err(|_| CliError::InvalidArgument {
                arg: "enabled".to_string(),
                reason: format!("'{requested}' is not true or false"),
            })?;

        self.context
            .control()
            .await?
            .set_shuffle(player, shuffle)
            .await?;

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "shuffle".to_string(),
            description: "Get or set shuffle".to_string(),
            category: "player".to_string(),
            args: vec![
                player_arg(),
                CommandArg {
                    name: "enabled".to_string(),
                    description: "true or false".to_string(),
                    required: false,
                    value_type: ArgType::Boolean,
                },
            ],
            examples: vec![
                "mprisctl player shuffle spotify".to_string(),
                "mprisctl player shuffle spotify true".to_string(),
            ],
        }
    }
}
