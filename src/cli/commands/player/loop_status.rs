use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    services::mpris::LoopStatus,
};

use super::{PlayerContext, player_arg};

/// Command reading or setting a player's loop mode
pub struct LoopCommand {
    context: Arc<PlayerContext>,
}

impl LoopCommand {
    /// Creates a new LoopCommand
    pub fn new(context: Arc<PlayerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for LoopCommand {
    /// Prints the loop mode, or sets it when a mode is given.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` for a mode other than `None`,
    /// `Track` or `Playlist`, checked before the bus is touched.
    async fn execute(&self, args: &[String]) -> CommandResult {
        let player = args.first().map(String::as_str).unwrap_or_default();

        let Some(requested) = args.get(1) else {
            let status = self.context.control().await?.loop_status(player).await?;
            return Ok(status.to_string());
        };

        let status = LoopStatus::parse(requested).ok_or_else(|| CliError::InvalidArgument {
            arg: "status".to_string(),
            reason: format!("'{requested}' is not one of None, Track, Playlist"),
        })?;

        self.context
            .control()
            .await?
            .set_loop_status(player, status)
            .await?;

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "loop".to_string(),
            description: "Get or set the loop mode".to_string(),
            category: "player".to_string(),
            args: vec![
                player_arg(),
                CommandArg {
                    name: "status".to_string(),
                    description: "New loop mode: None, Track or Playlist".to_string(),
                    required: false,
                    value_type: ArgType::String,
                },
            ],
            examples: vec![
                "mprisctl player loop spotify".to_string(),
                "mprisctl player loop spotify Playlist".to_string(),
            ],
        }
    }
}
