use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::{
    CliError, Command, CommandResult,
    types::{ArgType, CommandArg, CommandMetadata},
};

use super::{PlayerContext, player_arg};

/// Command reading or setting the playback position in microseconds
///
/// Setting uses `SetPosition` with the current track id, so the jump is
/// absolute and is ignored by the player if the track changed meanwhile.
pub struct PositionCommand {
    context: Arc<PlayerContext>,
}

impl PositionCommand {
    /// Creates a new PositionCommand
    pub fn new(context: Arc<PlayerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for PositionCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let player = args.first().map(String::as_str).unwrap_or_default();

        let Some(requested) = args.get(1) else {
            let position = self.context.control().await?.position(player).await?;
            return Ok(position.to_string());
        };

        let position = requested
            .parse::<i64>()
            .ok()
            .filter(|position| *position >= 0)
            .ok_or_else(|| CliError::InvalidArgument {
                arg: "microseconds".to_string(),
                reason: format!("'{requested}' is not a non-negative integer"),
            })?;

        self.context
            .control()
            .await?
            .set_position(player, position)
            .await?;

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "position".to_string(),
            description: "Get or set the playback position in microseconds".to_string(),
            category: "player".to_string(),
            args: vec![
                player_arg(),
                CommandArg {
                    name: "microseconds".to_string(),
                    description: "Absolute position within the current track".to_string(),
                    required: false,
                    value_type: ArgType::Number,
                },
            ],
            examples: vec![
                "mprisctl player position spotify".to_string(),
                "mprisctl player position spotify 90000000".to_string(),
            ],
        }
    }
}
