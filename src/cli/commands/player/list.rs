use std::sync::Arc;

use async_trait::async_trait;

use crate::cli::{Command, CommandResult, types::CommandMetadata};

use super::PlayerContext;

/// Command listing the MPRIS players currently on the bus
pub struct ListCommand {
    context: Arc<PlayerContext>,
}

impl ListCommand {
    /// Creates a new ListCommand
    pub fn new(context: Arc<PlayerContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Command for ListCommand {
    /// Prints one player name per line, sorted.
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let players = self.context.control().await?.list_players().await?;

        if players.is_empty() {
            return Ok("No media players found".to_string());
        }

        Ok(players.join("\n"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List MPRIS players on the session bus".to_string(),
            category: "player".to_string(),
            args: vec![],
            examples: vec!["mprisctl player list".to_string()],
        }
    }
}
