use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{Command, CommandResult, types::CommandMetadata},
    services::mpris::PlayerAction,
};

use super::{PlayerContext, player_arg};

/// Command invoking one argument-less playback method
///
/// One instance is registered per action (`play`, `pause`, `play-pause`,
/// `stop`, `next`, `previous`).
pub struct ActionCommand {
    context: Arc<PlayerContext>,
    action: PlayerAction,
}

impl ActionCommand {
    /// Creates a command performing `action`.
    pub fn new(context: Arc<PlayerContext>, action: PlayerAction) -> Self {
        Self { context, action }
    }

    fn name(&self) -> &'static str {
        match self.action {
            PlayerAction::Play => "play",
            PlayerAction::Pause => "pause",
            PlayerAction::PlayPause => "play-pause",
            PlayerAction::Stop => "stop",
            PlayerAction::Next => "next",
            PlayerAction::Previous => "previous",
        }
    }

    fn description(&self) -> &'static str {
        match self.action {
            PlayerAction::Play => "Start playback",
            PlayerAction::Pause => "Pause playback",
            PlayerAction::PlayPause => "Toggle between playing and paused",
            PlayerAction::Stop => "Stop playback",
            PlayerAction::Next => "Skip to the next track",
            PlayerAction::Previous => "Go back to the previous track",
        }
    }
}

#[async_trait]
impl Command for ActionCommand {
    async fn execute(&self, args: &[String]) -> CommandResult {
        let player = args.first().map(String::as_str).unwrap_or_default();

        self.context
            .control()
            .await?
            .perform(player, self.action)
            .await?;

        Ok(String::new())
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: self.name().to_string(),
            description: self.description().to_string(),
            category: "player".to_string(),
            args: vec![player_arg()],
            examples: vec![format!("mprisctl player {} spotify", self.name())],
        }
    }
}
