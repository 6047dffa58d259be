mod action;
mod list;
mod loop_status;
mod position;
mod shuffle;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;

pub use action::ActionCommand;
pub use list::ListCommand;
pub use loop_status::LoopCommand;
pub use position::PositionCommand;
pub use shuffle::ShuffleCommand;

use crate::{
    cli::{BusConnector, CliError, CommandArg, CommandRegistry, types::ArgType},
    services::mpris::{BusClient, MediaError, PlayerAction, PlayerControl, ZbusClient},
};

/// Connects player commands to the session bus
pub struct SessionBus;

#[async_trait]
impl BusConnector for SessionBus {
    async fn connect(&self) -> Result<Arc<dyn BusClient>, MediaError> {
        let client = ZbusClient::connect().await?;
        Ok(Arc::new(client))
    }
}

/// Player control shared by the player commands, connected on first use.
pub struct PlayerContext {
    connector: Arc<dyn BusConnector>,
    control: OnceCell<PlayerControl>,
}

impl PlayerContext {
    /// Create a context that connects through `connector` when first needed.
    pub fn new(connector: Arc<dyn BusConnector>) -> Self {
        Self {
            connector,
            control: OnceCell::new(),
        }
    }

    /// The player controller, connecting if this is the first call.
    ///
    /// # Errors
    /// Returns `CliError::ServiceError` if the bus cannot be reached
    pub async fn control(&self) -> Result<&PlayerControl, CliError> {
        self.control
            .get_or_try_init(|| async {
                let bus = self.connector.connect().await?;
                Ok::<_, MediaError>(PlayerControl::new(bus))
            })
            .await
            .map_err(CliError::from)
    }
}

fn player_arg() -> CommandArg {
    CommandArg {
        name: "player".to_string(),
        description: "Player name without the org.mpris.MediaPlayer2. prefix (e.g., 'spotify')"
            .to_string(),
        required: true,
        value_type: ArgType::String,
    }
}

/// Registers all player commands with the command registry.
///
/// # Arguments
///
/// * `registry` - Mutable reference to the command registry
/// * `connector` - Opens the bus the first time a player command runs
pub fn register_commands(registry: &mut CommandRegistry, connector: Arc<dyn BusConnector>) {
    const CATEGORY_NAME: &str = "player";

    let context = Arc::new(PlayerContext::new(connector));

    for action in [
        PlayerAction::Play,
        PlayerAction::Pause,
        PlayerAction::PlayPause,
        PlayerAction::Stop,
        PlayerAction::Next,
        PlayerAction::Previous,
    ] {
        registry.register_command(
            CATEGORY_NAME,
            Box::new(ActionCommand::new(Arc::clone(&context), action)),
        );
    }

    registry.register_command(CATEGORY_NAME, Box::new(ListCommand::new(Arc::clone(&context))));
    registry.register_command(CATEGORY_NAME, Box::new(LoopCommand::new(Arc::clone(&context))));
    registry.register_command(
        CATEGORY_NAME,
        Box::new(ShuffleCommand::new(Arc::clone(&context))),
    );
    registry.register_command(
        CATEGORY_NAME,
        Box::new(PositionCommand::new(Arc::clone(&context))),
    );
}
