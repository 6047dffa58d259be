use std::sync::Arc;

use tracing::instrument;

use super::{
    MediaError, PlayerId,
    bus::BusClient,
    conversion,
    record::Field,
    types::LoopStatus,
    value::PropertyValue,
};

/// Argument-less playback actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between playing and paused
    PlayPause,
    /// Stop playback
    Stop,
    /// Skip to the next track
    Next,
    /// Skip to the previous track
    Previous,
}

impl PlayerAction {
    /// D-Bus method implementing the action.
    pub fn method(self) -> &'static str {
        match self {
            PlayerAction::Play => "Play",
            PlayerAction::Pause => "Pause",
            PlayerAction::PlayPause => "PlayPause",
            PlayerAction::Stop => "Stop",
            PlayerAction::Next => "Next",
            PlayerAction::Previous => "Previous",
        }
    }
}

/// One-shot control of a named player
pub struct PlayerControl {
    bus: Arc<dyn BusClient>,
}

impl PlayerControl {
    /// Create a controller over a bus client.
    pub fn new(bus: Arc<dyn BusClient>) -> Self {
        Self { bus }
    }

    /// Short names of every player on the bus, excluding the aggregator.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    pub async fn list_players(&self) -> Result<Vec<String>, MediaError> {
        let mut players: Vec<String> = self
            .bus
            .list_names()
            .await?
            .into_iter()
            .map(|name| PlayerId::from_bus_name(&name))
            .filter(|id| !id.is_aggregator())
            .filter_map(|id| id.player_name().map(str::to_string))
            .collect();
        players.sort();
        Ok(players)
    }

    /// Perform a playback action.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or rejects the call
    #[instrument(skip(self))]
    pub async fn perform(&self, player: &str, action: PlayerAction) -> Result<(), MediaError> {
        let id = self.require(player).await?;
        self.bus.call_method(&id, action.method()).await
    }

    /// Current loop mode.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or does not expose the property
    pub async fn loop_status(&self, player: &str) -> Result<LoopStatus, MediaError> {
        let value = self.read(player, Field::LoopStatus).await?;
        Ok(conversion::to_loop_status(Some(&value)).value)
    }

    /// Change the loop mode.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or rejects the value
    #[instrument(skip(self))]
    pub async fn set_loop_status(&self, player: &str, status: LoopStatus) -> Result<(), MediaError> {
        let status: &'static str = status.into();
        self.write(player, Field::LoopStatus, PropertyValue::Str(status.to_string()))
            .await
    }

    /// Whether shuffle is on.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or does not expose the property
    pub async fn shuffle(&self, player: &str) -> Result<bool, MediaError> {
        let value = self.read(player, Field::Shuffle).await?;
        Ok(conversion::to_bool(Some(&value)).value)
    }

    /// Turn shuffle on or off.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or rejects the value
    #[instrument(skip(self))]
    pub async fn set_shuffle(&self, player: &str, shuffle: bool) -> Result<(), MediaError> {
        self.write(player, Field::Shuffle, PropertyValue::Bool(shuffle))
            .await
    }

    /// Playback position in microseconds.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus or does not expose the property
    pub async fn position(&self, player: &str) -> Result<u64, MediaError> {
        let value = self.read(player, Field::Position).await?;
        Ok(conversion::to_u64(Some(&value)).value)
    }

    /// Jump to an absolute position within the current track.
    ///
    /// # Errors
    /// Returns error if the player is not on the bus, has no current track, or
    /// rejects the position
    #[instrument(skip(self))]
    pub async fn set_position(&self, player: &str, position: i64) -> Result<(), MediaError> {
        let id = self.require(player).await?;

        let track_id = match self.bus.get_property(&id, Field::Metadata.name()).await {
            Some(PropertyValue::Map(metadata)) => {
                conversion::to_string(metadata.get("mpris:trackid")).value
            }
            _ => String::new(),
        };
        if track_id.is_empty() {
            return Err(MediaError::PropertyUnavailable {
                player: id,
                property: "mpris:trackid".to_string(),
            });
        }

        self.bus.set_position(&id, &track_id, position).await
    }

    async fn require(&self, player: &str) -> Result<PlayerId, MediaError> {
        let id = PlayerId::from_player_name(player);
        if self.bus.name_has_owner(id.bus_name()).await? {
            Ok(id)
        } else {
            Err(MediaError::PlayerNotFound(id))
        }
    }

    async fn read(&self, player: &str, field: Field) -> Result<PropertyValue, MediaError> {
        let id = self.require(player).await?;
        match self.bus.get_property(&id, field.name()).await {
            Some(value) => Ok(value),
            None => Err(MediaError::PropertyUnavailable {
                player: id,
                property: field.name().to_string(),
            }),
        }
    }

    async fn write(
        &self,
        player: &str,
        field: Field,
        value: PropertyValue,
    ) -> Result<(), MediaError> {
        let id = self.require(player).await?;
        self.bus.set_property(&id, field.name(), value).await
    }
}
