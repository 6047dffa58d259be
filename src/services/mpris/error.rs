use super::PlayerId;

/// Errors that can occur while talking to MPRIS players
#[derive(thiserror::Error, Debug)]
pub enum MediaError {
    /// Player with the given ID was not found on the bus
    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    /// D-Bus communication error
    #[error("D-Bus operation failed: {0}")]
    DbusError(#[from] zbus::Error),

    /// D-Bus daemon call failed
    #[error("D-Bus daemon call failed: {0}")]
    FdoError(#[from] zbus::fdo::Error),

    /// Player does not expose a property
    #[error("Player {player} does not expose {property}")]
    PropertyUnavailable {
        /// Player that was queried
        player: PlayerId,
        /// Property that could not be read
        property: String,
    },

    /// A value could not be sent to the player
    #[error("Invalid value for {property}: {reason}")]
    InvalidValue {
        /// Property or argument being set
        property: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Failed to initialize the media service
    #[error("Failed to initialize media service: {0}")]
    InitializationFailed(String),
}
