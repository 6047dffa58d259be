use std::fmt;

/// Well-known bus name prefix shared by every MPRIS player
pub const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";

/// Object path every MPRIS player exports
pub const MPRIS_PATH: &str = "/org/mpris/MediaPlayer2";

/// Playback control interface
pub const PLAYER_INTERFACE: &str = "org.mpris.MediaPlayer2.Player";

/// Aggregating proxy that re-exports other players; never tracked directly.
pub const AGGREGATOR_SERVICE: &str = "org.mpris.MediaPlayer2.playerctld";

/// Stable identifier for a media player: its well-known bus name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// Create a PlayerId from a D-Bus bus name
    pub fn from_bus_name(bus_name: &str) -> Self {
        Self(bus_name.to_string())
    }

    /// Create a PlayerId from the short player name (`spotify` ->
    /// `org.mpris.MediaPlayer2.spotify`)
    pub fn from_player_name(name: &str) -> Self {
        Self(format!("{MPRIS_PREFIX}{name}"))
    }

    /// Get the D-Bus bus name
    pub fn bus_name(&self) -> &str {
        &self.0
    }

    /// Short player name, or `None` when the bus name is not an MPRIS player.
    pub fn player_name(&self) -> Option<&str> {
        self.0
            .strip_prefix(MPRIS_PREFIX)
            .filter(|name| !name.is_empty())
    }

    /// Whether this is the aggregating proxy service.
    pub fn is_aggregator(&self) -> bool {
        self.0 == AGGREGATOR_SERVICE
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current playback state of a media player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Player is currently playing
    Playing,

    /// Player is paused
    Paused,

    /// Player is stopped
    Stopped,
}

impl From<&str> for PlaybackStatus {
    fn from(status: &str) -> Self {
        match status {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            _ => Self::Stopped,
        }
    }
}

impl From<PlaybackStatus> for &'static str {
    fn from(status: PlaybackStatus) -> Self {
        match status {
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}

/// Loop mode for track or playlist repetition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopStatus {
    /// No looping
    #[default]
    None,

    /// Loop current track
    Track,

    /// Loop entire playlist
    Playlist,
}

impl LoopStatus {
    /// Parse the exact MPRIS spelling, rejecting anything else.
    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "None" => Some(Self::None),
            "Track" => Some(Self::Track),
            "Playlist" => Some(Self::Playlist),
            _ => None,
        }
    }
}

impl From<&str> for LoopStatus {
    fn from(status: &str) -> Self {
        Self::parse(status).unwrap_or_default()
    }
}

impl From<LoopStatus> for &'static str {
    fn from(status: LoopStatus) -> Self {
        match status {
            LoopStatus::None => "None",
            LoopStatus::Track => "Track",
            LoopStatus::Playlist => "Playlist",
        }
    }
}

impl fmt::Display for LoopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str((*self).into())
    }
}
