//! Printable state-change events and their sinks.

use std::fmt;

use super::{
    conversion::format_duration,
    record::PlayerRecord,
    types::{LoopStatus, PlaybackStatus},
};

/// One observed change, rendered as a single `CATEGORY::subject key=value` line
#[derive(Debug, Clone)]
pub enum PresenterEvent {
    /// A player appeared on the bus
    Connected(PlayerRecord),
    /// A player left the bus
    Disconnected(PlayerRecord),
    /// Track metadata changed
    Metadata(PlayerRecord),
    /// One or more capability flags changed
    Capabilities(PlayerRecord),
    /// Playback state changed
    PlaybackStatus {
        /// Short player name
        name: String,
        /// New state, `None` when unknown
        status: Option<PlaybackStatus>,
    },
    /// Shuffle toggled
    Shuffle {
        /// Short player name
        name: String,
        /// Whether shuffle is on
        shuffle: bool,
    },
    /// Loop mode changed
    Loop {
        /// Short player name
        name: String,
        /// New loop mode
        loop_status: LoopStatus,
    },
    /// Periodic position report
    Position {
        /// Short player name
        name: String,
        /// Elapsed microseconds
        elapsed: u64,
        /// Microseconds left in the track
        remaining: u64,
    },
}

/// Receiver of watcher output
pub trait Presenter: Send + Sync {
    /// Emit one event.
    fn present(&self, event: PresenterEvent);
}

/// Writes each event as a line on stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPresenter;

impl Presenter for StdoutPresenter {
    fn present(&self, event: PresenterEvent) {
        println!("{event}");
    }
}

struct MetadataFields<'a>(&'a PlayerRecord);

impl fmt::Display for MetadataFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = &self.0.properties.metadata;
        write!(
            f,
            "owner=\"{}\" artist=\"{}\" title=\"{}\" album=\"{}\" track_id=\"{}\" length={} duration={} url={} art_url={}",
            self.0.owner_id,
            metadata.artist,
            metadata.title,
            metadata.album,
            metadata.track_id,
            metadata.length,
            metadata.duration(),
            metadata.url,
            metadata.art_url,
        )
    }
}

struct CapabilityFields<'a>(&'a PlayerRecord);

impl fmt::Display for CapabilityFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let props = &self.0.properties;
        write!(
            f,
            "can_control={} can_go_next={} can_go_previous={} can_pause={} can_play={} can_seek={}",
            props.can_control,
            props.can_go_next,
            props.can_go_previous,
            props.can_pause,
            props.can_play,
            props.can_seek,
        )
    }
}

struct StatusField(Option<PlaybackStatus>);

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(status) => write!(f, "playback_status={status}"),
            None => f.write_str("playback_status="),
        }
    }
}

fn write_player(f: &mut fmt::Formatter<'_>, state: &str, player: &PlayerRecord) -> fmt::Result {
    let props = &player.properties;
    write!(
        f,
        "PLAYER::{state} player_name={} {} {} {} shuffle={} loop_status={}",
        player.name,
        MetadataFields(player),
        CapabilityFields(player),
        StatusField(props.playback_status),
        props.shuffle,
        props.loop_status,
    )
}

impl fmt::Display for PresenterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected(player) => write_player(f, "connected", player),
            Self::Disconnected(player) => write_player(f, "disconnected", player),
            Self::Metadata(player) => {
                write!(f, "METADATA::{} {}", player.name, MetadataFields(player))
            }
            Self::Capabilities(player) => {
                write!(f, "CAPABILITIES::{} {}", player.name, CapabilityFields(player))
            }
            Self::PlaybackStatus { name, status } => {
                write!(f, "PLAYBACK_STATUS::{name} {}", StatusField(*status))
            }
            Self::Shuffle { name, shuffle } => write!(f, "SHUFFLE::{name} shuffle={shuffle}"),
            Self::Loop { name, loop_status } => write!(f, "LOOP::{name} loop_status={loop_status}"),
            Self::Position {
                name,
                elapsed,
                remaining,
            } => write!(
                f,
                "POSITION::{name} elapsed={} elapsed_raw={elapsed} remaining={} remaining_raw={remaining}",
                format_duration(*elapsed),
                format_duration(*remaining),
            ),
        }
    }
}
