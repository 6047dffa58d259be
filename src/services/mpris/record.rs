//! In-memory mirror of one player's properties.

use std::{collections::HashMap, sync::Arc};

use bitflags::bitflags;
use tokio::sync::RwLock;

use super::{
    conversion::{self, store},
    metadata::TrackMetadata,
    types::{LoopStatus, PlaybackStatus, PlayerId},
    value::PropertyValue,
};

/// A player record shared between the dispatcher and its ticker task
pub type SharedPlayer = Arc<RwLock<PlayerRecord>>;

/// Batch of property updates; `None` marks an invalidated property.
pub type PropertyBatch = HashMap<String, Option<PropertyValue>>;

/// Properties of the `org.mpris.MediaPlayer2.Player` interface the watcher
/// tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// `CanControl`
    CanControl,
    /// `CanGoNext`
    CanGoNext,
    /// `CanGoPrevious`
    CanGoPrevious,
    /// `CanPause`
    CanPause,
    /// `CanPlay`
    CanPlay,
    /// `CanSeek`
    CanSeek,
    /// `LoopStatus`
    LoopStatus,
    /// `MaximumRate`
    MaximumRate,
    /// `MinimumRate`
    MinimumRate,
    /// `Metadata`
    Metadata,
    /// `PlaybackStatus`
    PlaybackStatus,
    /// `Position`
    Position,
    /// `Rate`
    Rate,
    /// `Shuffle`
    Shuffle,
    /// `Volume`
    Volume,
}

impl Field {
    /// Every tracked field.
    pub const ALL: [Field; 15] = [
        Field::CanControl,
        Field::CanGoNext,
        Field::CanGoPrevious,
        Field::CanPause,
        Field::CanPlay,
        Field::CanSeek,
        Field::LoopStatus,
        Field::MaximumRate,
        Field::MinimumRate,
        Field::Metadata,
        Field::PlaybackStatus,
        Field::Position,
        Field::Rate,
        Field::Shuffle,
        Field::Volume,
    ];

    /// Look up a field by its D-Bus property name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// D-Bus property name.
    pub fn name(self) -> &'static str {
        match self {
            Field::CanControl => "CanControl",
            Field::CanGoNext => "CanGoNext",
            Field::CanGoPrevious => "CanGoPrevious",
            Field::CanPause => "CanPause",
            Field::CanPlay => "CanPlay",
            Field::CanSeek => "CanSeek",
            Field::LoopStatus => "LoopStatus",
            Field::MaximumRate => "MaximumRate",
            Field::MinimumRate => "MinimumRate",
            Field::Metadata => "Metadata",
            Field::PlaybackStatus => "PlaybackStatus",
            Field::Position => "Position",
            Field::Rate => "Rate",
            Field::Shuffle => "Shuffle",
            Field::Volume => "Volume",
        }
    }

    /// Flag reported in [`ChangedFields`] when this field changes.
    pub fn flag(self) -> ChangedFields {
        match self {
            Field::CanControl => ChangedFields::CAN_CONTROL,
            Field::CanGoNext => ChangedFields::CAN_GO_NEXT,
            Field::CanGoPrevious => ChangedFields::CAN_GO_PREVIOUS,
            Field::CanPause => ChangedFields::CAN_PAUSE,
            Field::CanPlay => ChangedFields::CAN_PLAY,
            Field::CanSeek => ChangedFields::CAN_SEEK,
            Field::LoopStatus => ChangedFields::LOOP_STATUS,
            Field::MaximumRate => ChangedFields::MAXIMUM_RATE,
            Field::MinimumRate => ChangedFields::MINIMUM_RATE,
            Field::Metadata => ChangedFields::METADATA,
            Field::PlaybackStatus => ChangedFields::PLAYBACK_STATUS,
            Field::Position => ChangedFields::POSITION,
            Field::Rate => ChangedFields::RATE,
            Field::Shuffle => ChangedFields::SHUFFLE,
            Field::Volume => ChangedFields::VOLUME,
        }
    }
}

bitflags! {
    /// Set of fields a merge reported as changed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ChangedFields: u16 {
        /// `CanControl` changed.
        const CAN_CONTROL = 1 << 0;
        /// `CanGoNext` changed.
        const CAN_GO_NEXT = 1 << 1;
        /// `CanGoPrevious` changed.
        const CAN_GO_PREVIOUS = 1 << 2;
        /// `CanPause` changed.
        const CAN_PAUSE = 1 << 3;
        /// `CanPlay` changed.
        const CAN_PLAY = 1 << 4;
        /// `CanSeek` changed.
        const CAN_SEEK = 1 << 5;
        /// `LoopStatus` changed.
        const LOOP_STATUS = 1 << 6;
        /// `MaximumRate` changed.
        const MAXIMUM_RATE = 1 << 7;
        /// `MinimumRate` changed.
        const MINIMUM_RATE = 1 << 8;
        /// `Metadata` changed.
        const METADATA = 1 << 9;
        /// `PlaybackStatus` changed.
        const PLAYBACK_STATUS = 1 << 10;
        /// `Position` changed.
        const POSITION = 1 << 11;
        /// `Rate` changed.
        const RATE = 1 << 12;
        /// `Shuffle` changed.
        const SHUFFLE = 1 << 13;
        /// `Volume` changed.
        const VOLUME = 1 << 14;

        /// Any of the capability flags changed.
        const CAPABILITIES = Self::CAN_CONTROL.bits()
            | Self::CAN_GO_NEXT.bits()
            | Self::CAN_GO_PREVIOUS.bits()
            | Self::CAN_PAUSE.bits()
            | Self::CAN_PLAY.bits()
            | Self::CAN_SEEK.bits();
    }
}

/// Typed player properties, each holding a real value or its default
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProperties {
    /// Whether the player can be controlled
    pub can_control: bool,
    /// Whether the player can skip to the next track
    pub can_go_next: bool,
    /// Whether the player can skip to the previous track
    pub can_go_previous: bool,
    /// Whether the player can pause
    pub can_pause: bool,
    /// Whether the player can start playback
    pub can_play: bool,
    /// Whether the player supports seeking
    pub can_seek: bool,
    /// Current loop mode
    pub loop_status: LoopStatus,
    /// Maximum playback rate
    pub maximum_rate: f64,
    /// Minimum playback rate
    pub minimum_rate: f64,
    /// Current track metadata
    pub metadata: TrackMetadata,
    /// Playback state; unknown until the player first reports it
    pub playback_status: Option<PlaybackStatus>,
    /// Playback position in microseconds
    pub position: u64,
    /// Playback rate
    pub rate: f64,
    /// Whether shuffle is enabled
    pub shuffle: bool,
    /// Volume level
    pub volume: f64,
}

impl PlayerProperties {
    /// Reset one field to its default.
    fn reset(&mut self, field: Field) {
        let defaults = Self::default();
        match field {
            Field::CanControl => self.can_control = defaults.can_control,
            Field::CanGoNext => self.can_go_next = defaults.can_go_next,
            Field::CanGoPrevious => self.can_go_previous = defaults.can_go_previous,
            Field::CanPause => self.can_pause = defaults.can_pause,
            Field::CanPlay => self.can_play = defaults.can_play,
            Field::CanSeek => self.can_seek = defaults.can_seek,
            Field::LoopStatus => self.loop_status = defaults.loop_status,
            Field::MaximumRate => self.maximum_rate = defaults.maximum_rate,
            Field::MinimumRate => self.minimum_rate = defaults.minimum_rate,
            Field::Metadata => self.metadata = defaults.metadata,
            Field::PlaybackStatus => self.playback_status = defaults.playback_status,
            Field::Position => self.position = defaults.position,
            Field::Rate => self.rate = defaults.rate,
            Field::Shuffle => self.shuffle = defaults.shuffle,
            Field::Volume => self.volume = defaults.volume,
        }
    }

    /// Decode and store one payload. Returns whether the field was present.
    fn apply(&mut self, field: Field, value: &PropertyValue) -> bool {
        let value = Some(value);
        match field {
            Field::CanControl => store(&mut self.can_control, conversion::to_bool(value)),
            Field::CanGoNext => store(&mut self.can_go_next, conversion::to_bool(value)),
            Field::CanGoPrevious => store(&mut self.can_go_previous, conversion::to_bool(value)),
            Field::CanPause => store(&mut self.can_pause, conversion::to_bool(value)),
            Field::CanPlay => store(&mut self.can_play, conversion::to_bool(value)),
            Field::CanSeek => store(&mut self.can_seek, conversion::to_bool(value)),
            Field::LoopStatus => store(&mut self.loop_status, conversion::to_loop_status(value)),
            Field::MaximumRate => store(&mut self.maximum_rate, conversion::to_f64(value)),
            Field::MinimumRate => store(&mut self.minimum_rate, conversion::to_f64(value)),
            Field::PlaybackStatus => {
                store(&mut self.playback_status, conversion::to_playback_status(value))
            }
            Field::Position => store(&mut self.position, conversion::to_u64(value)),
            Field::Rate => store(&mut self.rate, conversion::to_f64(value)),
            Field::Shuffle => store(&mut self.shuffle, conversion::to_bool(value)),
            Field::Volume => store(&mut self.volume, conversion::to_f64(value)),
            Field::Metadata => {
                match value {
                    Some(PropertyValue::Map(entries)) => {
                        self.metadata.merge(entries);
                    }
                    _ => self.metadata = TrackMetadata::default(),
                }
                true
            }
        }
    }
}

/// One media player known to the watcher
#[derive(Debug, Clone)]
pub struct PlayerRecord {
    /// Short name derived from the well-known bus name
    pub name: String,
    /// Unique bus name of the current owner
    pub owner_id: String,
    /// Well-known bus name
    pub service_id: PlayerId,
    /// Mirrored properties
    pub properties: PlayerProperties,
}

impl PlayerRecord {
    /// Create a record with default properties.
    pub fn new(name: impl Into<String>, owner_id: impl Into<String>, service_id: PlayerId) -> Self {
        Self {
            name: name.into(),
            owner_id: owner_id.into(),
            service_id,
            properties: PlayerProperties::default(),
        }
    }

    /// Apply a batch of property updates.
    ///
    /// Unknown names are skipped. A `None` entry resets its field to the
    /// default without reporting a change; a present entry is decoded, stored
    /// and reported. Fields absent from the batch keep their values.
    pub fn merge(&mut self, batch: &PropertyBatch) -> ChangedFields {
        let mut changed = ChangedFields::empty();

        for (name, value) in batch {
            let Some(field) = Field::from_name(name) else {
                continue;
            };

            match value {
                None => self.properties.reset(field),
                Some(value) => {
                    if self.properties.apply(field, value) {
                        changed |= field.flag();
                    }
                }
            }
        }

        changed
    }

    /// Microseconds left in the current track.
    pub fn remaining(&self) -> u64 {
        self.properties
            .metadata
            .length
            .saturating_sub(self.properties.position)
    }
}
