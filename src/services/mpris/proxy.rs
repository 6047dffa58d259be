#![allow(missing_docs)]

use std::collections::HashMap;
use zbus::{Result, proxy, zvariant::ObjectPath};

/// MPRIS MediaPlayer2.Player interface proxy
///
/// Used for calls whose arguments the generic bus client cannot express.
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_service = "org.mpris.MediaPlayer2",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait MediaPlayer2Player {
    /// Seek by a relative offset in microseconds
    fn seek(&self, offset: i64) -> Result<()>;

    /// Set absolute playback position in microseconds
    fn set_position(&self, track_id: &ObjectPath<'_>, position: i64) -> Result<()>;

    /// Signal emitted when playback position jumps
    #[zbus(signal)]
    fn seeked(&self, position: i64) -> Result<()>;

    /// Current track metadata
    #[zbus(property)]
    fn metadata(&self) -> Result<HashMap<String, zbus::zvariant::OwnedValue>>;

    /// Current playback position in microseconds
    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> Result<i64>;
}
