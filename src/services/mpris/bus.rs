use std::{collections::HashMap, pin::Pin};

use async_trait::async_trait;
use futures::Stream;

use super::{MediaError, PlayerId, value::PropertyValue};

/// Ordered stream of bus notifications
pub type NotificationStream = Pin<Box<dyn Stream<Item = Notification> + Send>>;

/// Typed notification delivered by the bus client
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// `org.freedesktop.DBus.NameOwnerChanged`
    NameOwnerChanged {
        /// Well-known name whose owner changed
        name: String,
        /// Previous unique owner, empty when the name was unowned
        old_owner: String,
        /// New unique owner, empty when the name was released
        new_owner: String,
    },

    /// `org.freedesktop.DBus.Properties.PropertiesChanged`
    PropertiesChanged {
        /// Unique bus name of the emitting connection
        sender: String,
        /// Interface whose properties changed
        interface: String,
        /// Changed values; invalidated properties map to `None`
        changed: HashMap<String, Option<PropertyValue>>,
    },

    /// `org.mpris.MediaPlayer2.Player.Seeked`
    Seeked {
        /// Unique bus name of the emitting connection
        sender: String,
        /// New absolute position in microseconds
        position: i64,
    },
}

#[async_trait]
/// Session bus operations the watcher and commands rely on
///
/// Implemented over zbus for real use and by in-memory fakes in tests.
pub trait BusClient: Send + Sync {
    /// All names currently registered on the bus.
    async fn list_names(&self) -> Result<Vec<String>, MediaError>;

    /// Whether `name` currently has an owner.
    async fn name_has_owner(&self, name: &str) -> Result<bool, MediaError>;

    /// Unique bus name owning `name`.
    async fn get_name_owner(&self, name: &str) -> Result<String, MediaError>;

    /// Read one property of the player interface. `None` when the player does
    /// not expose it or the read fails.
    async fn get_property(&self, player: &PlayerId, property: &str) -> Option<PropertyValue>;

    /// Read every property of the player interface.
    async fn get_all_properties(
        &self,
        player: &PlayerId,
    ) -> Result<HashMap<String, PropertyValue>, MediaError>;

    /// Write one property of the player interface.
    async fn set_property(
        &self,
        player: &PlayerId,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), MediaError>;

    /// Invoke an argument-less method of the player interface.
    async fn call_method(&self, player: &PlayerId, method: &str) -> Result<(), MediaError>;

    /// Jump to an absolute position within the track identified by `track_id`.
    async fn set_position(
        &self,
        player: &PlayerId,
        track_id: &str,
        position: i64,
    ) -> Result<(), MediaError>;

    /// Start receiving ownership changes for every bus name.
    async fn subscribe_ownership(&self) -> Result<(), MediaError>;

    /// Start receiving property and seek notifications from `player`.
    async fn subscribe_player(&self, player: &PlayerId) -> Result<(), MediaError>;

    /// Stop receiving notifications from `player`.
    async fn unsubscribe_player(&self, player: &PlayerId) -> Result<(), MediaError>;

    /// The single ordered notification stream.
    fn notifications(&self) -> NotificationStream;
}
