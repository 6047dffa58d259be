//! zbus-backed [`BusClient`].

use std::collections::HashMap;

use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, instrument, warn};
use zbus::{
    Connection, MatchRule, MessageStream, fdo,
    message::{Message, Type as MessageType},
    names::{BusName, InterfaceName},
    proxy::CacheProperties,
    zvariant::{ObjectPath, OwnedValue, Value},
};

use super::{
    MediaError, MediaPlayer2PlayerProxy, PlayerId,
    bus::{BusClient, Notification, NotificationStream},
    types::{MPRIS_PATH, PLAYER_INTERFACE},
    value::{PropertyValue, property_map},
};

const DBUS_SERVICE: &str = "org.freedesktop.DBus";
const DBUS_PATH: &str = "/org/freedesktop/DBus";
const PROPERTIES_INTERFACE: &str = "org.freedesktop.DBus.Properties";

/// Bus client over a zbus session connection
#[derive(Clone)]
pub struct ZbusClient {
    connection: Connection,
    dbus_proxy: fdo::DBusProxy<'static>,
}

impl ZbusClient {
    /// Connect to the session bus.
    ///
    /// # Errors
    /// Returns `MediaError::InitializationFailed` if the session bus is unreachable
    #[instrument]
    pub async fn connect() -> Result<Self, MediaError> {
        let connection = Connection::session().await.map_err(|e| {
            MediaError::InitializationFailed(format!("D-Bus session connection failed: {e}"))
        })?;
        Self::with_connection(connection).await
    }

    /// Wrap an existing connection.
    ///
    /// # Errors
    /// Returns `MediaError::InitializationFailed` if the bus daemon proxy cannot be created
    pub async fn with_connection(connection: Connection) -> Result<Self, MediaError> {
        let dbus_proxy = fdo::DBusProxy::new(&connection)
            .await
            .map_err(|e| MediaError::InitializationFailed(format!("DBus proxy failed: {e}")))?;
        Ok(Self {
            connection,
            dbus_proxy,
        })
    }

    async fn properties_proxy(
        &self,
        player: &PlayerId,
    ) -> Result<fdo::PropertiesProxy<'_>, MediaError> {
        let proxy = fdo::PropertiesProxy::builder(&self.connection)
            .destination(player.bus_name().to_string())?
            .path(MPRIS_PATH)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        Ok(proxy)
    }

    fn player_rule(player: &PlayerId) -> Result<MatchRule<'_>, MediaError> {
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .sender(player.bus_name())?
            .path(MPRIS_PATH)?
            .build();
        Ok(rule)
    }
}

fn player_interface() -> InterfaceName<'static> {
    InterfaceName::from_static_str_unchecked(PLAYER_INTERFACE)
}

fn bus_name(name: &str) -> Result<BusName<'_>, MediaError> {
    BusName::try_from(name).map_err(|e| MediaError::DbusError(e.into()))
}

fn to_variant(property: &str, value: PropertyValue) -> Result<Value<'static>, MediaError> {
    match value {
        PropertyValue::Bool(b) => Ok(Value::from(b)),
        PropertyValue::Int(n) => Ok(Value::from(n)),
        PropertyValue::UInt(n) => Ok(Value::from(n)),
        PropertyValue::Float(f) => Ok(Value::from(f)),
        PropertyValue::Str(s) => Ok(Value::from(s)),
        PropertyValue::StrList(_) | PropertyValue::Map(_) | PropertyValue::Other => {
            Err(MediaError::InvalidValue {
                property: property.to_string(),
                reason: "only scalar values can be written".to_string(),
            })
        }
    }
}

/// Classify one incoming message. Anything other than the three watched
/// signals yields `None`.
fn decode_notification(message: &Message) -> Option<Notification> {
    let header = message.header();
    if header.message_type() != MessageType::Signal {
        return None;
    }

    let member = header.member()?.as_str();
    let interface = header.interface()?.as_str();
    let sender = header.sender().map(ToString::to_string).unwrap_or_default();

    match (interface, member) {
        (DBUS_SERVICE, "NameOwnerChanged") => {
            let (name, old_owner, new_owner) =
                message.body().deserialize::<(String, String, String)>().ok()?;
            Some(Notification::NameOwnerChanged {
                name,
                old_owner,
                new_owner,
            })
        }
        (PROPERTIES_INTERFACE, "PropertiesChanged") => {
            let (interface, changed, invalidated) = message
                .body()
                .deserialize::<(String, HashMap<String, OwnedValue>, Vec<String>)>()
                .ok()?;

            let mut changed: HashMap<String, Option<PropertyValue>> = property_map(changed)
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect();
            for name in invalidated {
                changed.entry(name).or_insert(None);
            }

            Some(Notification::PropertiesChanged {
                sender,
                interface,
                changed,
            })
        }
        (PLAYER_INTERFACE, "Seeked") => {
            let position = message.body().deserialize::<i64>().ok()?;
            Some(Notification::Seeked { sender, position })
        }
        _ => None,
    }
}

#[async_trait]
impl BusClient for ZbusClient {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let names = self.dbus_proxy.list_names().await?;
        Ok(names.into_iter().map(|name| name.to_string()).collect())
    }

    async fn name_has_owner(&self, name: &str) -> Result<bool, MediaError> {
        Ok(self.dbus_proxy.name_has_owner(bus_name(name)?).await?)
    }

    async fn get_name_owner(&self, name: &str) -> Result<String, MediaError> {
        let owner = self.dbus_proxy.get_name_owner(bus_name(name)?).await?;
        Ok(owner.to_string())
    }

    async fn get_property(&self, player: &PlayerId, property: &str) -> Option<PropertyValue> {
        let proxy = match self.properties_proxy(player).await {
            Ok(proxy) => proxy,
            Err(e) => {
                debug!(player = %player, error = %e, "properties proxy unavailable");
                return None;
            }
        };

        match proxy.get(player_interface(), property).await {
            Ok(value) => Some(PropertyValue::from(&*value)),
            Err(e) => {
                debug!(player = %player, property, error = %e, "property read failed");
                None
            }
        }
    }

    async fn get_all_properties(
        &self,
        player: &PlayerId,
    ) -> Result<HashMap<String, PropertyValue>, MediaError> {
        let proxy = self.properties_proxy(player).await?;
        let values = proxy.get_all(player_interface()).await?;
        Ok(property_map(values))
    }

    async fn set_property(
        &self,
        player: &PlayerId,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), MediaError> {
        let value = to_variant(property, value)?;
        let proxy = self.properties_proxy(player).await?;
        proxy.set(player_interface(), property, value).await?;
        Ok(())
    }

    async fn call_method(&self, player: &PlayerId, method: &str) -> Result<(), MediaError> {
        self.connection
            .call_method(
                Some(player.bus_name()),
                MPRIS_PATH,
                Some(PLAYER_INTERFACE),
                method,
                &(),
            )
            .await?;
        Ok(())
    }

    async fn set_position(
        &self,
        player: &PlayerId,
        track_id: &str,
        position: i64,
    ) -> Result<(), MediaError> {
        let track_id = ObjectPath::try_from(track_id).map_err(|e| MediaError::InvalidValue {
            property: "mpris:trackid".to_string(),
            reason: e.to_string(),
        })?;

        let proxy = MediaPlayer2PlayerProxy::builder(&self.connection)
            .destination(player.bus_name())?
            .path(MPRIS_PATH)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;

        proxy.set_position(&track_id, position).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn subscribe_ownership(&self) -> Result<(), MediaError> {
        let rule = MatchRule::builder()
            .msg_type(MessageType::Signal)
            .sender(DBUS_SERVICE)?
            .interface(DBUS_SERVICE)?
            .member("NameOwnerChanged")?
            .path(DBUS_PATH)?
            .build();

        self.dbus_proxy.add_match_rule(rule).await.map_err(|e| {
            MediaError::InitializationFailed(format!("Signal subscription failed: {e}"))
        })
    }

    #[instrument(skip(self), fields(player = %player))]
    async fn subscribe_player(&self, player: &PlayerId) -> Result<(), MediaError> {
        let rule = Self::player_rule(player)?;
        self.dbus_proxy.add_match_rule(rule).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(player = %player))]
    async fn unsubscribe_player(&self, player: &PlayerId) -> Result<(), MediaError> {
        let rule = Self::player_rule(player)?;
        if let Err(e) = self.dbus_proxy.remove_match_rule(rule).await {
            warn!("Failed to remove match rule: {e}");
        }
        Ok(())
    }

    fn notifications(&self) -> NotificationStream {
        let mut messages = MessageStream::from(&self.connection);

        Box::pin(stream! {
            while let Some(message) = messages.next().await {
                let Ok(message) = message else {
                    continue;
                };
                if let Some(notification) = decode_notification(&message) {
                    yield notification;
                }
            }
        })
    }
}
