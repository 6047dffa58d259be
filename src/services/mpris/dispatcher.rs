use std::{sync::Arc, time::Duration};

use futures::StreamExt;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, trace, warn};

use super::{
    MediaError,
    bus::{BusClient, Notification},
    conversion::delay_to_period_boundary,
    presenter::{Presenter, PresenterEvent},
    record::{ChangedFields, PropertyBatch},
    registry::PlayerRegistry,
    types::PLAYER_INTERFACE,
};

/// Interval between position reports while a player is playing
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Event-driven synchronizer keeping a mirror of every player on the bus
///
/// Drains one ordered notification stream and applies each notification to
/// the registry before taking the next, so all registry mutations happen on a
/// single task.
pub struct PlayerWatcher {
    bus: Arc<dyn BusClient>,
    presenter: Arc<dyn Presenter>,
    registry: PlayerRegistry,
}

impl PlayerWatcher {
    /// Create a watcher ticking once per second.
    pub fn new(
        bus: Arc<dyn BusClient>,
        presenter: Arc<dyn Presenter>,
        ignored_players: Vec<String>,
    ) -> Self {
        Self::with_tick_period(bus, presenter, ignored_players, TICK_PERIOD)
    }

    /// Create a watcher with a custom tick period.
    pub fn with_tick_period(
        bus: Arc<dyn BusClient>,
        presenter: Arc<dyn Presenter>,
        ignored_players: Vec<String>,
        tick_period: Duration,
    ) -> Self {
        let registry = PlayerRegistry::new(
            Arc::clone(&bus),
            Arc::clone(&presenter),
            ignored_players,
            tick_period,
        );
        Self {
            bus,
            presenter,
            registry,
        }
    }

    /// Registry of tracked players.
    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    /// Subscribe, seed the players already on the bus, then handle
    /// notifications until the stream ends.
    ///
    /// # Errors
    /// Returns error if the ownership subscription or the initial enumeration fails
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<(), MediaError> {
        self.bus.subscribe_ownership().await?;
        let mut notifications = self.bus.notifications();

        self.seed().await?;
        info!(players = self.registry.len(), "Watching MPRIS players");

        while let Some(notification) = notifications.next().await {
            self.handle(notification).await;
        }

        info!("Notification stream closed");
        Ok(())
    }

    /// Register every player currently on the bus and announce it.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    #[instrument(skip(self))]
    pub async fn seed(&mut self) -> Result<(), MediaError> {
        let period = self.registry.tick_period();

        for record in self.registry.enumerate().await? {
            let service_id = record.service_id.clone();
            let status = record.properties.playback_status;
            let delay = delay_to_period_boundary(record.properties.position, period);

            self.presenter
                .present(PresenterEvent::Connected(record.clone()));

            if let Err(e) = self.registry.register(Arc::new(RwLock::new(record))).await {
                warn!(player = %service_id, error = %e, "Failed to subscribe to player");
            }
            self.registry.retime(&service_id, status, delay);
        }

        Ok(())
    }

    /// Apply one notification.
    pub async fn handle(&mut self, notification: Notification) {
        match notification {
            Notification::NameOwnerChanged {
                name,
                old_owner,
                new_owner,
            } => self.on_name_owner_changed(&name, &old_owner, &new_owner).await,
            Notification::PropertiesChanged {
                sender,
                interface,
                changed,
            } => self.on_properties_changed(&sender, &interface, &changed).await,
            Notification::Seeked { sender, position } => self.on_seeked(&sender, position).await,
        }
    }

    async fn on_name_owner_changed(&mut self, name: &str, old_owner: &str, new_owner: &str) {
        let owner = if new_owner.is_empty() {
            old_owner
        } else {
            new_owner
        };
        let Some(player) = self.registry.resolve_from_signal(owner, name) else {
            return;
        };

        let has_owner = self.bus.name_has_owner(name).await.unwrap_or_else(|e| {
            warn!(player = name, error = %e, "Failed to query name owner");
            false
        });

        if has_owner {
            if let Err(e) = self.registry.register(Arc::clone(&player)).await {
                warn!(player = name, error = %e, "Failed to subscribe to player");
            }

            let service_id = player.read().await.service_id.clone();
            let snapshot = self.registry.snapshot(&service_id).await;
            let record = {
                let mut record = player.write().await;
                record.merge(&snapshot);
                record.clone()
            };

            info!(player = %service_id, owner, "Player connected");
            let status = record.properties.playback_status;
            let delay =
                delay_to_period_boundary(record.properties.position, self.registry.tick_period());
            self.presenter.present(PresenterEvent::Connected(record));
            self.registry.retime(&service_id, status, delay);
        } else {
            if let Err(e) = self.registry.unregister(&player).await {
                warn!(player = name, error = %e, "Failed to unsubscribe from player");
            }

            let record = player.read().await.clone();
            info!(player = name, owner, "Player disconnected");
            self.presenter.present(PresenterEvent::Disconnected(record));
        }
    }

    async fn on_properties_changed(
        &mut self,
        sender: &str,
        interface: &str,
        changed: &PropertyBatch,
    ) {
        if interface != PLAYER_INTERFACE {
            return;
        }
        let Some(player) = self.registry.find_by_owner(sender) else {
            trace!(sender, "properties changed for unknown sender");
            return;
        };

        let (record, fields) = {
            let mut record = player.write().await;
            let fields = record.merge(changed);
            (record.clone(), fields)
        };
        debug!(player = %record.service_id, ?fields, "properties changed");

        let name = &record.name;
        let props = &record.properties;

        if fields.contains(ChangedFields::METADATA) {
            self.presenter
                .present(PresenterEvent::Metadata(record.clone()));
        }
        if fields.contains(ChangedFields::PLAYBACK_STATUS) {
            self.presenter.present(PresenterEvent::PlaybackStatus {
                name: name.clone(),
                status: props.playback_status,
            });
        }
        if fields.contains(ChangedFields::SHUFFLE) {
            self.presenter.present(PresenterEvent::Shuffle {
                name: name.clone(),
                shuffle: props.shuffle,
            });
        }
        if fields.contains(ChangedFields::LOOP_STATUS) {
            self.presenter.present(PresenterEvent::Loop {
                name: name.clone(),
                loop_status: props.loop_status,
            });
        }

        if fields.intersects(ChangedFields::POSITION | ChangedFields::PLAYBACK_STATUS) {
            self.registry
                .retime(&record.service_id, props.playback_status, Duration::ZERO);
        }

        if fields.intersects(ChangedFields::CAPABILITIES) {
            self.presenter
                .present(PresenterEvent::Capabilities(record.clone()));
        }
    }

    async fn on_seeked(&mut self, sender: &str, position: i64) {
        let Some(player) = self.registry.find_by_owner(sender) else {
            trace!(sender, "seek from unknown sender");
            return;
        };

        let position = u64::try_from(position).unwrap_or(0);
        let (service_id, status) = {
            let mut record = player.write().await;
            record.properties.position = position;
            (record.service_id.clone(), record.properties.playback_status)
        };

        let delay = delay_to_period_boundary(position, self.registry.tick_period());
        debug!(player = %service_id, position, ?delay, "player seeked");
        self.registry.realign(&service_id, status, delay);
    }
}
