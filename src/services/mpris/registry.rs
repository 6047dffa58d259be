use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    MediaError, PlayerId,
    bus::BusClient,
    conversion,
    presenter::{Presenter, PresenterEvent},
    record::{Field, PlayerRecord, PropertyBatch, SharedPlayer},
    ticker::{ResumableTicker, TickCallback},
    types::PlaybackStatus,
};

/// Known players keyed by owner, and their tickers keyed by service
///
/// Mutated only from the dispatcher's sequential path; tick callbacks touch
/// nothing but their own record.
pub struct PlayerRegistry {
    bus: Arc<dyn BusClient>,
    presenter: Arc<dyn Presenter>,
    players: HashMap<String, SharedPlayer>,
    owners: HashMap<PlayerId, String>,
    tickers: HashMap<PlayerId, ResumableTicker>,
    ignored_players: Vec<String>,
    tick_period: Duration,
}

impl PlayerRegistry {
    /// Create an empty registry.
    pub fn new(
        bus: Arc<dyn BusClient>,
        presenter: Arc<dyn Presenter>,
        ignored_players: Vec<String>,
        tick_period: Duration,
    ) -> Self {
        Self {
            bus,
            presenter,
            players: HashMap::new(),
            owners: HashMap::new(),
            tickers: HashMap::new(),
            ignored_players,
            tick_period,
        }
    }

    /// Period of every ticker this registry creates.
    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Whether a bus name should never be tracked.
    pub fn should_ignore_player(&self, bus_name: &str) -> bool {
        PlayerId::from_bus_name(bus_name).is_aggregator()
            || self
                .ignored_players
                .iter()
                .any(|pattern| bus_name.contains(pattern.as_str()))
    }

    /// Record registered under `owner`.
    pub fn find_by_owner(&self, owner: &str) -> Option<SharedPlayer> {
        self.players.get(owner).cloned()
    }

    /// Number of registered players.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether no players are registered.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Ticker for a service.
    pub fn ticker(&self, service_id: &PlayerId) -> Option<&ResumableTicker> {
        self.tickers.get(service_id)
    }

    /// Resolve the record an ownership change refers to.
    ///
    /// Returns the record already registered under `owner`, or a fresh
    /// unregistered one named after `subject`. `None` when `subject` is not a
    /// media player or is ignored.
    pub fn resolve_from_signal(&self, owner: &str, subject: &str) -> Option<SharedPlayer> {
        let service_id = PlayerId::from_bus_name(subject);
        let name = service_id.player_name()?.to_string();

        if self.should_ignore_player(subject) {
            debug!(player = subject, "ignoring player");
            return None;
        }

        if let Some(existing) = self.players.get(owner) {
            return Some(Arc::clone(existing));
        }

        Some(Arc::new(RwLock::new(PlayerRecord::new(
            name, owner, service_id,
        ))))
    }

    /// Track a player: store its record, create its ticker and subscribe to
    /// its notifications. A previous registration of the same service is
    /// replaced.
    ///
    /// # Errors
    /// Returns error if the bus subscription fails; the player stays tracked
    #[instrument(skip(self, player))]
    pub async fn register(&mut self, player: SharedPlayer) -> Result<(), MediaError> {
        let (owner, service_id) = {
            let record = player.read().await;
            (record.owner_id.clone(), record.service_id.clone())
        };

        let stale_owner = self.owners.insert(service_id.clone(), owner.clone());
        if let Some(stale_owner) = stale_owner.filter(|stale| *stale != owner) {
            debug!(player = %service_id, stale_owner, "replacing stale registration");
            self.players.remove(&stale_owner);
        }

        let callback = self.position_callback(Arc::clone(&player), service_id.clone());
        if let Some(mut stale) = self
            .tickers
            .insert(service_id.clone(), ResumableTicker::new(self.tick_period, callback))
        {
            stale.stop();
        }

        self.players.insert(owner, player);
        self.bus.subscribe_player(&service_id).await
    }

    /// Stop tracking a player: drop its record and ticker and unsubscribe.
    ///
    /// # Errors
    /// Returns error if the bus unsubscription fails
    #[instrument(skip(self, player))]
    pub async fn unregister(&mut self, player: &SharedPlayer) -> Result<(), MediaError> {
        let (owner, service_id) = {
            let record = player.read().await;
            (record.owner_id.clone(), record.service_id.clone())
        };

        self.players.remove(&owner);
        if self.owners.get(&service_id) == Some(&owner) {
            self.owners.remove(&service_id);
        }
        if let Some(mut ticker) = self.tickers.remove(&service_id) {
            ticker.stop();
        }

        self.bus.unsubscribe_player(&service_id).await
    }

    /// List every player currently on the bus with its full property
    /// snapshot. The records are not registered.
    ///
    /// # Errors
    /// Returns error if the bus names cannot be listed
    #[instrument(skip(self))]
    pub async fn enumerate(&self) -> Result<Vec<PlayerRecord>, MediaError> {
        let names = self.bus.list_names().await?;
        let mut players = Vec::new();

        for name in names {
            let service_id = PlayerId::from_bus_name(&name);
            let Some(player_name) = service_id.player_name().map(str::to_string) else {
                continue;
            };
            if self.should_ignore_player(&name) {
                debug!(player = %name, "ignoring player");
                continue;
            }

            let owner = match self.bus.get_name_owner(&name).await {
                Ok(owner) => owner,
                Err(e) => {
                    warn!(player = %name, error = %e, "Failed to resolve owner");
                    continue;
                }
            };

            let mut record = PlayerRecord::new(player_name, owner, service_id);
            let snapshot = self.snapshot(&record.service_id).await;
            record.merge(&snapshot);
            players.push(record);
        }

        Ok(players)
    }

    /// Full property snapshot of a player as a merge batch. Empty when the
    /// player does not answer.
    pub async fn snapshot(&self, service_id: &PlayerId) -> PropertyBatch {
        match self.bus.get_all_properties(service_id).await {
            Ok(values) => values
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
            Err(e) => {
                warn!(player = %service_id, error = %e, "Failed to read player properties");
                PropertyBatch::new()
            }
        }
    }

    /// Drive a player's ticker from its playback status.
    ///
    /// Paused pauses, Playing resumes or starts after `delay`, Stopped stops.
    /// An unknown status leaves the ticker alone.
    pub fn retime(
        &mut self,
        service_id: &PlayerId,
        status: Option<PlaybackStatus>,
        delay: Duration,
    ) {
        let Some(ticker) = self.tickers.get_mut(service_id) else {
            return;
        };

        match status {
            Some(PlaybackStatus::Paused) => ticker.pause(),
            Some(PlaybackStatus::Playing) => ticker.resume_or_start_after(delay),
            Some(PlaybackStatus::Stopped) => ticker.stop(),
            None => {}
        }
    }

    /// Like [`retime`](Self::retime), but a running ticker is restarted so
    /// its next period begins after `delay`.
    pub fn realign(
        &mut self,
        service_id: &PlayerId,
        status: Option<PlaybackStatus>,
        delay: Duration,
    ) {
        if status != Some(PlaybackStatus::Playing) {
            self.retime(service_id, status, delay);
            return;
        }
        if let Some(ticker) = self.tickers.get_mut(service_id) {
            ticker.restart_after(delay);
        }
    }

    fn position_callback(&self, player: SharedPlayer, service_id: PlayerId) -> TickCallback {
        let bus = Arc::clone(&self.bus);
        let presenter = Arc::clone(&self.presenter);

        Arc::new(move || {
            let bus = Arc::clone(&bus);
            let presenter = Arc::clone(&presenter);
            let player = Arc::clone(&player);
            let service_id = service_id.clone();

            async move {
                let Some(value) = bus.get_property(&service_id, Field::Position.name()).await
                else {
                    return;
                };
                let position = conversion::to_u64(Some(&value)).value;

                let (name, remaining) = {
                    let mut record = player.write().await;
                    record.properties.position = position;
                    (record.name.clone(), record.remaining())
                };

                presenter.present(PresenterEvent::Position {
                    name,
                    elapsed: position,
                    remaining,
                });
            }
            .boxed()
        })
    }
}
