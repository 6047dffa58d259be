//! Dispatcher, registry and control tests
//!
//! The bus and presenter are in-memory fakes; ticker timing runs on tokio's
//! paused clock.

#![allow(clippy::unwrap_used)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use futures::stream;

use super::{
    BusClient, MediaError, Notification, NotificationStream, PlayerAction, PlayerControl, PlayerId,
    PlayerWatcher, Presenter, PresenterEvent, PropertyValue, ticker::TickerState,
};

const FOO: &str = "org.mpris.MediaPlayer2.foo";
const FOO_OWNER: &str = ":1.1";

#[derive(Default)]
struct FakeState {
    owners: HashMap<String, String>,
    properties: HashMap<String, HashMap<String, PropertyValue>>,
    subscribed: Vec<String>,
    unsubscribed: Vec<String>,
    calls: Vec<(String, String)>,
    writes: Vec<(String, String, PropertyValue)>,
    seeks: Vec<(String, String, i64)>,
    queued: Vec<Notification>,
}

#[derive(Default)]
struct FakeBus {
    state: Mutex<FakeState>,
}

impl FakeBus {
    fn add_player(&self, name: &str, owner: &str, properties: Vec<(&str, PropertyValue)>) {
        let mut state = self.state.lock().unwrap();
        state.owners.insert(name.to_string(), owner.to_string());
        state.properties.insert(
            name.to_string(),
            properties
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        );
    }

    fn remove_player(&self, name: &str) {
        self.state.lock().unwrap().owners.remove(name);
    }

    fn set(&self, name: &str, property: &str, value: PropertyValue) {
        self.state
            .lock()
            .unwrap()
            .properties
            .entry(name.to_string())
            .or_default()
            .insert(property.to_string(), value);
    }

    fn queue(&self, notification: Notification) {
        self.state.lock().unwrap().queued.push(notification);
    }
}

#[async_trait]
impl BusClient for FakeBus {
    async fn list_names(&self) -> Result<Vec<String>, MediaError> {
        let state = self.state.lock().unwrap();
        let mut names: Vec<String> = state.owners.keys().cloned().collect();
        names.push("org.freedesktop.DBus".to_string());
        names.sort();
        Ok(names)
    }

    async fn name_has_owner(&self, name: &str) -> Result<bool, MediaError> {
        Ok(self.state.lock().unwrap().owners.contains_key(name))
    }

    async fn get_name_owner(&self, name: &str) -> Result<String, MediaError> {
        let state = self.state.lock().unwrap();
        state
            .owners
            .get(name)
            .cloned()
            .ok_or_else(|| MediaError::PlayerNotFound(PlayerId::from_bus_name(name)))
    }

    async fn get_property(&self, player: &PlayerId, property: &str) -> Option<PropertyValue> {
        let state = self.state.lock().unwrap();
        state.properties.get(player.bus_name())?.get(property).cloned()
    }

    async fn get_all_properties(
        &self,
        player: &PlayerId,
    ) -> Result<HashMap<String, PropertyValue>, MediaError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .properties
            .get(player.bus_name())
            .cloned()
            .unwrap_or_default())
    }

    async fn set_property(
        &self,
        player: &PlayerId,
        property: &str,
        value: PropertyValue,
    ) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state
            .writes
            .push((player.bus_name().to_string(), property.to_string(), value));
        Ok(())
    }

    async fn call_method(&self, player: &PlayerId, method: &str) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state
            .calls
            .push((player.bus_name().to_string(), method.to_string()));
        Ok(())
    }

    async fn set_position(
        &self,
        player: &PlayerId,
        track_id: &str,
        position: i64,
    ) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state.seeks.push((
            player.bus_name().to_string(),
            track_id.to_string(),
            position,
        ));
        Ok(())
    }

    async fn subscribe_ownership(&self) -> Result<(), MediaError> {
        Ok(())
    }

    async fn subscribe_player(&self, player: &PlayerId) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state.subscribed.push(player.bus_name().to_string());
        Ok(())
    }

    async fn unsubscribe_player(&self, player: &PlayerId) -> Result<(), MediaError> {
        let mut state = self.state.lock().unwrap();
        state.unsubscribed.push(player.bus_name().to_string());
        Ok(())
    }

    fn notifications(&self) -> NotificationStream {
        let queued = std::mem::take(&mut self.state.lock().unwrap().queued);
        Box::pin(stream::iter(queued))
    }
}

#[derive(Default)]
struct RecordingPresenter {
    lines: Mutex<Vec<String>>,
}

impl RecordingPresenter {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock().unwrap())
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, event: PresenterEvent) {
        self.lines.lock().unwrap().push(event.to_string());
    }
}

fn watcher(bus: &Arc<FakeBus>, presenter: &Arc<RecordingPresenter>) -> PlayerWatcher {
    PlayerWatcher::new(
        Arc::clone(bus) as Arc<dyn BusClient>,
        Arc::clone(presenter) as Arc<dyn Presenter>,
        vec!["chromium".to_string()],
    )
}

fn changed(sender: &str, pairs: Vec<(&str, Option<PropertyValue>)>) -> Notification {
    Notification::PropertiesChanged {
        sender: sender.to_string(),
        interface: "org.mpris.MediaPlayer2.Player".to_string(),
        changed: pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    }
}

fn foo_metadata() -> PropertyValue {
    PropertyValue::Map(HashMap::from([
        ("xesam:title".to_string(), PropertyValue::Str("Song".to_string())),
        (
            "mpris:trackid".to_string(),
            PropertyValue::Str("/org/mpris/MediaPlayer2/Track/1".to_string()),
        ),
        ("mpris:length".to_string(), PropertyValue::Int(240_000_000)),
    ]))
}

fn stopped_foo(bus: &FakeBus) {
    bus.add_player(
        FOO,
        FOO_OWNER,
        vec![
            ("PlaybackStatus", PropertyValue::Str("Stopped".to_string())),
            ("Position", PropertyValue::Int(0)),
            ("Metadata", foo_metadata()),
        ],
    );
}

fn foo_state(watcher: &PlayerWatcher) -> Option<TickerState> {
    watcher
        .registry()
        .ticker(&PlayerId::from_bus_name(FOO))
        .map(|ticker| ticker.state())
}

#[tokio::test]
async fn seed_announces_existing_players() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);

    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();

    let lines = presenter.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("PLAYER::connected player_name=foo owner=\":1.1\""));
    assert!(lines[0].contains("title=\"Song\""));
    assert!(lines[0].contains("playback_status=Stopped"));
    assert_eq!(foo_state(&watcher), Some(TickerState::Idle));
    assert_eq!(bus.state.lock().unwrap().subscribed, vec![FOO.to_string()]);
}

#[tokio::test]
async fn seed_skips_aggregator_and_ignored_players() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    bus.add_player("org.mpris.MediaPlayer2.playerctld", ":1.5", vec![]);
    bus.add_player("org.mpris.MediaPlayer2.chromium.instance42", ":1.6", vec![]);
    bus.add_player("org.freedesktop.Notifications", ":1.7", vec![]);

    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();

    assert!(presenter.lines().is_empty());
    assert!(watcher.registry().is_empty());
}

#[tokio::test]
async fn ownership_change_for_non_player_is_ignored() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    bus.add_player("org.freedesktop.Notifications", ":1.9", vec![]);

    let mut watcher = watcher(&bus, &presenter);
    watcher
        .handle(Notification::NameOwnerChanged {
            name: "org.freedesktop.Notifications".to_string(),
            old_owner: String::new(),
            new_owner: ":1.9".to_string(),
        })
        .await;

    assert!(presenter.lines().is_empty());
    assert!(watcher.registry().is_empty());
    assert!(bus.state.lock().unwrap().subscribed.is_empty());
}

#[tokio::test]
async fn properties_from_unknown_sender_are_dropped() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    let mut watcher = watcher(&bus, &presenter);

    watcher
        .handle(changed(
            ":1.99",
            vec![("PlaybackStatus", Some(PropertyValue::Str("Playing".to_string())))],
        ))
        .await;

    assert!(presenter.lines().is_empty());
    assert!(watcher.registry().is_empty());
}

#[tokio::test]
async fn other_interfaces_are_ignored() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    presenter.take();

    watcher
        .handle(Notification::PropertiesChanged {
            sender: FOO_OWNER.to_string(),
            interface: "org.mpris.MediaPlayer2".to_string(),
            changed: HashMap::from([(
                "Identity".to_string(),
                Some(PropertyValue::Str("Foo".to_string())),
            )]),
        })
        .await;

    assert!(presenter.lines().is_empty());
}

#[tokio::test(start_paused = true)]
async fn playing_update_starts_position_reports() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);

    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    presenter.take();

    bus.set(FOO, "Position", PropertyValue::Int(5_000_000));
    watcher
        .handle(changed(
            FOO_OWNER,
            vec![
                ("PlaybackStatus", Some(PropertyValue::Str("Playing".to_string()))),
                ("Position", Some(PropertyValue::Int(5_000_000))),
            ],
        ))
        .await;

    assert_eq!(foo_state(&watcher), Some(TickerState::Running));
    assert_eq!(
        presenter.take(),
        vec!["PLAYBACK_STATUS::foo playback_status=Playing".to_string()]
    );

    tokio::time::sleep(Duration::from_millis(1100)).await;

    assert_eq!(
        presenter.lines(),
        vec![
            "POSITION::foo elapsed=00:05 elapsed_raw=5000000 remaining=03:55 remaining_raw=235000000"
                .to_string()
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn pause_and_stop_halt_reports() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);

    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();

    let playing = || {
        changed(
            FOO_OWNER,
            vec![("PlaybackStatus", Some(PropertyValue::Str("Playing".to_string())))],
        )
    };

    watcher.handle(playing()).await;
    watcher
        .handle(changed(
            FOO_OWNER,
            vec![("PlaybackStatus", Some(PropertyValue::Str("Paused".to_string())))],
        ))
        .await;
    assert_eq!(foo_state(&watcher), Some(TickerState::Paused));

    watcher.handle(playing()).await;
    assert_eq!(foo_state(&watcher), Some(TickerState::Running));

    watcher
        .handle(changed(
            FOO_OWNER,
            vec![("PlaybackStatus", Some(PropertyValue::Str("Stopped".to_string())))],
        ))
        .await;
    assert_eq!(foo_state(&watcher), Some(TickerState::Idle));

    presenter.take();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(presenter.lines().is_empty());
}

#[tokio::test(start_paused = true)]
async fn tick_without_position_is_silent() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    bus.add_player(
        FOO,
        FOO_OWNER,
        vec![("PlaybackStatus", PropertyValue::Str("Playing".to_string()))],
    );

    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    assert_eq!(foo_state(&watcher), Some(TickerState::Running));
    presenter.take();

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(presenter.lines().is_empty());
}

#[tokio::test]
async fn capability_changes_are_coalesced() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    presenter.take();

    watcher
        .handle(changed(
            FOO_OWNER,
            vec![
                ("CanPlay", Some(PropertyValue::Bool(true))),
                ("CanPause", Some(PropertyValue::Bool(true))),
                ("Shuffle", Some(PropertyValue::Bool(true))),
            ],
        ))
        .await;

    assert_eq!(
        presenter.lines(),
        vec![
            "SHUFFLE::foo shuffle=true".to_string(),
            "CAPABILITIES::foo can_control=false can_go_next=false can_go_previous=false can_pause=true can_play=true can_seek=false".to_string(),
        ]
    );
}

#[tokio::test]
async fn metadata_and_loop_updates_are_reported() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    presenter.take();

    let metadata = PropertyValue::Map(HashMap::from([(
        "xesam:artist".to_string(),
        PropertyValue::StrList(vec!["A".to_string(), "B".to_string()]),
    )]));
    watcher
        .handle(changed(
            FOO_OWNER,
            vec![
                ("Metadata", Some(metadata)),
                ("LoopStatus", Some(PropertyValue::Str("Track".to_string()))),
            ],
        ))
        .await;

    let lines = presenter.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("METADATA::foo owner=\":1.1\" artist=\"A,B\" title=\"Song\""));
    assert_eq!(lines[1], "LOOP::foo loop_status=Track");
}

#[tokio::test]
async fn invalidated_properties_reset_silently() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    presenter.take();

    watcher
        .handle(changed(FOO_OWNER, vec![("Metadata", None)]))
        .await;

    assert!(presenter.lines().is_empty());
    let player = watcher.registry().find_by_owner(FOO_OWNER).unwrap();
    assert_eq!(player.read().await.properties.metadata.title, "");
}

#[tokio::test]
async fn connect_and_disconnect() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    let mut watcher = watcher(&bus, &presenter);

    stopped_foo(&bus);
    watcher
        .handle(Notification::NameOwnerChanged {
            name: FOO.to_string(),
            old_owner: String::new(),
            new_owner: FOO_OWNER.to_string(),
        })
        .await;

    let lines = presenter.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("PLAYER::connected player_name=foo"));
    assert!(lines[0].contains("title=\"Song\""));
    assert_eq!(watcher.registry().len(), 1);
    assert_eq!(foo_state(&watcher), Some(TickerState::Idle));

    bus.remove_player(FOO);
    watcher
        .handle(Notification::NameOwnerChanged {
            name: FOO.to_string(),
            old_owner: FOO_OWNER.to_string(),
            new_owner: String::new(),
        })
        .await;

    let lines = presenter.take();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("PLAYER::disconnected player_name=foo owner=\":1.1\""));
    assert!(watcher.registry().is_empty());
    assert_eq!(foo_state(&watcher), None);

    let state = bus.state.lock().unwrap();
    assert_eq!(state.subscribed, vec![FOO.to_string()]);
    assert_eq!(state.unsubscribed, vec![FOO.to_string()]);
}

#[tokio::test]
async fn new_owner_replaces_stale_registration() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();

    bus.add_player(FOO, ":1.2", vec![]);
    watcher
        .handle(Notification::NameOwnerChanged {
            name: FOO.to_string(),
            old_owner: FOO_OWNER.to_string(),
            new_owner: ":1.2".to_string(),
        })
        .await;

    assert_eq!(watcher.registry().len(), 1);
    assert!(watcher.registry().find_by_owner(FOO_OWNER).is_none());
    assert!(watcher.registry().find_by_owner(":1.2").is_some());
}

#[tokio::test(start_paused = true)]
async fn seek_overwrites_position() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    bus.add_player(
        FOO,
        FOO_OWNER,
        vec![
            ("PlaybackStatus", PropertyValue::Str("Paused".to_string())),
            ("Metadata", foo_metadata()),
        ],
    );
    let mut watcher = watcher(&bus, &presenter);
    watcher.seed().await.unwrap();
    assert_eq!(foo_state(&watcher), Some(TickerState::Idle));

    watcher
        .handle(changed(
            FOO_OWNER,
            vec![("PlaybackStatus", Some(PropertyValue::Str("Playing".to_string())))],
        ))
        .await;
    presenter.take();

    tokio::time::sleep(Duration::from_millis(300)).await;
    bus.set(FOO, "Position", PropertyValue::Int(60_250_000));
    watcher
        .handle(Notification::Seeked {
            sender: FOO_OWNER.to_string(),
            position: 60_250_000,
        })
        .await;

    let player = watcher.registry().find_by_owner(FOO_OWNER).unwrap();
    assert_eq!(player.read().await.properties.position, 60_250_000);
    assert_eq!(foo_state(&watcher), Some(TickerState::Running));

    // The pre-seek cadence would have ticked at 1s; the next tick now waits
    // for the 750ms boundary delay plus one period.
    tokio::time::sleep(Duration::from_millis(1700)).await;
    assert!(presenter.lines().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        presenter.lines(),
        vec![
            "POSITION::foo elapsed=01:00 elapsed_raw=60250000 remaining=02:59 remaining_raw=179750000"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn seek_from_unknown_sender_is_dropped() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    let mut watcher = watcher(&bus, &presenter);

    watcher
        .handle(Notification::Seeked {
            sender: ":1.50".to_string(),
            position: 1_000_000,
        })
        .await;

    assert!(watcher.registry().is_empty());
    assert!(presenter.lines().is_empty());
}

#[tokio::test]
async fn run_drains_queued_notifications() {
    let bus = Arc::new(FakeBus::default());
    let presenter = Arc::new(RecordingPresenter::default());
    stopped_foo(&bus);
    bus.queue(changed(
        FOO_OWNER,
        vec![("Shuffle", Some(PropertyValue::Bool(true)))],
    ));

    let mut watcher = watcher(&bus, &presenter);
    watcher.run().await.unwrap();

    let lines = presenter.lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("PLAYER::connected"));
    assert_eq!(lines[1], "SHUFFLE::foo shuffle=true");
}

#[tokio::test]
async fn control_calls_player_methods() {
    let bus = Arc::new(FakeBus::default());
    stopped_foo(&bus);
    let control = PlayerControl::new(Arc::clone(&bus) as Arc<dyn BusClient>);

    control.perform("foo", PlayerAction::PlayPause).await.unwrap();
    control.set_shuffle("foo", true).await.unwrap();

    let state = bus.state.lock().unwrap();
    assert_eq!(state.calls, vec![(FOO.to_string(), "PlayPause".to_string())]);
    assert_eq!(
        state.writes,
        vec![(FOO.to_string(), "Shuffle".to_string(), PropertyValue::Bool(true))]
    );
}

#[tokio::test]
async fn control_rejects_missing_player() {
    let bus = Arc::new(FakeBus::default());
    let control = PlayerControl::new(Arc::clone(&bus) as Arc<dyn BusClient>);

    let result = control.perform("ghost", PlayerAction::Play).await;
    assert!(matches!(result, Err(MediaError::PlayerNotFound(_))));
}

#[tokio::test]
async fn control_set_position_uses_current_track() {
    let bus = Arc::new(FakeBus::default());
    stopped_foo(&bus);
    let control = PlayerControl::new(Arc::clone(&bus) as Arc<dyn BusClient>);

    control.set_position("foo", 30_000_000).await.unwrap();

    let state = bus.state.lock().unwrap();
    assert_eq!(
        state.seeks,
        vec![(
            FOO.to_string(),
            "/org/mpris/MediaPlayer2/Track/1".to_string(),
            30_000_000
        )]
    );
}

#[tokio::test]
async fn control_lists_players_without_aggregator() {
    let bus = Arc::new(FakeBus::default());
    stopped_foo(&bus);
    bus.add_player("org.mpris.MediaPlayer2.playerctld", ":1.5", vec![]);
    bus.add_player("org.mpris.MediaPlayer2.vlc", ":1.8", vec![]);
    let control = PlayerControl::new(Arc::clone(&bus) as Arc<dyn BusClient>);

    assert_eq!(
        control.list_players().await.unwrap(),
        vec!["foo".to_string(), "vlc".to_string()]
    );
}
