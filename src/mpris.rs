//! MPRIS media-key remote: exposes the player on the session bus and feeds
//! the bus calls back into the event loop as `ControlCmd`s.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_io::{Timer, block_on};
use zbus::{Connection, interface, object_server::InterfaceRef};
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::catalog::Track;
use crate::transport::PlaybackState;

const BUS_NAME: &str = "org.mpris.MediaPlayer2.tembang";
const OBJECT_PATH: &str = "/org/mpris/MediaPlayer2";
const NOTIFY_POLL: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default, PartialEq)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Vec<String>,
    genre: Vec<String>,
    url: Option<String>,
    length_micros: Option<i64>,
    track_id: Option<OwnedObjectPath>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
    notify: Sender<()>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        let changed = match self.state.lock() {
            Ok(mut s) if s.playback != playback => {
                s.playback = playback;
                true
            }
            _ => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }

    /// Mirror the loaded track. `catalog_index` becomes the track id.
    pub fn set_track_metadata(
        &self,
        catalog_index: Option<usize>,
        track: Option<&Track>,
        length_secs: Option<f64>,
    ) {
        let next = SharedState {
            playback: PlaybackState::Stopped,
            title: track.map(|t| t.title.clone()),
            artist: track.map(|t| vec![t.artist.clone()]).unwrap_or_default(),
            genre: track.map(|t| vec![t.genre.clone()]).unwrap_or_default(),
            url: track.map(|t| t.url.clone()),
            length_micros: length_secs
                .filter(|_| track.is_some())
                .map(|s| (s * 1_000_000.0).round() as i64),
            track_id: catalog_index
                .filter(|_| track.is_some())
                .and_then(|i| ObjectPath::try_from(format!("{OBJECT_PATH}/track/{i}")).ok())
                .map(OwnedObjectPath::from),
        };

        let changed = match self.state.lock() {
            Ok(mut s) => {
                let playback = s.playback;
                let next = SharedState { playback, ..next };
                if *s != next {
                    *s = next;
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        };
        if changed {
            let _ = self.notify.send(());
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {}

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "tembang"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec!["file".to_string(), "http".to_string(), "https".to_string()]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        let mut put = |key: &str, value: Value<'_>| {
            if let Ok(v) = OwnedValue::try_from(value) {
                map.insert(key.to_string(), v);
            }
        };

        if let Some(id) = &s.track_id {
            put("mpris:trackid", Value::from(id.clone().into_inner()));
        }
        if let Some(title) = &s.title {
            put("xesam:title", Value::from(title.as_str()));
        }
        if !s.artist.is_empty() {
            put("xesam:artist", Value::from(s.artist.clone()));
        }
        if !s.genre.is_empty() {
            put("xesam:genre", Value::from(s.genre.clone()));
        }
        if let Some(url) = &s.url {
            put("xesam:url", Value::from(url.as_str()));
        }
        if let Some(len) = s.length_micros {
            put("mpris:length", Value::from(len));
        }
        map
    }
}

/// Start the bus service on its own thread. Bus failures are logged and
/// leave the player running without a remote.
pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let (_connection, player) = match serve(tx, state_for_thread).await {
                Ok(served) => served,
                Err(e) => {
                    tracing::warn!(error = %e, "MPRIS unavailable");
                    return;
                }
            };
            tracing::info!(name = BUS_NAME, "MPRIS service registered");
            forward_changes(player, notify_rx).await;
        });
    });

    MprisHandle { state, notify }
}

async fn serve(
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
) -> zbus::Result<(Connection, InterfaceRef<PlayerIface>)> {
    let connection = Connection::session().await?;
    connection.request_name(BUS_NAME).await?;

    let object_server = connection.object_server();
    object_server
        .at(OBJECT_PATH, RootIface { tx: tx.clone() })
        .await?;
    object_server
        .at(OBJECT_PATH, PlayerIface { tx, state })
        .await?;

    let player = object_server
        .interface::<_, PlayerIface>(OBJECT_PATH)
        .await?;
    Ok((connection, player))
}

/// Emit `PropertiesChanged` whenever the handle reports new state.
async fn forward_changes(player: InterfaceRef<PlayerIface>, notify_rx: Receiver<()>) {
    loop {
        Timer::after(NOTIFY_POLL).await;
        let mut dirty = false;
        loop {
            match notify_rx.try_recv() {
                Ok(()) => dirty = true,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }
        if !dirty {
            continue;
        }
        let emitter = player.signal_emitter();
        let iface = player.get().await;
        if let Err(e) = iface.playback_status_changed(emitter).await {
            tracing::debug!(error = %e, "MPRIS PlaybackStatus signal failed");
        }
        if let Err(e) = iface.metadata_changed(emitter).await {
            tracing::debug!(error = %e, "MPRIS Metadata signal failed");
        }
    }
}

#[cfg(test)]
mod tests;
