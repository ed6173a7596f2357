use super::*;
use std::sync::mpsc;

fn make_track() -> Track {
    Track {
        title: "Bengawan Solo".to_string(),
        artist: "Gesang".to_string(),
        genre: "Keroncong".to_string(),
        url: "https://example.com/music/solo.mp3".to_string(),
    }
}

fn handle() -> (MprisHandle, Arc<Mutex<SharedState>>, Receiver<()>) {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (notify, notify_rx) = mpsc::channel::<()>();
    (
        MprisHandle {
            state: state.clone(),
            notify,
        },
        state,
        notify_rx,
    )
}

#[test]
fn set_track_metadata_sets_and_clears_shared_state() {
    let (handle, state, _rx) = handle();

    let track = make_track();
    handle.set_track_metadata(Some(7), Some(&track), Some(1.234_567));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Bengawan Solo"));
        assert_eq!(s.artist, vec!["Gesang".to_string()]);
        assert_eq!(s.genre, vec!["Keroncong".to_string()]);
        assert_eq!(s.url.as_deref(), Some("https://example.com/music/solo.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_track_metadata(None, None, None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert!(s.genre.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn only_changes_are_announced() {
    let (handle, _state, rx) = handle();
    let track = make_track();

    handle.set_track_metadata(Some(1), Some(&track), None);
    handle.set_track_metadata(Some(1), Some(&track), None);
    handle.set_playback(PlaybackState::Playing);
    handle.set_playback(PlaybackState::Playing);

    assert_eq!(rx.try_iter().count(), 2);
}

#[test]
fn metadata_update_keeps_playback_status() {
    let (handle, state, _rx) = handle();
    handle.set_playback(PlaybackState::Paused);
    handle.set_track_metadata(Some(2), Some(&make_track()), Some(3.0));
    assert_eq!(state.lock().unwrap().playback, PlaybackState::Paused);
}

#[test]
fn playback_status_maps_state_to_mpris_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    assert_eq!(iface.playback_status(), "Stopped");

    state.lock().unwrap().playback = PlaybackState::Playing;
    assert_eq!(iface.playback_status(), "Playing");

    state.lock().unwrap().playback = PlaybackState::Paused;
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let (handle, state, _rx) = handle();
    handle.set_track_metadata(Some(1), Some(&make_track()), Some(42.0));

    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:genre",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn metadata_is_empty_without_a_track() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };
    assert!(iface.metadata().is_empty());
}

#[test]
fn bus_calls_become_control_commands() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let player = PlayerIface {
        tx: tx.clone(),
        state,
    };
    let root = RootIface { tx };

    player.play_pause();
    player.stop();
    player.next();
    player.previous();
    root.quit();

    let got: Vec<ControlCmd> = rx.try_iter().collect();
    assert_eq!(
        got,
        vec![
            ControlCmd::PlayPause,
            ControlCmd::Stop,
            ControlCmd::Next,
            ControlCmd::Prev,
            ControlCmd::Quit
        ]
    );
}
