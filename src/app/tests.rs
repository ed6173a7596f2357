use super::*;
use crate::catalog::{Catalog, CatalogOrigin, Track};
use crate::transport::{PlaybackState, TransportCmd};

fn t(title: &str, genre: &str) -> Track {
    Track {
        title: title.into(),
        artist: format!("{title} artist"),
        genre: genre.into(),
        url: format!("{title}.mp3"),
    }
}

fn app_with(tracks: Vec<Track>) -> App {
    App::new(Catalog::new(tracks, CatalogOrigin::Unknown), 1.0)
}

fn rock_jazz() -> App {
    app_with(vec![t("A", "Rock"), t("B", "Jazz"), t("Ab", "Rock")])
}

fn titles(app: &App) -> Vec<String> {
    app.view()
        .iter()
        .map(|&i| app.catalog().tracks()[i].title.clone())
        .collect()
}

fn select(app: &mut App, label: &str) {
    let i = app
        .genres()
        .iter()
        .position(|g| g.label() == label)
        .unwrap();
    app.update(Msg::SelectGenre(i));
}

fn type_query(app: &mut App, q: &str) {
    app.update(Msg::EnterSearch);
    for c in q.chars() {
        app.update(Msg::SearchInput(c));
    }
}

#[test]
fn genre_and_search_combine_in_catalog_order() {
    let mut app = rock_jazz();
    select(&mut app, "Rock");
    type_query(&mut app, "a");
    assert_eq!(titles(&app), vec!["A", "Ab"]);
}

#[test]
fn genre_tabs_start_with_all_and_cycle() {
    let mut app = rock_jazz();
    let labels: Vec<_> = app.genres().iter().map(|g| g.label().to_string()).collect();
    assert_eq!(labels, vec!["All", "Rock", "Jazz"]);
    assert_eq!(app.genre_index(), 0);

    app.update(Msg::PrevGenre);
    assert_eq!(app.genre().label(), "Jazz");
    assert_eq!(titles(&app), vec!["B"]);
    app.update(Msg::NextGenre);
    assert_eq!(app.genre().label(), "All");
    assert_eq!(app.view().len(), 3);
}

#[test]
fn every_filter_change_rerenders_the_playlist() {
    let mut app = rock_jazz();
    assert_eq!(app.update(Msg::SelectGenre(1)), vec![Command::RenderPlaylist]);
    assert_eq!(app.update(Msg::SearchInput('x')), vec![Command::RenderPlaylist]);
    assert_eq!(app.update(Msg::SearchBackspace), vec![Command::RenderPlaylist]);
    assert!(app.update(Msg::SelectGenre(99)).is_empty());
}

#[test]
fn clear_search_drops_the_query_and_exit_keeps_it() {
    let mut app = rock_jazz();
    type_query(&mut app, "ab");
    assert!(app.is_searching());
    app.update(Msg::ExitSearch);
    assert!(!app.is_searching());
    assert_eq!(app.query(), "ab");
    assert_eq!(titles(&app), vec!["Ab"]);

    app.update(Msg::EnterSearch);
    app.update(Msg::ClearSearch);
    assert_eq!(app.query(), "");
    assert_eq!(app.view().len(), 3);
}

#[test]
fn activate_plays_the_cursor_row() {
    let mut app = rock_jazz();
    app.update(Msg::CursorDown);
    let cmds = app.update(Msg::Activate);
    assert_eq!(
        cmds,
        vec![
            Command::Audio(TransportCmd::Load {
                catalog_index: 1,
                generation: 1
            }),
            Command::RenderPlaylist
        ]
    );
    assert_eq!(app.transport().state(), PlaybackState::Playing);
    assert_eq!(app.now_playing().map(|t| t.title.as_str()), Some("B"));
}

#[test]
fn cursor_wraps_around_the_view() {
    let mut app = rock_jazz();
    app.update(Msg::CursorUp);
    assert_eq!(app.cursor(), 2);
    app.update(Msg::CursorDown);
    assert_eq!(app.cursor(), 0);
}

#[test]
fn next_from_the_last_row_wraps_to_the_first() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(2));
    app.update(Msg::Next);
    assert_eq!(app.transport().current(), Some(0));
    assert_eq!(app.cursor(), 0);
}

#[test]
fn toggle_on_an_emptied_view_is_a_no_op() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(0));
    type_query(&mut app, "zzz");
    assert!(app.view().is_empty());

    assert!(app.update(Msg::Toggle).is_empty());
    assert!(app.update(Msg::Next).is_empty());
    assert!(app.update(Msg::Prev).is_empty());
    assert!(app.update(Msg::Activate).is_empty());
    assert_eq!(app.transport().state(), PlaybackState::Playing);
    assert_eq!(app.transport().current(), None);
}

#[test]
fn narrowing_the_view_never_leaves_a_dangling_row() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(2));
    select(&mut app, "Jazz");
    assert_eq!(app.transport().current(), None);
    assert!(app.cursor() < app.view().len());

    // Coming back re-anchors the playing row.
    select(&mut app, "Rock");
    assert_eq!(app.transport().current(), Some(1));
    assert_eq!(app.cursor(), 1);
}

#[test]
fn media_play_resumes_or_starts_the_cursor_row() {
    let mut app = rock_jazz();
    let cmds = app.update(Msg::Play);
    assert!(matches!(
        cmds.first(),
        Some(Command::Audio(TransportCmd::Load { catalog_index: 0, .. }))
    ));
    assert!(app.update(Msg::Play).is_empty());

    assert_eq!(
        app.update(Msg::Pause),
        vec![Command::Audio(TransportCmd::Pause)]
    );
    assert!(app.update(Msg::Pause).is_empty());
    assert_eq!(
        app.update(Msg::Play),
        vec![Command::Audio(TransportCmd::Resume)]
    );
}

#[test]
fn natural_end_pauses_without_advancing() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(0));
    app.update(Msg::MetadataLoaded(Some(30.0)));
    app.update(Msg::Ended);
    assert_eq!(app.transport().state(), PlaybackState::Paused);
    assert_eq!(app.transport().loaded(), Some(0));
    assert_eq!(
        app.update(Msg::Toggle),
        vec![Command::Audio(TransportCmd::Resume)]
    );
}

#[test]
fn toggle_after_a_failed_track_loads_it_again() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(2));
    app.update(Msg::AudioFailed);
    assert_eq!(app.transport().state(), PlaybackState::Paused);
    assert_eq!(app.transport().loaded(), Some(2));

    let cmds = app.update(Msg::Toggle);
    assert_eq!(
        cmds,
        vec![Command::Audio(TransportCmd::Load {
            catalog_index: 2,
            generation: 2,
        })]
    );
    assert_eq!(app.transport().state(), PlaybackState::Playing);

    // Failing again pauses again, and media Play retries too.
    app.update(Msg::AudioFailed);
    assert!(matches!(
        app.update(Msg::Play).as_slice(),
        [Command::Audio(TransportCmd::Load { catalog_index: 2, generation: 3 })]
    ));
}

#[test]
fn audio_failure_with_nothing_loaded_changes_nothing() {
    let mut app = rock_jazz();
    assert!(app.update(Msg::AudioFailed).is_empty());
    assert_eq!(app.transport().state(), PlaybackState::Stopped);
}

#[test]
fn drag_suppresses_time_updates_until_release() {
    let mut app = rock_jazz();
    app.update(Msg::PlayRow(0));
    app.update(Msg::MetadataLoaded(Some(100.0)));
    app.update(Msg::SeekDragStart(40.0));
    app.update(Msg::TimeUpdate(3.0));
    app.update(Msg::SeekDragMove(60.0));
    app.update(Msg::TimeUpdate(4.0));
    assert_eq!(app.transport().seek_display(), 60.0);
    assert_eq!(
        app.update(Msg::SeekDragEnd),
        vec![Command::Audio(TransportCmd::Seek(60.0))]
    );
    assert_eq!(app.transport().seek_display(), 60.0);
}

#[test]
fn volume_steps_clamp_to_the_unit_range() {
    let mut app = rock_jazz();
    assert_eq!(
        app.update(Msg::VolumeBy(0.25)),
        vec![Command::Audio(TransportCmd::SetVolume(1.0))]
    );
    app.update(Msg::SetVolume(0.1));
    app.update(Msg::VolumeBy(-0.5));
    assert_eq!(app.transport().volume(), 0.0);
}

#[test]
fn nan_volume_step_leaves_the_volume_alone() {
    let mut app = App::new(Catalog::default(), 0.4);
    assert_eq!(
        app.update(Msg::VolumeBy(f32::NAN)),
        vec![Command::Audio(TransportCmd::SetVolume(0.4))]
    );
    assert_eq!(app.transport().volume(), 0.4);
}

#[test]
fn first_gesture_resumes_analysis_once() {
    let mut app = rock_jazz();
    assert!(app.is_analysis_armed());
    assert_eq!(app.update(Msg::UserGesture), vec![Command::ResumeAnalysis]);
    assert!(!app.is_analysis_armed());
    assert!(app.update(Msg::UserGesture).is_empty());
    assert!(app.update(Msg::UserGesture).is_empty());
}

#[test]
fn late_catalog_replaces_the_empty_start() {
    let mut app = App::default();
    assert!(app.view().is_empty());
    assert!(app.update(Msg::Toggle).is_empty());
    assert!(app.update(Msg::Next).is_empty());

    let catalog = Catalog::new(vec![t("A", "Rock"), t("B", "Jazz")], CatalogOrigin::Unknown);
    assert_eq!(
        app.update(Msg::CatalogLoaded(catalog)),
        vec![Command::RenderPlaylist]
    );
    assert_eq!(app.view(), &[0, 1]);
    assert_eq!(app.genres().len(), 3);
}

#[test]
fn resize_tracks_viewport_width() {
    let mut app = rock_jazz();
    app.update(Msg::Resize(40));
    assert_eq!(app.surface().width, 80.0);
    assert_eq!(app.surface().height, 50.0);
}

#[test]
fn quit_is_forwarded() {
    let mut app = rock_jazz();
    assert_eq!(app.update(Msg::Quit), vec![Command::Quit]);
}
