//! Translate terminal, engine and bus inputs into model messages.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::app::Msg;
use crate::audio::{AudioEvent, AudioEventKind};
use crate::config::ControlsSettings;
use crate::mpris::ControlCmd;
use crate::transport::PlaybackState;
use crate::ui::Hitboxes;

pub fn map_key(key: KeyEvent, searching: bool, controls: &ControlsSettings) -> Option<Msg> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Msg::Quit);
    }

    if searching {
        return match key.code {
            KeyCode::Esc => Some(Msg::ClearSearch),
            KeyCode::Enter => Some(Msg::ExitSearch),
            KeyCode::Backspace => Some(Msg::SearchBackspace),
            KeyCode::Down => Some(Msg::CursorDown),
            KeyCode::Up => Some(Msg::CursorUp),
            KeyCode::Tab => Some(Msg::NextGenre),
            KeyCode::BackTab => Some(Msg::PrevGenre),
            KeyCode::Char(c) if !c.is_control() => Some(Msg::SearchInput(c)),
            _ => None,
        };
    }

    let scrub = controls.scrub_seconds as f64;
    let step = controls.volume_step;
    match key.code {
        KeyCode::Char('q') => Some(Msg::Quit),
        KeyCode::Char('/') => Some(Msg::EnterSearch),
        KeyCode::Esc => Some(Msg::ClearSearch),
        KeyCode::Tab => Some(Msg::NextGenre),
        KeyCode::BackTab => Some(Msg::PrevGenre),
        KeyCode::Char('j') | KeyCode::Down => Some(Msg::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Msg::CursorUp),
        KeyCode::Enter => Some(Msg::Activate),
        KeyCode::Char(' ') | KeyCode::Char('p') => Some(Msg::Toggle),
        KeyCode::Char('l') | KeyCode::Char('n') => Some(Msg::Next),
        KeyCode::Char('h') => Some(Msg::Prev),
        KeyCode::Char('L') | KeyCode::Right => Some(Msg::SeekBy(scrub)),
        KeyCode::Char('H') | KeyCode::Left => Some(Msg::SeekBy(-scrub)),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Msg::VolumeBy(step)),
        KeyCode::Char('-') => Some(Msg::VolumeBy(-step)),
        _ => None,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Drag {
    Progress,
    Volume,
}

/// Mouse state across events: which bar a held button is dragging.
#[derive(Debug, Default)]
pub struct MouseMapper {
    drag: Option<Drag>,
}

impl MouseMapper {
    pub fn map(
        &mut self,
        ev: MouseEvent,
        hit: &Hitboxes,
        view_len: usize,
        duration: Option<f64>,
    ) -> Option<Msg> {
        let pos = Position::new(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(i) = hit.tabs.iter().position(|r| r.contains(pos)) {
                    return Some(Msg::SelectGenre(i));
                }
                if hit.rows.contains(pos) {
                    let row = hit.first_row + usize::from(pos.y - hit.rows.y);
                    return (row < view_len).then_some(Msg::PlayRow(row));
                }
                if hit.progress.contains(pos) {
                    let duration = duration?;
                    self.drag = Some(Drag::Progress);
                    return Some(Msg::SeekDragStart(ratio(pos.x, hit.progress) * duration));
                }
                if hit.volume.contains(pos) {
                    self.drag = Some(Drag::Volume);
                    return Some(Msg::SetVolume(ratio(pos.x, hit.volume) as f32));
                }
                if hit.search.contains(pos) {
                    return Some(Msg::EnterSearch);
                }
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => match self.drag? {
                Drag::Progress => Some(Msg::SeekDragMove(ratio(pos.x, hit.progress) * duration?)),
                Drag::Volume => Some(Msg::SetVolume(ratio(pos.x, hit.volume) as f32)),
            },
            MouseEventKind::Up(MouseButton::Left) => match self.drag.take()? {
                Drag::Progress => Some(Msg::SeekDragEnd),
                Drag::Volume => None,
            },
            MouseEventKind::ScrollDown => Some(Msg::CursorDown),
            MouseEventKind::ScrollUp => Some(Msg::CursorUp),
            _ => None,
        }
    }
}

/// Horizontal position of `x` across `area`, clamped to `0.0..=1.0`.
fn ratio(x: u16, area: Rect) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let offset = f64::from(x.saturating_sub(area.x));
    (offset / f64::from(area.width - 1)).clamp(0.0, 1.0)
}

/// Engine events for an earlier load are dropped.
pub fn audio_event_msg(ev: AudioEvent, generation: u64) -> Option<Msg> {
    if ev.generation != generation {
        tracing::trace!(stale = ev.generation, current = generation, "dropping audio event");
        return None;
    }
    Some(match ev.kind {
        AudioEventKind::LoadedMetadata(d) => Msg::MetadataLoaded(d.map(|d| d.as_secs_f64())),
        AudioEventKind::TimeUpdate(pos) => Msg::TimeUpdate(pos.as_secs_f64()),
        AudioEventKind::Ended => Msg::Ended,
        AudioEventKind::Error(err) => {
            tracing::warn!(%err, "playback failed");
            Msg::AudioFailed
        }
    })
}

/// Bus commands reuse the keyboard messages. `Stop` pauses.
pub fn control_msg(cmd: ControlCmd, state: PlaybackState) -> Msg {
    match cmd {
        ControlCmd::Quit => Msg::Quit,
        ControlCmd::Play => Msg::Play,
        ControlCmd::Pause | ControlCmd::Stop => Msg::Pause,
        ControlCmd::PlayPause => match state {
            PlaybackState::Stopped => Msg::Play,
            _ => Msg::Toggle,
        },
        ControlCmd::Next => Msg::Next,
        ControlCmd::Prev => Msg::Prev,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn hitboxes() -> Hitboxes {
        Hitboxes {
            tabs: vec![Rect::new(0, 3, 5, 1), Rect::new(6, 3, 6, 1)],
            search: Rect::new(0, 4, 40, 3),
            rows: Rect::new(1, 8, 38, 5),
            first_row: 10,
            progress: Rect::new(2, 15, 11, 1),
            volume: Rect::new(2, 16, 11, 1),
            spectrum: Rect::new(1, 18, 38, 4),
        }
    }

    #[test]
    fn normal_mode_bindings() {
        let c = ControlsSettings::default();
        assert_eq!(map_key(key(KeyCode::Char('q')), false, &c), Some(Msg::Quit));
        assert_eq!(map_key(key(KeyCode::Char('/')), false, &c), Some(Msg::EnterSearch));
        assert_eq!(map_key(key(KeyCode::Char(' ')), false, &c), Some(Msg::Toggle));
        assert_eq!(map_key(key(KeyCode::Char('l')), false, &c), Some(Msg::Next));
        assert_eq!(map_key(key(KeyCode::Char('h')), false, &c), Some(Msg::Prev));
        assert_eq!(map_key(key(KeyCode::Char('L')), false, &c), Some(Msg::SeekBy(5.0)));
        assert_eq!(map_key(key(KeyCode::Char('H')), false, &c), Some(Msg::SeekBy(-5.0)));
        assert_eq!(map_key(key(KeyCode::Char('-')), false, &c), Some(Msg::VolumeBy(-0.05)));
        assert_eq!(map_key(key(KeyCode::BackTab), false, &c), Some(Msg::PrevGenre));
        assert_eq!(map_key(key(KeyCode::Char('z')), false, &c), None);
    }

    #[test]
    fn search_mode_types_letters_instead_of_commands() {
        let c = ControlsSettings::default();
        assert_eq!(map_key(key(KeyCode::Char('q')), true, &c), Some(Msg::SearchInput('q')));
        assert_eq!(map_key(key(KeyCode::Char(' ')), true, &c), Some(Msg::SearchInput(' ')));
        assert_eq!(map_key(key(KeyCode::Esc), true, &c), Some(Msg::ClearSearch));
        assert_eq!(map_key(key(KeyCode::Enter), true, &c), Some(Msg::ExitSearch));
        assert_eq!(map_key(key(KeyCode::Backspace), true, &c), Some(Msg::SearchBackspace));
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let c = ControlsSettings::default();
        let ev = KeyEvent::new_with_kind(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
            KeyEventKind::Press,
        );
        assert_eq!(map_key(ev, true, &c), Some(Msg::Quit));
        assert_eq!(map_key(ev, false, &c), Some(Msg::Quit));
    }

    #[test]
    fn clicks_select_tabs_and_rows() {
        let mut m = MouseMapper::default();
        let hit = hitboxes();
        let down = MouseEventKind::Down(MouseButton::Left);
        assert_eq!(m.map(mouse(down, 7, 3), &hit, 20, None), Some(Msg::SelectGenre(1)));
        assert_eq!(m.map(mouse(down, 5, 10), &hit, 20, None), Some(Msg::PlayRow(12)));
        // Below the last row of a short view.
        assert_eq!(m.map(mouse(down, 5, 12), &hit, 13, None), None);
    }

    #[test]
    fn progress_drag_is_a_seek_gesture() {
        let mut m = MouseMapper::default();
        let hit = hitboxes();
        let d = Some(100.0);
        assert_eq!(
            m.map(mouse(MouseEventKind::Down(MouseButton::Left), 7, 15), &hit, 1, d),
            Some(Msg::SeekDragStart(50.0))
        );
        assert_eq!(
            m.map(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 20), &hit, 1, d),
            Some(Msg::SeekDragMove(100.0))
        );
        assert_eq!(
            m.map(mouse(MouseEventKind::Up(MouseButton::Left), 40, 20), &hit, 1, d),
            Some(Msg::SeekDragEnd)
        );
        assert_eq!(
            m.map(mouse(MouseEventKind::Up(MouseButton::Left), 40, 20), &hit, 1, d),
            None
        );
    }

    #[test]
    fn progress_is_inert_before_the_duration_is_known() {
        let mut m = MouseMapper::default();
        let hit = hitboxes();
        let down = MouseEventKind::Down(MouseButton::Left);
        assert_eq!(m.map(mouse(down, 7, 15), &hit, 1, None), None);
        assert_eq!(
            m.map(mouse(MouseEventKind::Up(MouseButton::Left), 7, 15), &hit, 1, None),
            None
        );
    }

    #[test]
    fn volume_click_and_drag_set_the_level() {
        let mut m = MouseMapper::default();
        let hit = hitboxes();
        assert_eq!(
            m.map(mouse(MouseEventKind::Down(MouseButton::Left), 2, 16), &hit, 1, None),
            Some(Msg::SetVolume(0.0))
        );
        assert_eq!(
            m.map(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 16), &hit, 1, None),
            Some(Msg::SetVolume(1.0))
        );
    }

    #[test]
    fn stale_audio_events_are_dropped() {
        let ev = |generation, kind| AudioEvent { generation, kind };
        assert_eq!(audio_event_msg(ev(1, AudioEventKind::Ended), 2), None);
        assert_eq!(audio_event_msg(ev(2, AudioEventKind::Ended), 2), Some(Msg::Ended));
        assert_eq!(
            audio_event_msg(
                ev(2, AudioEventKind::TimeUpdate(Duration::from_millis(1500))),
                2
            ),
            Some(Msg::TimeUpdate(1.5))
        );
        assert_eq!(
            audio_event_msg(ev(2, AudioEventKind::Error("boom".into())), 2),
            Some(Msg::AudioFailed)
        );
    }

    #[test]
    fn bus_commands_map_to_keyboard_messages() {
        assert_eq!(control_msg(ControlCmd::Stop, PlaybackState::Playing), Msg::Pause);
        assert_eq!(control_msg(ControlCmd::PlayPause, PlaybackState::Stopped), Msg::Play);
        assert_eq!(control_msg(ControlCmd::PlayPause, PlaybackState::Paused), Msg::Toggle);
        assert_eq!(control_msg(ControlCmd::Quit, PlaybackState::Paused), Msg::Quit);
    }
}
