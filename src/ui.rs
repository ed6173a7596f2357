//! UI rendering helpers for the terminal user interface.
//!
//! `draw` paints the whole player with `ratatui` and returns the screen
//! regions the mouse can act on.

mod spectrum;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock};

use crate::app::App;
use crate::config::{ControlsSettings, TimeField, UiSettings};
use crate::starfield::Starfield;
use crate::transport::PlaybackState;
use crate::visualizer::{self, Bar};

pub use spectrum::SpectrumWidget;

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("enter", "play selected song");
    map.insert("space/p", "play/pause");
    map.insert("h/l", "prev/next song");
    // H/L and +/- are filled from config.
    map.insert("tab", "genre");
    map.insert("/", "search");
    map.insert("q", "quit");
    map
});

/// Render the controls help text, incorporating scrub seconds and the
/// volume step.
fn controls_text(controls: &ControlsSettings) -> String {
    let order = ["j/k", "h/l", "H/L", "enter", "space/p", "+/-", "tab", "/", "q"];
    order
        .iter()
        .filter_map(|k| match *k {
            "H/L" => Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds)),
            "+/-" => Some(format!(
                "[+/-] volume {}%",
                (controls.volume_step * 100.0).round()
            )),
            _ => CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v)),
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Per-frame inputs that live outside the model.
pub struct Scene<'a> {
    pub ui: &'a UiSettings,
    pub controls: &'a ControlsSettings,
    /// Latest analyser bytes, one per bin.
    pub bins: &'a [u8],
    pub clock: Option<&'a str>,
    pub starfield: Option<&'a Starfield>,
    pub spectrum_rows: u16,
}

/// Clickable regions from the last frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hitboxes {
    /// One rect per genre tab, in tab order.
    pub tabs: Vec<Rect>,
    pub search: Rect,
    /// Inner area of the playlist.
    pub rows: Rect,
    /// View row shown on the first line of `rows`.
    pub first_row: usize,
    pub progress: Rect,
    pub volume: Rect,
    /// Inner area of the spectrum; its width drives the drawing surface.
    pub spectrum: Rect,
}

/// Format seconds as `MM:SS`.
pub(crate) fn format_mmss(secs: f64) -> String {
    let secs = if secs.is_finite() { secs.max(0.0) as u64 } else { 0 };
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Build the time text (elapsed/total/remaining) per `UiSettings`.
pub(crate) fn time_text(elapsed: f64, total: Option<f64>, ui: &UiSettings) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    parts.push(format!("-{}", format_mmss((t - elapsed).max(0.0))));
                }
            }
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(&ui.time_separator))
    }
}

/// The slice of `total` rows to show in `height` lines, centered on
/// `selected` when possible. Returns `(start, end)`.
pub(crate) fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize) {
    if total <= height || height == 0 {
        return (0, total);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn tab_label(label: &str) -> String {
    format!(" {label} ")
}

/// Lay the genre tabs out left to right from `area.x`, one space apart,
/// clipped to `area`.
pub(crate) fn tab_hitboxes(area: Rect, labels: &[&str]) -> Vec<Rect> {
    let mut x = area.x;
    let right = area.x.saturating_add(area.width);
    labels
        .iter()
        .map(|label| {
            let width = Span::raw(tab_label(label)).width() as u16;
            let start = x.min(right);
            let end = x.saturating_add(width).min(right);
            x = x.saturating_add(width + 1);
            Rect::new(start, area.y, end - start, area.height.min(1))
        })
        .collect()
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, scene: &Scene) -> Hitboxes {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(4),
        Constraint::Length(scene.spectrum_rows.saturating_add(2)),
        Constraint::Length(3),
    ])
    .split(frame.area());

    let mut hit = Hitboxes::default();

    draw_header(frame, chunks[0], scene);
    hit.tabs = draw_tabs(frame, chunks[1], app);
    hit.search = draw_search(frame, chunks[2], app);
    (hit.rows, hit.first_row) = draw_playlist(frame, chunks[3], app, scene.ui);
    (hit.progress, hit.volume) = draw_now_playing(frame, chunks[4], app, scene.ui);
    hit.spectrum = draw_spectrum(frame, chunks[5], app, scene.bins);

    let footer = Paragraph::new(controls_text(scene.controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[6]);

    hit
}

fn draw_header(frame: &mut Frame, area: Rect, scene: &Scene) {
    let mut block = Block::bordered();
    if let Some(clock) = scene.clock {
        block = block.title_top(Line::from(format!(" {clock} ")).right_aligned());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(field) = scene.starfield {
        let buf = frame.buffer_mut();
        for cell in field.cells(inner.width, inner.height) {
            buf[(inner.x + cell.col, inner.y + cell.row)]
                .set_char(cell.glyph)
                .set_fg(Color::DarkGray);
        }
    }

    let text = Paragraph::new(Line::from(scene.ui.header_text.as_str()).bold())
        .alignment(Alignment::Center);
    let text_area = Rect {
        y: inner.y + inner.height / 2,
        height: inner.height.min(1),
        ..inner
    };
    frame.render_widget(text, text_area);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) -> Vec<Rect> {
    let labels: Vec<&str> = app.genres().iter().map(|g| g.label()).collect();
    let boxes = tab_hitboxes(area, &labels);

    let mut spans: Vec<Span> = Vec::with_capacity(labels.len() * 2);
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let span = Span::raw(tab_label(label));
        spans.push(if i == app.genre_index() {
            span.add_modifier(Modifier::REVERSED)
        } else {
            span.fg(Color::Gray)
        });
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    boxes
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let title = if app.is_searching() {
        " search (enter keeps, esc clears) "
    } else {
        " search (/) "
    };
    let mut text = app.query().to_string();
    if app.is_searching() {
        text.push('_');
    }
    let style = if app.is_searching() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(text).style(style).block(
        Block::bordered()
            .title(title)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(search, area);
    area
}

fn draw_playlist(frame: &mut Frame, area: Rect, app: &App, ui: &UiSettings) -> (Rect, usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" tracks ({}) ", app.view().len()));
    let inner = block.inner(area);

    // Only build ListItems for the visible window.
    let view = app.view();
    let (start, end) = visible_window(view.len(), inner.height as usize, app.cursor());
    let playing_row = app.transport().current();
    let tracks = app.catalog().tracks();

    let items: Vec<ListItem> = (start..end)
        .map(|row| {
            let track = &tracks[view[row]];
            let marker = if playing_row == Some(row) { "♪ " } else { "  " };
            let mut spans = vec![Span::raw(marker), Span::raw(track.title.as_str())];
            if ui.playlist_show_artist {
                spans.push(Span::raw(" ✧ ").fg(Color::DarkGray));
                spans.push(Span::raw(track.artist.as_str()).fg(Color::Gray));
            }
            let line = Line::from(spans);
            if playing_row == Some(row) {
                ListItem::new(line.fg(Color::Magenta))
            } else {
                ListItem::new(line)
            }
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !view.is_empty() {
        state.select(Some(app.cursor() - start));
    }
    frame.render_stateful_widget(list, area, &mut state);

    (inner, start)
}

fn draw_now_playing(frame: &mut Frame, area: Rect, app: &App, ui: &UiSettings) -> (Rect, Rect) {
    let transport = app.transport();
    let title = match app.now_playing() {
        Some(track) => Line::from_iter([
            Span::from(track.title.as_str()).fg(Color::Magenta),
            Span::from(" ✧ ").fg(Color::DarkGray),
            Span::from(track.artist.as_str()).fg(Color::Gray),
        ]),
        None => Line::from("nothing playing").fg(Color::DarkGray),
    };
    let state = match transport.state() {
        PlaybackState::Playing => " ▶ ",
        PlaybackState::Paused => " ⏸ ",
        PlaybackState::Stopped => " ■ ",
    };
    let block = Block::bordered()
        .title_top(title.alignment(Alignment::Center))
        .title_top(Line::from(state).left_aligned())
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [progress_area, volume_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(inner);

    let shown = transport.seek_display();
    let ratio = match transport.duration() {
        Some(d) if d > 0.0 => (shown / d).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let progress = LineGauge::default()
        .filled_style(Style::default().fg(Color::Magenta))
        .label(time_text(shown, transport.duration(), ui).unwrap_or_default())
        .ratio(ratio);
    frame.render_widget(progress, progress_area);

    let volume = LineGauge::default()
        .filled_style(Style::default().fg(Color::Green))
        .label(format!("vol {:>3}%", (transport.volume() * 100.0).round()))
        .ratio(f64::from(transport.volume()).clamp(0.0, 1.0));
    frame.render_widget(volume, volume_area);

    (progress_area, volume_area)
}

fn draw_spectrum(frame: &mut Frame, area: Rect, app: &App, bins: &[u8]) -> Rect {
    let block = Block::bordered().title(" spectrum ");
    let inner = block.inner(area);
    let surface = *app.surface();
    let bars: Vec<Bar> = visualizer::bars(bins, &surface);
    frame.render_widget(SpectrumWidget::new(&bars, surface).block(block), area);
    inner
}
