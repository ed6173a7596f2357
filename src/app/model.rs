//! Player model: the one owned state of the session and its dispatcher.
//!
//! Every input (keys, mouse, engine events, media keys) arrives as a `Msg`.
//! `App::update` applies it and returns the side effects the runtime has to
//! carry out, so the whole model runs without a terminal or audio device.

use crate::catalog::{Catalog, Track};
use crate::filter::{self, Genre, TitleIndex};
use crate::transport::{PlaybackState, Transport, TransportCmd};
use crate::visualizer::Surface;

/// Inputs to the model.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    CatalogLoaded(Catalog),

    SelectGenre(usize),
    NextGenre,
    PrevGenre,
    EnterSearch,
    /// Leave the search box, keeping the query.
    ExitSearch,
    /// Leave the search box and drop the query.
    ClearSearch,
    SearchInput(char),
    SearchBackspace,

    CursorDown,
    CursorUp,
    /// Play the row under the cursor.
    Activate,
    PlayRow(usize),
    Toggle,
    /// Media-key play: resume a paused track or start the cursor row.
    Play,
    Pause,
    Next,
    Prev,

    Ended,
    MetadataLoaded(Option<f64>),
    TimeUpdate(f64),
    AudioFailed,

    Seek(f64),
    SeekBy(f64),
    SeekDragStart(f64),
    SeekDragMove(f64),
    SeekDragEnd,
    SetVolume(f32),
    VolumeBy(f32),

    /// Viewport width in terminal columns.
    Resize(u16),
    /// Any key press or mouse click.
    UserGesture,
    Quit,
}

/// Side effects requested by `App::update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Audio(TransportCmd),
    /// The filtered rows or their markers changed.
    RenderPlaylist,
    /// Start feeding the visualizer.
    ResumeAnalysis,
    Quit,
}

/// The main application model.
pub struct App {
    catalog: Catalog,
    titles: TitleIndex,
    genres: Vec<Genre>,
    genre: usize,
    query: String,
    search_mode: bool,
    view: Vec<usize>,
    cursor: usize,
    transport: Transport,
    analysis_armed: bool,
    surface: Surface,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Catalog::default(), 1.0)
    }
}

impl App {
    pub fn new(catalog: Catalog, volume: f32) -> Self {
        let mut app = Self {
            titles: TitleIndex::new(&catalog),
            genres: filter::genres(&catalog),
            catalog,
            genre: 0,
            query: String::new(),
            search_mode: false,
            view: Vec::new(),
            cursor: 0,
            transport: Transport::new(volume),
            analysis_armed: true,
            surface: Surface::default(),
        };
        app.refilter();
        app
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn genre_index(&self) -> usize {
        self.genre
    }

    pub fn genre(&self) -> &Genre {
        &self.genres[self.genre]
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.search_mode
    }

    /// Catalog indices of the filtered view, in catalog order.
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn is_analysis_armed(&self) -> bool {
        self.analysis_armed
    }

    /// The loaded track, whether or not it is visible in the view.
    pub fn now_playing(&self) -> Option<&Track> {
        self.transport.loaded().and_then(|i| self.catalog.get(i))
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::CatalogLoaded(catalog) => {
                self.titles = TitleIndex::new(&catalog);
                self.genres = filter::genres(&catalog);
                self.catalog = catalog;
                self.genre = 0;
                self.refilter()
            }

            Msg::SelectGenre(i) if i < self.genres.len() => {
                self.genre = i;
                self.refilter()
            }
            Msg::SelectGenre(_) => Vec::new(),
            Msg::NextGenre => {
                self.genre = (self.genre + 1) % self.genres.len();
                self.refilter()
            }
            Msg::PrevGenre => {
                let n = self.genres.len();
                self.genre = (self.genre + n - 1) % n;
                self.refilter()
            }
            Msg::EnterSearch => {
                self.search_mode = true;
                Vec::new()
            }
            Msg::ExitSearch => {
                self.search_mode = false;
                Vec::new()
            }
            Msg::ClearSearch => {
                self.search_mode = false;
                if self.query.is_empty() {
                    return Vec::new();
                }
                self.query.clear();
                self.refilter()
            }
            Msg::SearchInput(c) => {
                self.query.push(c);
                self.refilter()
            }
            Msg::SearchBackspace => {
                if self.query.pop().is_none() {
                    return Vec::new();
                }
                self.refilter()
            }

            Msg::CursorDown => {
                if !self.view.is_empty() {
                    self.cursor = (self.cursor + 1) % self.view.len();
                }
                Vec::new()
            }
            Msg::CursorUp => {
                let n = self.view.len();
                if n > 0 {
                    self.cursor = (self.cursor + n - 1) % n;
                }
                Vec::new()
            }
            Msg::Activate => self.play_row(self.cursor),
            Msg::PlayRow(row) => self.play_row(row),
            Msg::Toggle => audio(self.transport.toggle(self.view.len())),
            Msg::Play => match self.transport.state() {
                PlaybackState::Playing => Vec::new(),
                PlaybackState::Paused => audio(self.transport.toggle(self.view.len())),
                PlaybackState::Stopped => self.play_row(self.cursor),
            },
            Msg::Pause => match self.transport.state() {
                PlaybackState::Playing => audio(self.transport.toggle(self.view.len())),
                _ => Vec::new(),
            },
            Msg::Next => {
                let cmd = self.transport.next(&self.view);
                self.after_skip(cmd)
            }
            Msg::Prev => {
                let cmd = self.transport.prev(&self.view);
                self.after_skip(cmd)
            }

            Msg::Ended => {
                self.transport.ended();
                Vec::new()
            }
            Msg::MetadataLoaded(duration) => {
                self.transport.metadata_loaded(duration);
                Vec::new()
            }
            Msg::TimeUpdate(position) => {
                self.transport.time_update(position);
                Vec::new()
            }
            Msg::AudioFailed => {
                self.transport.failed();
                Vec::new()
            }

            Msg::Seek(target) => audio(self.transport.seek(target)),
            Msg::SeekBy(delta) => audio(self.transport.seek_by(delta)),
            Msg::SeekDragStart(value) => {
                self.transport.drag_start(value);
                Vec::new()
            }
            Msg::SeekDragMove(value) => {
                self.transport.drag_move(value);
                Vec::new()
            }
            Msg::SeekDragEnd => audio(self.transport.drag_end()),
            Msg::SetVolume(v) => vec![Command::Audio(self.transport.set_volume(v))],
            Msg::VolumeBy(delta) => {
                let v = self.transport.volume() + delta;
                vec![Command::Audio(self.transport.set_volume(v))]
            }

            Msg::Resize(columns) => {
                self.surface.resize(columns);
                Vec::new()
            }
            Msg::UserGesture => {
                if self.analysis_armed {
                    self.analysis_armed = false;
                    vec![Command::ResumeAnalysis]
                } else {
                    Vec::new()
                }
            }
            Msg::Quit => vec![Command::Quit],
        }
    }

    fn play_row(&mut self, row: usize) -> Vec<Command> {
        match self.transport.play(&self.view, row) {
            Ok(cmd) => {
                self.cursor = row;
                vec![Command::Audio(cmd), Command::RenderPlaylist]
            }
            Err(err) => {
                tracing::debug!(%err, "play ignored");
                Vec::new()
            }
        }
    }

    fn after_skip(&mut self, cmd: Option<TransportCmd>) -> Vec<Command> {
        match cmd {
            Some(cmd) => {
                if let Some(row) = self.transport.current() {
                    self.cursor = row;
                }
                vec![Command::Audio(cmd), Command::RenderPlaylist]
            }
            None => Vec::new(),
        }
    }

    /// Recompute the view from the genre and query, then re-anchor the
    /// playing row and the cursor.
    fn refilter(&mut self) -> Vec<Command> {
        if self.genre >= self.genres.len() {
            self.genre = 0;
        }
        self.view = self
            .titles
            .view(&self.catalog, &self.genres[self.genre], &self.query);
        self.transport.view_changed(&self.view);

        self.cursor = match self.transport.current() {
            Some(row) => row,
            None => self.cursor.min(self.view.len().saturating_sub(1)),
        };
        vec![Command::RenderPlaylist]
    }
}

fn audio(cmd: Option<TransportCmd>) -> Vec<Command> {
    cmd.map(Command::Audio).into_iter().collect()
}
