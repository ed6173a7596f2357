use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Command, Msg};
use crate::audio::{AnalysisTap, AudioCmd, AudioPlayer};
use crate::catalog::Catalog;
use crate::clock::ClockHandle;
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::input::{MouseMapper, audio_event_msg, control_msg, map_key};
use crate::runtime::mpris_sync::update_mpris;
use crate::starfield::Starfield;
use crate::transport::TransportCmd;
use crate::ui::{self, Hitboxes, Scene};
use crate::visualizer::Analyser;

/// Everything the loop talks to besides the model.
pub struct Services<'a> {
    pub settings: &'a config::Settings,
    pub audio: &'a AudioPlayer,
    pub tap: &'a AnalysisTap,
    pub mpris: &'a MprisHandle,
    pub clock: Option<&'a ClockHandle>,
    pub catalog_rx: Receiver<Catalog>,
    pub control_rx: Receiver<ControlCmd>,
}

/// State tracked by the runtime event loop across iterations.
struct EventLoopState {
    analyser: Analyser,
    samples: Vec<f32>,
    bins: Vec<u8>,
    starfield: Option<Starfield>,
    hit: Hitboxes,
    mouse: MouseMapper,
    next_frame: Instant,
    frame: Duration,
}

impl EventLoopState {
    fn new(settings: &config::Settings) -> Self {
        let v = &settings.visualizer;
        let analyser = Analyser::new(v.fft_size, v.smoothing, v.min_db, v.max_db);
        let bins = vec![0u8; analyser.bin_count()];
        let starfield = settings.starfield.enabled.then(|| {
            Starfield::new(settings.starfield.stars, settings.starfield.speed, None)
        });
        Self {
            samples: Vec::with_capacity(analyser.fft_size()),
            analyser,
            bins,
            starfield,
            hit: Hitboxes::default(),
            mouse: MouseMapper::default(),
            next_frame: Instant::now(),
            frame: Duration::from_secs_f64(1.0 / f64::from(v.fps.max(1))),
        }
    }
}

/// Main terminal event loop: handles input, engine events, bus commands and
/// drawing. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    services: &Services,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = services.settings;
    let mut state = EventLoopState::new(settings);

    loop {
        let mut inbox: Vec<Msg> = Vec::new();

        if let Ok(catalog) = services.catalog_rx.try_recv() {
            inbox.push(Msg::CatalogLoaded(catalog));
        }
        while let Some(ev) = services.audio.poll_event() {
            inbox.extend(audio_event_msg(ev, app.transport().generation()));
        }
        while let Ok(cmd) = services.control_rx.try_recv() {
            inbox.push(control_msg(cmd, app.transport().state()));
        }
        for msg in inbox {
            if dispatch(app, services, &mut state, msg) {
                return Ok(());
            }
        }

        if Instant::now() >= state.next_frame {
            draw_frame(terminal, app, services, &mut state)?;
            update_mpris(services.mpris, app);
        }

        let timeout = state.next_frame.saturating_duration_since(Instant::now());
        if !event::poll(timeout)? {
            continue;
        }
        let msg = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if dispatch(app, services, &mut state, Msg::UserGesture) {
                    return Ok(());
                }
                map_key(key, app.is_searching(), &settings.controls)
            }
            Event::Mouse(mouse) => {
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
                    dispatch(app, services, &mut state, Msg::UserGesture);
                }
                state.mouse.map(
                    mouse,
                    &state.hit,
                    app.view().len(),
                    app.transport().duration(),
                )
            }
            Event::Resize(..) => {
                state.next_frame = Instant::now();
                None
            }
            _ => None,
        };
        if let Some(msg) = msg {
            if dispatch(app, services, &mut state, msg) {
                return Ok(());
            }
        }
    }
}

fn draw_frame(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    services: &Services,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = services.settings;

    services.tap.snapshot_into(&mut state.samples);
    state
        .analyser
        .byte_frequency_data(&state.samples, &mut state.bins);
    if let Some(field) = state.starfield.as_mut() {
        field.tick();
    }
    let clock = services.clock.map(ClockHandle::text);

    let scene = Scene {
        ui: &settings.ui,
        controls: &settings.controls,
        bins: &state.bins,
        clock: clock.as_deref(),
        starfield: state.starfield.as_ref(),
        spectrum_rows: settings.visualizer.rows,
    };
    let mut hit = Hitboxes::default();
    terminal.draw(|f| {
        hit = ui::draw(f, app, &scene);
    })?;

    // The surface follows the spectrum's width; picked up on the next frame.
    if hit.spectrum.width != state.hit.spectrum.width {
        app.update(Msg::Resize(hit.spectrum.width));
    }
    state.hit = hit;

    let now = Instant::now();
    state.next_frame += state.frame;
    if state.next_frame < now {
        state.next_frame = now + state.frame;
    }
    Ok(())
}

/// Apply `msg` and carry out the resulting commands. Returns `true` when the
/// session should end.
fn dispatch(app: &mut App, services: &Services, state: &mut EventLoopState, msg: Msg) -> bool {
    for cmd in app.update(msg) {
        match cmd {
            Command::Audio(cmd) => send_audio(app, services.audio, cmd),
            Command::RenderPlaylist => state.next_frame = Instant::now(),
            Command::ResumeAnalysis => {
                if services.tap.resume() {
                    tracing::debug!("analysis tap resumed");
                }
            }
            Command::Quit => {
                let fade = Duration::from_millis(services.settings.audio.quit_fade_out_ms);
                services.audio.quit_softly(fade);
                return true;
            }
        }
    }
    false
}

fn send_audio(app: &App, audio: &AudioPlayer, cmd: TransportCmd) {
    let cmd = match cmd {
        TransportCmd::Load {
            catalog_index,
            generation,
        } => match app.catalog().source_for(catalog_index) {
            Some(source) => AudioCmd::Load { generation, source },
            None => {
                tracing::warn!(catalog_index, "no such track in the catalog");
                return;
            }
        },
        TransportCmd::Resume => AudioCmd::Resume,
        TransportCmd::Pause => AudioCmd::Pause,
        TransportCmd::Seek(secs) => AudioCmd::Seek(Duration::from_secs_f64(secs.max(0.0))),
        TransportCmd::SetVolume(v) => AudioCmd::SetVolume(v),
    };
    if audio.send(cmd).is_err() {
        tracing::debug!("audio thread is gone; command dropped");
    }
}
