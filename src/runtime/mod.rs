use std::env;
use std::sync::mpsc;

use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::{AnalysisTap, AudioPlayer};
use crate::clock;
use crate::config;
use crate::mpris::ControlCmd;

mod args;
mod event_loop;
mod input;
mod logging;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = match args::Args::parse(env::args().skip(1)) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("tembang: {msg}\n\n{}", args::USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        print!("{}", args::USAGE);
        return Ok(());
    }

    let log_path = config::default_log_path();
    if let Err(e) = logging::init_logging(&log_path) {
        eprintln!("tembang: logging disabled ({}): {e}", log_path.display());
    }

    let settings = settings::load_settings();
    if args.print_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        return Ok(());
    }

    let source = args
        .catalog
        .unwrap_or_else(|| settings.catalog.source.clone());
    let catalog_rx = startup::spawn_catalog_loader(source);

    let tap = AnalysisTap::new(settings.visualizer.fft_size);
    let audio_player = AudioPlayer::new(settings.audio.clone(), tap.clone());
    let mut app = App::new(Default::default(), settings.audio.initial_volume);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);
    mpris_sync::update_mpris(&mpris, &app);

    let mut clock = settings
        .clock
        .enabled
        .then(|| clock::spawn_clock(settings.clock.weekdays.clone()));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let services = event_loop::Services {
            settings: &settings,
            audio: &audio_player,
            tap: &tap,
            mpris: &mpris,
            clock: clock.as_ref(),
            catalog_rx,
            control_rx,
        };
        event_loop::run(&mut terminal, &mut app, &services)
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Some(c) = clock.as_mut() {
        c.cancel();
    }
    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("tembang stopped");

    run_result
}
