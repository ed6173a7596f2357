use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/tembang/config.toml` or `~/.config/tembang/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `TEMBANG__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub visualizer: VisualizerSettings,
    pub clock: ClockSettings,
    pub starfield: StarfieldSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path or `http(s)` URL of the song list. The first CLI argument wins.
    pub source: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            source: "music-list.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume at startup, 0.0 to 1.0.
    pub initial_volume: f32,
    /// Interval between position reports while playing (milliseconds).
    pub time_update_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            time_update_ms: 250,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which time fields to show next to the progress bar, and in what order.
    ///
    /// Example: ["elapsed", "total", "remaining"]
    pub time_fields: Vec<TimeField>,

    /// Separator used to join `time_fields`.
    pub time_separator: String,

    /// Show the artist next to each title in the playlist.
    pub playlist_show_artist: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ tembang ~ ".to_string(),
            time_fields: vec![TimeField::Elapsed, TimeField::Total],
            time_separator: " / ".to_string(),
            playlist_show_artist: false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeField {
    Elapsed,
    Total,
    Remaining,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f32,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            scrub_seconds: 5,
            volume_step: 0.05,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VisualizerSettings {
    /// Analyser FFT size; half of it is the number of bars.
    pub fft_size: usize,
    /// Temporal smoothing between frames, 0.0 to 1.0.
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,
    /// Frames per second for the render loop.
    pub fps: u32,
    /// Terminal rows given to the spectrum.
    pub rows: u16,
}

impl Default for VisualizerSettings {
    fn default() -> Self {
        Self {
            fft_size: 64,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
            fps: 60,
            rows: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClockSettings {
    pub enabled: bool,
    /// Weekday names, Sunday first.
    pub weekdays: Vec<String>,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            weekdays: crate::clock::DEFAULT_WEEKDAYS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StarfieldSettings {
    pub enabled: bool,
    pub stars: usize,
    /// Depth travelled per frame (the field is 1.0 deep).
    pub speed: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            stars: 48,
            speed: 0.004,
        }
    }
}
