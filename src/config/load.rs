use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `TEMBANG__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("TEMBANG")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let v = &self.visualizer;
        if !v.fft_size.is_power_of_two() || !(32..=32768).contains(&v.fft_size) {
            return Err("visualizer.fft_size must be a power of two in 32..=32768".to_string());
        }
        if !(0.0..=1.0).contains(&v.smoothing) {
            return Err("visualizer.smoothing must be within 0.0..=1.0".to_string());
        }
        if !v.min_db.is_finite() || !v.max_db.is_finite() || v.min_db >= v.max_db {
            return Err("visualizer.min_db must be below visualizer.max_db".to_string());
        }
        if v.fps == 0 {
            return Err("visualizer.fps must be >= 1".to_string());
        }
        if !(1..=64).contains(&v.rows) {
            return Err("visualizer.rows must be within 1..=64".to_string());
        }
        let step = self.controls.volume_step;
        if !(step > 0.0 && step <= 1.0) {
            return Err("controls.volume_step must be within (0.0, 1.0]".to_string());
        }
        if !(0.0..=1.0).contains(&self.audio.initial_volume) {
            return Err("audio.initial_volume must be within 0.0..=1.0".to_string());
        }
        if self.clock.weekdays.len() != 7 {
            return Err("clock.weekdays must list exactly 7 names, Sunday first".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `TEMBANG_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("TEMBANG_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/tembang/config.toml`
/// or `~/.config/tembang/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("tembang").join("config.toml"))
}

/// Compute the log file path under `$XDG_STATE_HOME/tembang/tembang.log`
/// or `~/.local/state/tembang/tembang.log`, falling back to the temp dir.
pub fn default_log_path() -> PathBuf {
    xdg_dir("XDG_STATE_HOME", ".local/state")
        .unwrap_or_else(env::temp_dir)
        .join("tembang")
        .join("tembang.log")
}

fn xdg_dir(var: &str, home_relative: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_relative))
    }
}
