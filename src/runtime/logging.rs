use std::fs::{self, OpenOptions};
use std::path::Path;

/// Route `tracing` output to `log_path`. The terminal belongs to the UI, so
/// nothing is written to stderr once the screen is taken over.
pub fn init_logging(log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = log_path.parent() {
        fs::create_dir_all(dir)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    // RUST_LOG overrides the default level.
    let log_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter)
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;

    tracing::info!(log = %log_path.display(), "tembang starting");
    Ok(())
}
