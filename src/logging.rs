use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{eyre, Result};
use tracing_subscriber::EnvFilter;

/// Log to a file; the terminal belongs to the UI.
///
/// Returns the log file path.
pub fn init() -> Result<PathBuf> {
    let dir = dirs::cache_dir()
        .map(|d| d.join("event-parser"))
        .ok_or_else(|| eyre!("no cache directory on this system"))?;
    std::fs::create_dir_all(&dir)?;

    let path = dir.join("event-parser.log");
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| eyre!("failed to install logger: {err}"))?;

    Ok(path)
}
