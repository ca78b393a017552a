use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::error::{Error, Result};

/// Send `tracing` output to the log file. The terminal belongs to the UI, so
/// nothing is written to stdout/stderr. `RUST_LOG` overrides `log.filter`.
pub fn init(settings: &Settings) -> Result<()> {
    let Some(path) = settings.log_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
