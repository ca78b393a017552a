use crate::config;
use crate::error::{Error, Result};

/// Load and validate settings.
pub fn try_load_settings() -> Result<config::Settings> {
    let settings = config::Settings::load()?;
    settings.validate().map_err(Error::InvalidConfig)?;
    Ok(settings)
}

pub fn load_settings() -> config::Settings {
    match try_load_settings() {
        Ok(s) => s,
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            eprintln!("cadence: {e}; using defaults");
            config::Settings::default()
        }
    }
}
