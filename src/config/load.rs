use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` layers an optional config file under environment
/// variables (prefix `CADENCE__`) and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENCE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let poll = self.playback.poll_interval_ms;
        if !(100..=500).contains(&poll) {
            return Err(format!(
                "playback.poll_interval_ms must be within 100..=500, got {poll}"
            ));
        }
        if self.playback.seek_step_seconds == 0 {
            return Err("playback.seek_step_seconds must be >= 1".to_string());
        }
        if let Some(bad) = self
            .playback
            .timer_options_hours
            .iter()
            .find(|h| !h.is_finite() || **h <= 0.0)
        {
            return Err(format!(
                "playback.timer_options_hours entries must be positive, got {bad}"
            ));
        }
        Ok(())
    }

    /// Where the key-value store file lives.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.storage
            .path
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("store.toml")))
    }

    /// Where log output goes.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .path
            .clone()
            .or_else(|| default_data_dir().map(|d| d.join("cadence.log")))
    }
}

/// Resolve the config path from `CADENCE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENCE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadence/config.toml`
/// or `~/.config/cadence/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    };

    config_home.map(|d| d.join("cadence").join("config.toml"))
}

/// `$XDG_DATA_HOME/cadence`, or `~/.local/share/cadence`.
pub fn default_data_dir() -> Option<PathBuf> {
    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("cadence"))
}
