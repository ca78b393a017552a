use std::path::PathBuf;

use serde::Deserialize;

use crate::session::PlayMode;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadence/config.toml` or `~/.config/cadence/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CADENCE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub playback: PlaybackSettings,
    pub library: LibrarySettings,
    pub storage: StorageSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// How often the engine status is polled while a category is open (milliseconds).
    pub poll_interval_ms: u64,
    /// Number of seconds to jump when seeking backward/forward.
    pub seek_step_seconds: u64,
    /// Mode used when none has been persisted yet.
    pub default_mode: ModeSetting,
    /// Sleep timer presets offered by the UI, in hours.
    pub timer_options_hours: Vec<f64>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 250,
            seek_step_seconds: 5,
            default_mode: ModeSetting::Sequence,
            timer_options_hours: vec![0.5, 1.0, 1.5, 2.0, 3.0],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSetting {
    #[serde(alias = "in-order", alias = "in_order", alias = "loop-all")]
    Sequence,
    #[serde(alias = "repeat-one", alias = "repeat_one", alias = "loop-one")]
    Single,
    #[serde(alias = "shuffle")]
    Random,
}

impl From<ModeSetting> for PlayMode {
    fn from(value: ModeSetting) -> Self {
        match value {
            ModeSetting::Sequence => PlayMode::Sequence,
            ModeSetting::Single => PlayMode::Single,
            ModeSetting::Random => PlayMode::Random,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks while importing directories.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
                "m4a".into(),
            ],
            follow_links: true,
            include_hidden: false,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Explicit store file. Defaults to `<data dir>/store.toml`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Prefix tracks already played in the current round with a marker.
    pub show_played_marker: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ cadence ~ ".to_string(),
            show_played_marker: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Explicit log file. Defaults to `<data dir>/cadence.log`.
    pub path: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `cadence=debug`.
    /// `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            path: None,
            filter: "info".to_string(),
        }
    }
}
