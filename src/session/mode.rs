//! Play modes and the selector that cycles them.

use std::fmt;
use std::str::FromStr;

use crate::storage::{self, KeyValueStore, keys};

/// How the next track is chosen. Global to the app, not per category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum PlayMode {
    /// Playlist order, wrapping after the last track.
    #[default]
    Sequence,
    /// Repeat the current track.
    Single,
    /// Shuffle without repeats until every track has played.
    Random,
}

impl PlayMode {
    pub const ALL: [PlayMode; 3] = [PlayMode::Sequence, PlayMode::Single, PlayMode::Random];

    pub fn as_str(self) -> &'static str {
        match self {
            PlayMode::Sequence => "sequence",
            PlayMode::Single => "single",
            PlayMode::Random => "random",
        }
    }

    /// The one valid transition: Sequence -> Single -> Random -> Sequence.
    pub fn next(self) -> Self {
        match self {
            PlayMode::Sequence => PlayMode::Single,
            PlayMode::Single => PlayMode::Random,
            PlayMode::Random => PlayMode::Sequence,
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "sequence" => Ok(PlayMode::Sequence),
            "single" => Ok(PlayMode::Single),
            "random" => Ok(PlayMode::Random),
            other => Err(format!("unknown play mode {other:?}")),
        }
    }
}

/// Owns the active mode and persists it on every change.
#[derive(Debug, Clone, Default)]
pub struct ModeSelector {
    mode: PlayMode,
}

impl ModeSelector {
    pub fn new(mode: PlayMode) -> Self {
        Self { mode }
    }

    /// Restore the persisted mode, or `fallback` when nothing usable is stored.
    pub fn restore<S: KeyValueStore + ?Sized>(store: &S, fallback: PlayMode) -> Self {
        let mode = match storage::get_or_warn(store, keys::MODE) {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                tracing::warn!(error = %e, "ignoring persisted play mode");
                fallback
            }),
            None => fallback,
        };
        Self { mode }
    }

    pub fn current(&self) -> PlayMode {
        self.mode
    }

    /// Step to the next mode and persist it immediately.
    pub fn advance<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> PlayMode {
        self.mode = self.mode.next();
        storage::set_or_warn(store, keys::MODE, self.mode.as_str());
        tracing::info!(mode = %self.mode, "play mode changed");
        self.mode
    }
}
