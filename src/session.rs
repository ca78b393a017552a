//! Playback session core.
//!
//! [`PlaybackController`] is the only type the UI needs; the rest are its
//! building blocks and are public so they can be used and tested alone.

mod controller;
mod mode;
mod playlist;
mod position;
mod scheduler;
mod search;
mod selector;
mod timer;

pub use controller::{PlaybackController, PlaybackView, SessionPhase};
pub use mode::{ModeSelector, PlayMode};
pub use playlist::PlaylistStore;
pub use position::{PositionTracker, StatusOutcome, format_position};
pub use scheduler::{Scheduler, TaskId, TaskKind};
pub use search::{SearchNavigator, SearchOutcome};
pub use selector::{Selection, TrackSelector};
pub use timer::{TimerGuard, TimerState};

#[cfg(test)]
mod fakes;
