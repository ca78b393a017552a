//! Audio engine boundary.
//!
//! The playback core drives any [`AudioEngine`]: one track loaded at a time,
//! transport commands, and a pollable [`EngineStatus`]. [`RodioEngine`] is
//! the real adapter; tests script their own.

mod output;
mod probe;
mod sink;
mod types;

pub use output::RodioEngine;
pub use probe::probe_duration;
pub use types::{EngineStatus, TrackHandle};

use crate::error::EngineError;

/// An exclusively owned audio output that holds at most one loaded track.
///
/// Calls are made from a single thread of control and never overlap.
pub trait AudioEngine {
    /// Acquire the output device. Must run before `load`.
    fn initialize(&mut self) -> Result<(), EngineError>;

    /// Load `uri` paused at position 0, releasing any previous track first.
    fn load(&mut self, uri: &str) -> Result<TrackHandle, EngineError>;

    fn play(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    /// Jump to `position_ms` of the loaded track, keeping play/pause state.
    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError>;

    /// Current status, or `None` when nothing is loaded.
    fn status(&mut self) -> Option<EngineStatus>;

    /// Release the loaded track. Unloading with nothing loaded is a no-op.
    fn unload(&mut self) -> Result<(), EngineError>;

    /// Release the output device.
    fn dispose(&mut self) -> Result<(), EngineError>;
}

#[cfg(test)]
mod tests;
