//! cadence: a terminal player for named audio collections.
//!
//! Tracks are grouped into categories. Each category remembers its current
//! track and position, the play mode is global, and a sleep timer can pause
//! playback. [`session::PlaybackController`] owns all of that; the terminal
//! front-end in [`runtime`] only forwards key presses to it.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod library;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod ui;
