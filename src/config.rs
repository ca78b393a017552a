//! Configuration loader and schema types.
//!
//! This module exposes the settings that shape a playback session (poll
//! cadence, seek step, timer presets), import filtering, where the store
//! and log live, and a couple of UI knobs.

mod load;
mod schema;

pub use load::{default_config_path, default_data_dir, resolve_config_path};
pub use schema::*;
