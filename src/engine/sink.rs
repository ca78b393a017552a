//! Utilities for creating `rodio` sinks from track files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::EngineError;

/// A paused sink plus whatever the decoder knew about the track length.
pub(super) struct PreparedSink {
    pub sink: Sink,
    pub total: Option<Duration>,
}

/// Create a paused `Sink` for the file at `path` that starts at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<PreparedSink, EngineError> {
    let file = File::open(path).map_err(|source| EngineError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| EngineError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let total = decoder.total_duration();

    let sink = Sink::connect_new(stream.mixer());
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    sink.append(decoder.skip_duration(start_at));
    sink.pause();

    Ok(PreparedSink { sink, total })
}
