//! `rodio`-backed engine.
//!
//! Seeking rebuilds the sink and skips into the file, and elapsed time is
//! tracked with a start instant plus an accumulator so pauses do not count.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::EngineError;

use super::AudioEngine;
use super::probe::probe_duration;
use super::sink::create_sink_at;
use super::types::{EngineStatus, TrackHandle};

struct Loaded {
    path: PathBuf,
    sink: Sink,
    duration: Option<Duration>,
    paused: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        let raw = self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed());
        match self.duration {
            Some(total) => raw.min(total),
            None => raw,
        }
    }

    fn finished(&self) -> bool {
        !self.paused && self.sink.empty()
    }
}

/// Plays files from the local filesystem through the default output device.
#[derive(Default)]
pub struct RodioEngine {
    stream: Option<OutputStream>,
    loaded: Option<Loaded>,
}

impl RodioEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn stream(&self) -> Result<&OutputStream, EngineError> {
        self.stream.as_ref().ok_or(EngineError::NotInitialized)
    }

    fn loaded_mut(&mut self) -> Result<&mut Loaded, EngineError> {
        self.loaded.as_mut().ok_or(EngineError::NothingLoaded)
    }

    /// Stop the old sink and replace it with a fresh one at `start_at`.
    fn rebuild(&mut self, start_at: Duration) -> Result<(), EngineError> {
        let path = match &self.loaded {
            Some(l) => l.path.clone(),
            None => return Err(EngineError::NothingLoaded),
        };
        let prepared = create_sink_at(self.stream()?, &path, start_at)?;

        let loaded = self.loaded_mut()?;
        loaded.sink.stop();
        loaded.sink = prepared.sink;
        loaded.accumulated = start_at;
        if loaded.paused {
            loaded.started_at = None;
        } else {
            loaded.sink.play();
            loaded.started_at = Some(Instant::now());
        }
        Ok(())
    }
}

impl AudioEngine for RodioEngine {
    fn initialize(&mut self) -> Result<(), EngineError> {
        if self.stream.is_some() {
            return Ok(());
        }
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::NoOutputDevice(e.to_string()))?;
        // rodio logs to stderr when the stream is dropped; that would scribble
        // over the terminal UI.
        stream.log_on_drop(false);
        self.stream = Some(stream);
        tracing::debug!("audio output opened");
        Ok(())
    }

    fn load(&mut self, uri: &str) -> Result<TrackHandle, EngineError> {
        self.unload()?;

        let path = PathBuf::from(uri);
        let prepared = create_sink_at(self.stream()?, &path, Duration::ZERO)?;
        let duration = prepared.total.or_else(|| probe_duration(&path));

        self.loaded = Some(Loaded {
            path,
            sink: prepared.sink,
            duration,
            paused: true,
            started_at: None,
            accumulated: Duration::ZERO,
        });

        Ok(TrackHandle {
            duration_ms: duration.map(|d| d.as_millis() as u64),
        })
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let ended = {
            let loaded = self.loaded_mut()?;
            loaded.sink.empty()
        };
        if ended {
            // Nothing left in the sink: start the file over.
            self.rebuild(Duration::ZERO)?;
        }

        let loaded = self.loaded_mut()?;
        if loaded.paused {
            loaded.sink.play();
            loaded.paused = false;
            loaded.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        let loaded = self.loaded_mut()?;
        if !loaded.paused {
            loaded.sink.pause();
            if let Some(st) = loaded.started_at.take() {
                loaded.accumulated += st.elapsed();
            }
            loaded.paused = true;
        }
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        let target = Duration::from_millis(position_ms);
        let target = match self.loaded_mut()?.duration {
            Some(total) => target.min(total),
            None => target,
        };
        self.rebuild(target)
    }

    fn status(&mut self) -> Option<EngineStatus> {
        let loaded = self.loaded.as_ref()?;
        let finished = loaded.finished();
        Some(EngineStatus {
            position_ms: loaded.elapsed().as_millis() as u64,
            duration_ms: loaded.duration.map_or(0, |d| d.as_millis() as u64),
            is_playing: !loaded.paused && !finished,
            finished,
        })
    }

    fn unload(&mut self) -> Result<(), EngineError> {
        if let Some(loaded) = self.loaded.take() {
            loaded.sink.stop();
        }
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), EngineError> {
        self.unload()?;
        self.stream = None;
        Ok(())
    }
}
