//! Mirrors engine position into observable state and persists it.
//!
//! Writes are throttled to whole-second changes of the displayed `MM:SS`
//! value. While the user drags the position slider the poll task is
//! cancelled outright; the drag ends with one authoritative seek.

use std::time::Instant;

use crate::engine::{AudioEngine, EngineStatus};
use crate::error::EngineError;
use crate::storage::{self, KeyValueStore};

use super::scheduler::{Scheduler, TaskId, TaskKind};

/// Format milliseconds as `MM:SS` (minutes are not capped at 59).
pub fn format_position(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// What a status sample meant to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Dropped (drag in progress, or finish already signalled).
    Ignored,
    /// Same displayed second as before; nothing written.
    Unchanged,
    /// Position moved to a new second and was persisted.
    Moved,
    /// The track ended; the controller should pick the next one.
    Finished,
}

#[derive(Debug)]
pub struct PositionTracker {
    interval: std::time::Duration,
    poll: Option<TaskId>,
    resume_after_drag: bool,
    dragging: bool,
    position_ms: u64,
    duration_ms: u64,
    slider_ms: u64,
    display: String,
    finish_signalled: bool,
    persist_key: Option<String>,
}

impl PositionTracker {
    pub fn new(interval: std::time::Duration) -> Self {
        Self {
            interval,
            poll: None,
            resume_after_drag: false,
            dragging: false,
            position_ms: 0,
            duration_ms: 0,
            slider_ms: 0,
            display: format_position(0),
            finish_signalled: false,
            persist_key: None,
        }
    }

    /// Persist positions under `key` from now on (`None` stops persisting).
    pub fn bind(&mut self, key: Option<String>) {
        self.persist_key = key;
    }

    /// Forget the previous track; `duration_ms` of 0 means unknown.
    pub fn reset(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
        self.position_ms = 0;
        self.slider_ms = 0;
        self.display = format_position(0);
        self.finish_signalled = false;
    }

    /// Start the poll task unless one is running or a drag holds it off.
    pub fn start_polling(&mut self, scheduler: &mut Scheduler, now: Instant) {
        if self.dragging {
            self.resume_after_drag = true;
            return;
        }
        if self.poll.is_none() {
            let first = now + self.interval;
            self.poll = Some(scheduler.every(TaskKind::PositionPoll, first, self.interval));
        }
    }

    /// Cancel polling and drop any drag in progress.
    pub fn stop_polling(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.poll.take() {
            scheduler.cancel(id);
        }
        self.dragging = false;
        self.resume_after_drag = false;
        self.slider_ms = self.position_ms;
    }

    /// Whether `id` is this tracker's live poll task.
    pub fn owns(&self, id: TaskId) -> bool {
        self.poll == Some(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn slider_ms(&self) -> u64 {
        self.slider_ms
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    fn clamp(&self, ms: u64) -> u64 {
        if self.duration_ms > 0 {
            ms.min(self.duration_ms)
        } else {
            ms
        }
    }

    /// Fold one engine status sample in.
    pub fn apply_status<S: KeyValueStore + ?Sized>(
        &mut self,
        status: &EngineStatus,
        store: &S,
    ) -> StatusOutcome {
        if self.dragging {
            return StatusOutcome::Ignored;
        }
        if status.duration_ms > 0 {
            self.duration_ms = status.duration_ms;
        }
        if status.finished {
            if self.finish_signalled {
                return StatusOutcome::Ignored;
            }
            self.finish_signalled = true;
            return StatusOutcome::Finished;
        }

        let position = self.clamp(status.position_ms);
        let display = format_position(position);
        if display == self.display {
            return StatusOutcome::Unchanged;
        }

        self.position_ms = position;
        self.slider_ms = position;
        self.display = display;
        self.persist(store, position);
        StatusOutcome::Moved
    }

    /// Seek the engine to `value_ms` (clamped) and persist it immediately.
    pub fn commit_seek<E, S>(
        &mut self,
        value_ms: u64,
        engine: &mut E,
        store: &S,
    ) -> Result<u64, EngineError>
    where
        E: AudioEngine + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        let target = self.clamp(value_ms);
        engine.seek(target)?;

        self.position_ms = target;
        self.slider_ms = target;
        self.display = format_position(target);
        self.finish_signalled = false;
        self.persist(store, target);
        Ok(target)
    }

    /// Take over the slider: suspend polling until [`end_drag`](Self::end_drag).
    pub fn begin_drag(&mut self, scheduler: &mut Scheduler) {
        if self.dragging {
            return;
        }
        self.dragging = true;
        self.resume_after_drag = self.poll.is_some();
        if let Some(id) = self.poll.take() {
            scheduler.cancel(id);
        }
    }

    /// Move the slider while dragging. Nothing reaches the engine.
    pub fn drag_to(&mut self, value_ms: u64) {
        if self.dragging {
            self.slider_ms = self.clamp(value_ms);
        }
    }

    /// Finish the drag with one seek to `value_ms`, then resume polling.
    ///
    /// Polling resumes even if the seek fails.
    pub fn end_drag<E, S>(
        &mut self,
        value_ms: u64,
        engine: &mut E,
        store: &S,
        scheduler: &mut Scheduler,
        now: Instant,
    ) -> Result<u64, EngineError>
    where
        E: AudioEngine + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        if !self.dragging {
            return Ok(self.position_ms);
        }
        self.dragging = false;

        let result = self.commit_seek(value_ms, engine, store);
        if result.is_err() {
            self.slider_ms = self.position_ms;
        }

        if std::mem::take(&mut self.resume_after_drag) {
            self.start_polling(scheduler, now);
        }
        result
    }

    /// End a drag without seeking; the slider snaps back to the position.
    pub fn abort_drag(&mut self, scheduler: &mut Scheduler, now: Instant) {
        if !self.dragging {
            return;
        }
        self.dragging = false;
        self.slider_ms = self.position_ms;
        if std::mem::take(&mut self.resume_after_drag) {
            self.start_polling(scheduler, now);
        }
    }

    /// Write `ms` under the bound key, if any.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &S, ms: u64) {
        if let Some(key) = &self.persist_key {
            storage::set_or_warn(store, key, &ms.to_string());
        }
    }
}
