//! Single-shot sleep timer.

use std::time::{Duration, Instant};

use crate::error::TimerError;

use super::scheduler::{Scheduler, TaskId, TaskKind};

/// Observable timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    pub active: bool,
    pub deadline: Option<Instant>,
}

#[derive(Debug, Default)]
pub struct TimerGuard {
    live: Option<(TaskId, Instant)>,
}

impl TimerGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer `hours` from `now`, replacing any pending one.
    pub fn start(
        &mut self,
        scheduler: &mut Scheduler,
        hours: f64,
        now: Instant,
    ) -> Result<Instant, TimerError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(TimerError::InvalidDuration(hours));
        }
        let after = Duration::try_from_secs_f64(hours * 3600.0)
            .map_err(|_| TimerError::InvalidDuration(hours))?;

        self.cancel(scheduler);

        let deadline = now + after;
        let id = scheduler.once(TaskKind::SleepTimer, deadline);
        self.live = Some((id, deadline));
        tracing::info!(hours, "sleep timer armed");
        Ok(deadline)
    }

    /// Disarm and release the scheduler task. Returns whether one was live.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) -> bool {
        match self.live.take() {
            Some((id, _)) => {
                scheduler.cancel(id);
                tracing::debug!("sleep timer cancelled");
                true
            }
            None => false,
        }
    }

    /// Consume a fired task. Only the live timer's task counts; anything
    /// else is a stale fire and returns false.
    pub fn expire(&mut self, fired: TaskId) -> bool {
        match self.live {
            Some((id, _)) if id == fired => {
                self.live = None;
                true
            }
            _ => false,
        }
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            active: self.live.is_some(),
            deadline: self.live.map(|(_, d)| d),
        }
    }
}
