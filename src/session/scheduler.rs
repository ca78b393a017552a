//! Cooperative task scheduler.
//!
//! Nothing runs on its own: the owner calls [`Scheduler::due`] with the
//! current instant and handles whatever came due. Tasks are addressed by
//! [`TaskId`], so a cancelled task can never be confused with a newer one of
//! the same kind.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Read engine status into the position tracker.
    PositionPoll,
    /// Sleep timer deadline.
    SleepTimer,
}

#[derive(Debug, Clone)]
struct Task {
    id: TaskId,
    kind: TaskKind,
    due: Instant,
    every: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    next_id: u64,
    tasks: Vec<Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: TaskKind, due: Instant, every: Option<Duration>) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.tasks.push(Task {
            id,
            kind,
            due,
            every,
        });
        id
    }

    /// Run `kind` once at `due`.
    pub fn once(&mut self, kind: TaskKind, due: Instant) -> TaskId {
        self.push(kind, due, None)
    }

    /// Run `kind` at `first`, then every `period` after it fired.
    pub fn every(&mut self, kind: TaskKind, first: Instant, period: Duration) -> TaskId {
        self.push(kind, first, Some(period.max(Duration::from_millis(1))))
    }

    /// Drop a task. Returns false if it already fired or never existed.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// How many tasks of `kind` are outstanding.
    pub fn pending(&self, kind: TaskKind) -> usize {
        self.tasks.iter().filter(|t| t.kind == kind).count()
    }

    /// Earliest deadline, for callers that want to sleep until then.
    pub fn next_due(&self) -> Option<Instant> {
        self.tasks.iter().map(|t| t.due).min()
    }

    /// Collect every task due at `now`, earliest first.
    ///
    /// One-shot tasks are removed. Repeating tasks fire at most once per call
    /// and are rescheduled one period after `now`, so a stalled caller does
    /// not get a burst of catch-up ticks.
    pub fn due(&mut self, now: Instant) -> Vec<(TaskId, TaskKind)> {
        let mut fired: Vec<(Instant, TaskId, TaskKind)> = Vec::new();

        self.tasks.retain_mut(|t| {
            if t.due > now {
                return true;
            }
            fired.push((t.due, t.id, t.kind));
            match t.every {
                Some(period) => {
                    t.due = now + period;
                    true
                }
                None => false,
            }
        });

        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, id, kind)| (id, kind)).collect()
    }
}
