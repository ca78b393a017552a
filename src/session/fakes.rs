//! Scripted engine and journaling store shared by the session tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::engine::{AudioEngine, EngineStatus, TrackHandle};
use crate::error::{EngineError, StorageError};
use crate::storage::{KeyValueStore, MemoryStore};

/// Ordered record of engine calls and store writes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub fn index_of(&self, entry: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e == entry)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|e| *e == entry).count()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.0.borrow().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Debug, Default)]
struct EngineState {
    initialized: bool,
    loaded: Option<String>,
    playing: bool,
    position_ms: u64,
    duration_ms: u64,
    finished: bool,
    failing: Vec<&'static str>,
}

/// Engine double. Clones share state, so a test keeps one handle while the
/// controller owns another.
#[derive(Debug, Clone)]
pub struct FakeEngine {
    state: Rc<RefCell<EngineState>>,
    journal: Journal,
}

impl FakeEngine {
    pub const DURATION_MS: u64 = 180_000;

    pub fn new(journal: Journal) -> Self {
        let state = EngineState {
            duration_ms: Self::DURATION_MS,
            ..EngineState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
            journal,
        }
    }

    /// Make every future call to `op` fail.
    pub fn fail_on(&self, op: &'static str) {
        self.state.borrow_mut().failing.push(op);
    }

    pub fn heal(&self) {
        self.state.borrow_mut().failing.clear();
    }

    pub fn set_duration(&self, ms: u64) {
        self.state.borrow_mut().duration_ms = ms;
    }

    /// Pretend playback progressed to `ms`.
    pub fn advance_to(&self, ms: u64) {
        self.state.borrow_mut().position_ms = ms;
    }

    /// Run the track to its end; like a drained sink, it stops playing.
    pub fn finish(&self) {
        let mut s = self.state.borrow_mut();
        s.position_ms = s.duration_ms;
        s.finished = true;
        s.playing = false;
    }

    pub fn loaded(&self) -> Option<String> {
        self.state.borrow().loaded.clone()
    }

    pub fn playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn position(&self) -> u64 {
        self.state.borrow().position_ms
    }

    pub fn initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    fn check(&self, op: &'static str) -> Result<(), EngineError> {
        if self.state.borrow().failing.contains(&op) {
            self.journal.push(format!("engine.{op} failed"));
            return Err(EngineError::Rejected(op.to_string()));
        }
        Ok(())
    }

    fn require_loaded(&self) -> Result<(), EngineError> {
        if self.state.borrow().loaded.is_none() {
            return Err(EngineError::NothingLoaded);
        }
        Ok(())
    }
}

impl AudioEngine for FakeEngine {
    fn initialize(&mut self) -> Result<(), EngineError> {
        self.check("initialize")?;
        self.journal.push("engine.initialize");
        self.state.borrow_mut().initialized = true;
        Ok(())
    }

    fn load(&mut self, uri: &str) -> Result<TrackHandle, EngineError> {
        self.check("load")?;
        if !self.state.borrow().initialized {
            return Err(EngineError::NotInitialized);
        }
        self.journal.push(format!("engine.load {uri}"));
        let mut s = self.state.borrow_mut();
        s.loaded = Some(uri.to_string());
        s.playing = false;
        s.position_ms = 0;
        s.finished = false;
        Ok(TrackHandle {
            duration_ms: Some(s.duration_ms),
        })
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.check("play")?;
        self.require_loaded()?;
        self.journal.push("engine.play");
        self.state.borrow_mut().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.check("pause")?;
        self.require_loaded()?;
        self.journal.push("engine.pause");
        self.state.borrow_mut().playing = false;
        Ok(())
    }

    fn seek(&mut self, position_ms: u64) -> Result<(), EngineError> {
        self.check("seek")?;
        self.require_loaded()?;
        self.journal.push(format!("engine.seek {position_ms}"));
        let mut s = self.state.borrow_mut();
        s.position_ms = position_ms;
        s.finished = false;
        Ok(())
    }

    fn status(&mut self) -> Option<EngineStatus> {
        let s = self.state.borrow();
        s.loaded.as_ref()?;
        Some(EngineStatus {
            position_ms: s.position_ms,
            duration_ms: s.duration_ms,
            is_playing: s.playing,
            finished: s.finished,
        })
    }

    fn unload(&mut self) -> Result<(), EngineError> {
        self.check("unload")?;
        if self.state.borrow().loaded.is_some() {
            self.journal.push("engine.unload");
        }
        let mut s = self.state.borrow_mut();
        s.loaded = None;
        s.playing = false;
        Ok(())
    }

    fn dispose(&mut self) -> Result<(), EngineError> {
        self.check("dispose")?;
        self.journal.push("engine.dispose");
        self.state.borrow_mut().initialized = false;
        Ok(())
    }
}

/// [`MemoryStore`] that journals writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct JournalStore {
    inner: MemoryStore,
    journal: Journal,
    broken: Cell<bool>,
}

impl JournalStore {
    pub fn new(journal: Journal) -> Self {
        Self {
            inner: MemoryStore::new(),
            journal,
            broken: Cell::new(false),
        }
    }

    /// Fail every subsequent write.
    pub fn break_writes(&self) {
        self.broken.set(true);
    }

    fn refuse(&self) -> Result<(), StorageError> {
        if self.broken.get() {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl KeyValueStore for JournalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.refuse()?;
        self.journal.push(format!("store.set {key}"));
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.refuse()?;
        self.journal.push(format!("store.remove {key}"));
        self.inner.remove(key)
    }
}
