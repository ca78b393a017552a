//! The playback session controller.
//!
//! Single entry point for the UI: every user intent lands here, mutates the
//! playlist/mode state, drives the engine and persists through the store.
//! Time only moves when the owner calls [`PlaybackController::tick`].

use std::time::{Duration, Instant};

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::config::PlaybackSettings;
use crate::engine::AudioEngine;
use crate::error::{EngineError, TimerError};
use crate::library::{CategoryStore, Track};
use crate::storage::{self, KeyValueStore, keys};

use super::mode::{ModeSelector, PlayMode};
use super::playlist::PlaylistStore;
use super::position::{PositionTracker, StatusOutcome};
use super::scheduler::{Scheduler, TaskKind};
use super::search::{SearchNavigator, SearchOutcome};
use super::selector::{Selection, TrackSelector};
use super::timer::TimerGuard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No track loaded.
    Idle,
    LoadedPaused,
    LoadedPlaying,
}

/// Read-only snapshot handed to the UI.
#[derive(Debug, Clone)]
pub struct PlaybackView {
    pub category: Option<String>,
    pub current_track: Option<Track>,
    pub is_playing: bool,
    pub position_display: String,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub slider_value: u64,
    pub dragging: bool,
    pub mode: PlayMode,
    pub timer_active: bool,
    pub timer_deadline: Option<Instant>,
    pub search_result_index: Option<usize>,
    pub phase: SessionPhase,
}

pub struct PlaybackController<E, S, R = ThreadRng> {
    engine: E,
    store: S,
    rng: R,
    modes: ModeSelector,
    playlist: Option<PlaylistStore>,
    current: Option<Track>,
    is_playing: bool,
    tracker: PositionTracker,
    timer: TimerGuard,
    search: SearchNavigator,
    search_result: Option<usize>,
    scheduler: Scheduler,
    notice: Option<String>,
}

impl<E, S, R> PlaybackController<E, S, R>
where
    E: AudioEngine,
    S: KeyValueStore,
    R: Rng,
{
    /// Build a controller. The persisted mode is restored here; the engine
    /// is not touched until [`initialize`](Self::initialize).
    pub fn new(engine: E, store: S, rng: R, settings: &PlaybackSettings) -> Self {
        let modes = ModeSelector::restore(&store, settings.default_mode.into());
        let interval = Duration::from_millis(settings.poll_interval_ms);

        Self {
            engine,
            store,
            rng,
            modes,
            playlist: None,
            current: None,
            is_playing: false,
            tracker: PositionTracker::new(interval),
            timer: TimerGuard::new(),
            search: SearchNavigator::new(),
            search_result: None,
            scheduler: Scheduler::new(),
            notice: None,
        }
    }

    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.engine
            .initialize()
            .map_err(|e| self.engine_failed("initialize audio", e))
    }

    pub fn dispose(&mut self) -> Result<(), EngineError> {
        self.engine.dispose()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn category(&self) -> Option<&str> {
        self.playlist.as_ref().map(PlaylistStore::category)
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.as_ref().map(PlaylistStore::tracks).unwrap_or(&[])
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn mode(&self) -> PlayMode {
        self.modes.current()
    }

    /// Earliest scheduled task, so the UI loop knows how long it may block.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    /// Most recent user-facing message, cleared on read.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.current, self.is_playing) {
            (None, _) => SessionPhase::Idle,
            (Some(_), false) => SessionPhase::LoadedPaused,
            (Some(_), true) => SessionPhase::LoadedPlaying,
        }
    }

    pub fn view(&self) -> PlaybackView {
        let timer = self.timer.state();
        PlaybackView {
            category: self.category().map(str::to_string),
            current_track: self.current.clone(),
            is_playing: self.is_playing,
            position_display: self.tracker.display().to_string(),
            position_ms: self.tracker.position_ms(),
            duration_ms: self.tracker.duration_ms(),
            slider_value: self.tracker.slider_ms(),
            dragging: self.tracker.is_dragging(),
            mode: self.modes.current(),
            timer_active: timer.active,
            timer_deadline: timer.deadline,
            search_result_index: self.search_result,
            phase: self.phase(),
        }
    }

    fn engine_failed(&mut self, action: &str, err: EngineError) -> EngineError {
        tracing::warn!(action, error = %err, "engine request failed");
        self.notice = Some(format!("{action} failed: {err}"));
        err
    }

    // -- session ------------------------------------------------------------

    /// Open `name` and restore its last session without starting playback.
    ///
    /// The remembered track is loaded paused and moved to its persisted
    /// position. Any session already open is torn down first.
    pub fn open_category(&mut self, name: &str, now: Instant) {
        if self.playlist.is_some() {
            self.release_session();
        }

        let playlist = PlaylistStore::load(&self.store, name);
        self.search.reset();
        self.search_result = None;
        self.tracker.bind(Some(keys::position(name)));
        self.tracker.reset(0);
        CategoryStore::set_last_opened(&self.store, name);

        let remembered = storage::get_or_warn(&self.store, &keys::playing(name))
            .and_then(|n| playlist.find(&n).cloned());
        self.playlist = Some(playlist);

        if let Some(track) = remembered {
            self.restore_track(name, track);
        }

        self.tracker.start_polling(&mut self.scheduler, now);
        tracing::info!(category = name, "category opened");
    }

    fn restore_track(&mut self, category: &str, track: Track) {
        let handle = match self.engine.load(&track.uri) {
            Ok(h) => h,
            Err(e) => {
                self.engine_failed("restore track", e);
                return;
            }
        };
        self.tracker.reset(handle.duration_ms.unwrap_or(0));
        tracing::debug!(category, track = %track.name, "restored current track");
        self.current = Some(track);

        let position = storage::get_or_warn(&self.store, &keys::position(category))
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        if position > 0
            && let Err(e) = self
                .tracker
                .commit_seek(position, &mut self.engine, &self.store)
        {
            self.engine_failed("restore position", e);
        }
    }

    /// Navigate away from the open category.
    pub fn leave_category(&mut self) {
        self.release_session();
        CategoryStore::clear_last_opened(&self.store);
        self.close_playlist();
    }

    /// Tear down on exit. The last-opened pointer is kept for the next launch.
    pub fn shutdown(&mut self) {
        self.release_session();
        self.close_playlist();
        if let Err(e) = self.engine.dispose() {
            tracing::warn!(error = %e, "failed to dispose audio engine");
        }
        tracing::info!("playback controller shut down");
    }

    fn close_playlist(&mut self) {
        self.playlist = None;
        self.search.reset();
        self.search_result = None;
        self.tracker.bind(None);
    }

    /// Pause, stop polling, cancel the timer, unload. Each step runs even if
    /// an earlier one failed.
    fn release_session(&mut self) {
        if self.is_playing
            && let Err(e) = self.engine.pause()
        {
            tracing::warn!(error = %e, "failed to pause during teardown");
        }
        self.tracker.stop_polling(&mut self.scheduler);
        self.timer.cancel(&mut self.scheduler);
        if let Err(e) = self.engine.unload() {
            tracing::warn!(error = %e, "failed to unload during teardown");
        }
        self.is_playing = false;
        self.current = None;
    }

    // -- playback intents ---------------------------------------------------

    /// Select by name. Selecting the current track toggles play/pause.
    pub fn select(&mut self, name: &str) -> Result<(), EngineError> {
        if self.current.as_ref().is_some_and(|c| c.name == name) {
            return self.toggle_play_pause();
        }
        let Some(index) = self.playlist.as_ref().and_then(|p| p.position(name)) else {
            tracing::debug!(name, "select ignored, no such track");
            return Ok(());
        };
        self.load_and_play(index)
    }

    pub fn select_index(&mut self, index: usize) -> Result<(), EngineError> {
        let Some(name) = self
            .playlist
            .as_ref()
            .and_then(|p| p.get(index))
            .map(|t| t.name.clone())
        else {
            return Ok(());
        };
        self.select(&name)
    }

    fn load_and_play(&mut self, index: usize) -> Result<(), EngineError> {
        let Some((category, track)) = self
            .playlist
            .as_ref()
            .and_then(|p| p.get(index).map(|t| (p.category().to_string(), t.clone())))
        else {
            return Ok(());
        };

        if let Err(e) = self.engine.unload() {
            tracing::warn!(error = %e, "failed to unload previous track");
        }
        self.current = None;
        self.is_playing = false;

        let handle = match self.engine.load(&track.uri) {
            Ok(h) => h,
            Err(e) => {
                // The previous track is gone, so nothing is remembered either.
                storage::remove_or_warn(&self.store, &keys::playing(&category));
                storage::remove_or_warn(&self.store, &keys::position(&category));
                return Err(self.engine_failed("load", e));
            }
        };

        if let Some(playlist) = self.playlist.as_mut() {
            playlist.mark_played(&self.store, &track.name);
        }
        self.tracker.reset(handle.duration_ms.unwrap_or(0));
        self.tracker.persist(&self.store, 0);
        storage::set_or_warn(&self.store, &keys::playing(&category), &track.name);
        tracing::info!(category = %category, track = %track.name, "track selected");
        self.current = Some(Track {
            played: true,
            ..track
        });

        self.engine.play().map_err(|e| self.engine_failed("play", e))?;
        self.is_playing = true;
        Ok(())
    }

    /// Pause when playing, play when paused. No-op without a current track.
    pub fn toggle_play_pause(&mut self) -> Result<(), EngineError> {
        if self.current.is_none() {
            return Ok(());
        }
        if self.is_playing {
            self.engine.pause().map_err(|e| self.engine_failed("pause", e))?;
            self.is_playing = false;
        } else {
            self.engine.play().map_err(|e| self.engine_failed("play", e))?;
            self.is_playing = true;
        }
        Ok(())
    }

    /// Advance according to the current mode.
    pub fn next(&mut self) -> Result<(), EngineError> {
        let current = self.current.as_ref().map(|t| t.name.clone());
        let mode = self.modes.current();
        let Some(playlist) = self.playlist.as_mut() else {
            return Ok(());
        };

        let selection =
            TrackSelector::next(playlist, &self.store, current.as_deref(), mode, &mut self.rng);
        let selection = match selection {
            Selection::Track(i)
                if playlist.get(i).map(|t| t.name.as_str()) == current.as_deref() =>
            {
                Selection::Restart
            }
            other => other,
        };

        match selection {
            Selection::Nothing => Ok(()),
            Selection::Restart => {
                if let Some(name) = &current {
                    playlist.mark_played(&self.store, name);
                }
                self.restart()
            }
            Selection::Track(i) => self.load_and_play(i),
        }
    }

    fn restart(&mut self) -> Result<(), EngineError> {
        self.tracker
            .commit_seek(0, &mut self.engine, &self.store)
            .map_err(|e| self.engine_failed("restart", e))?;
        self.engine.play().map_err(|e| self.engine_failed("play", e))?;
        self.is_playing = true;
        Ok(())
    }

    /// Jump `delta_seconds` relative to the current position, clamped to the
    /// track.
    pub fn seek_by(&mut self, delta_seconds: i64) -> Result<(), EngineError> {
        if self.current.is_none() {
            return Ok(());
        }
        let base = i64::try_from(self.tracker.position_ms()).unwrap_or(i64::MAX);
        let target = base.saturating_add(delta_seconds.saturating_mul(1000)).max(0);
        self.seek_to(u64::try_from(target).unwrap_or(0))
    }

    pub fn seek_to(&mut self, position_ms: u64) -> Result<(), EngineError> {
        if self.current.is_none() {
            return Ok(());
        }
        self.tracker
            .commit_seek(position_ms, &mut self.engine, &self.store)
            .map_err(|e| self.engine_failed("seek", e))?;
        Ok(())
    }

    // -- slider drag --------------------------------------------------------

    pub fn begin_drag(&mut self) {
        if self.current.is_some() {
            self.tracker.begin_drag(&mut self.scheduler);
        }
    }

    pub fn drag_to(&mut self, position_ms: u64) {
        self.tracker.drag_to(position_ms);
    }

    /// Release the slider at `position_ms`: one seek, then polling resumes.
    pub fn end_drag(&mut self, position_ms: u64, now: Instant) -> Result<(), EngineError> {
        if self.current.is_none() {
            self.tracker.abort_drag(&mut self.scheduler, now);
            return Ok(());
        }
        self.tracker
            .end_drag(
                position_ms,
                &mut self.engine,
                &self.store,
                &mut self.scheduler,
                now,
            )
            .map_err(|e| self.engine_failed("seek", e))?;
        Ok(())
    }

    /// Drop the drag without seeking. Playback carries on where the engine is.
    pub fn cancel_drag(&mut self, now: Instant) {
        self.tracker.abort_drag(&mut self.scheduler, now);
    }

    // -- mode, timer, search ------------------------------------------------

    pub fn cycle_mode(&mut self) -> PlayMode {
        self.modes.advance(&self.store)
    }

    /// Arm the sleep timer, replacing any pending one.
    pub fn start_timer(&mut self, hours: f64, now: Instant) -> Result<Instant, TimerError> {
        self.timer.start(&mut self.scheduler, hours, now)
    }

    pub fn cancel_timer(&mut self) -> bool {
        self.timer.cancel(&mut self.scheduler)
    }

    pub fn search(&mut self, keyword: &str) -> SearchOutcome {
        let tracks = self.playlist.as_ref().map(PlaylistStore::tracks).unwrap_or(&[]);
        let outcome = self.search.search(tracks, keyword);
        match outcome {
            SearchOutcome::Found(i) => self.search_result = Some(i),
            SearchOutcome::NoMatch => {
                self.search_result = None;
                self.notice = Some(format!("no track matches {keyword:?}"));
            }
            SearchOutcome::Blank => {}
        }
        outcome
    }

    pub fn close_search(&mut self) {
        self.search.reset();
        self.search_result = None;
    }

    /// Index of the current track in the open playlist.
    pub fn locate_current(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.playlist.as_ref()?.position(&current.name)
    }

    // -- library ------------------------------------------------------------

    /// Append tracks to the open category. Returns how many were new.
    pub fn import(&mut self, tracks: Vec<Track>) -> usize {
        let Some(playlist) = self.playlist.as_mut() else {
            return 0;
        };
        let offered = tracks.len();
        let added = playlist.append(&self.store, tracks);
        tracing::info!(category = %playlist.category(), offered, added, "tracks imported");
        if added < offered {
            self.notice = Some(format!(
                "imported {added} of {offered} tracks, {} already present",
                offered - added
            ));
        }
        added
    }

    /// Delete the track at `index`.
    ///
    /// Removing the current track stops and unloads it and clears the
    /// current-track state before the list changes.
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        let playlist = self.playlist.as_mut()?;
        let category = playlist.category().to_string();

        let engine = &mut self.engine;
        let store = &self.store;
        let current = &mut self.current;
        let is_playing = &mut self.is_playing;
        let tracker = &mut self.tracker;

        let removed = playlist.remove(store, index, |doomed| {
            if current.as_ref().is_none_or(|c| c.name != doomed.name) {
                return;
            }
            if *is_playing
                && let Err(e) = engine.pause()
            {
                tracing::warn!(error = %e, "failed to pause removed track");
            }
            if let Err(e) = engine.unload() {
                tracing::warn!(error = %e, "failed to unload removed track");
            }
            *is_playing = false;
            *current = None;
            tracker.reset(0);
            storage::remove_or_warn(store, &keys::playing(&category));
            storage::remove_or_warn(store, &keys::position(&category));
        });

        if let Some(track) = &removed {
            tracing::info!(category = %category, track = %track.name, "track removed");
            self.search.reset();
            self.search_result = None;
        }
        removed
    }

    // -- time ---------------------------------------------------------------

    /// Run every task due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for (id, kind) in self.scheduler.due(now) {
            match kind {
                TaskKind::PositionPoll if self.tracker.owns(id) => self.poll(),
                TaskKind::SleepTimer if self.timer.expire(id) => self.timer_expired(),
                _ => tracing::trace!(?id, ?kind, "dropping stale task"),
            }
        }
    }

    fn poll(&mut self) {
        if self.current.is_none() {
            return;
        }
        let Some(status) = self.engine.status() else {
            return;
        };
        if !self.tracker.is_dragging() {
            self.is_playing = status.is_playing;
        }
        if self.tracker.apply_status(&status, &self.store) == StatusOutcome::Finished {
            tracing::debug!("track finished, advancing");
            // Failure already logged and surfaced as a notice.
            let _ = self.next();
        }
    }

    fn timer_expired(&mut self) {
        tracing::info!("sleep timer expired");
        if !self.is_playing {
            return;
        }
        match self.engine.pause() {
            Ok(()) => {
                self.is_playing = false;
                self.notice = Some("sleep timer: playback paused".to_string());
            }
            Err(e) => {
                self.engine_failed("sleep timer pause", e);
            }
        }
    }
}
