//! The ordered tracks of one category.
//!
//! Every mutation writes the full JSON snapshot back before returning.

use std::collections::HashSet;

use crate::library::Track;
use crate::storage::{self, KeyValueStore, keys};

#[derive(Debug, Clone, Default)]
pub struct PlaylistStore {
    category: String,
    tracks: Vec<Track>,
}

impl PlaylistStore {
    /// Read the snapshot for `category`. Missing or corrupt data yields an
    /// empty playlist.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, category: &str) -> Self {
        let key = keys::playlist(category);
        let tracks = match storage::get_or_warn(store, &key) {
            Some(raw) => serde_json::from_str::<Vec<Track>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(category, error = %e, "playlist snapshot is corrupt, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        tracing::debug!(category, tracks = tracks.len(), "playlist loaded");

        Self {
            category: category.to_string(),
            tracks,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    pub fn find(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Append new tracks at the end. Names already present (or repeated in
    /// `incoming`) are skipped. Returns how many were added.
    pub fn append<S, I>(&mut self, store: &S, incoming: I) -> usize
    where
        S: KeyValueStore + ?Sized,
        I: IntoIterator<Item = Track>,
    {
        let mut seen: HashSet<String> = self.tracks.iter().map(|t| t.name.clone()).collect();
        let mut added = 0;
        for track in incoming {
            if !seen.insert(track.name.clone()) {
                tracing::warn!(category = %self.category, name = %track.name, "skipping duplicate track name");
                continue;
            }
            self.tracks.push(track);
            added += 1;
        }
        if added > 0 {
            self.persist(store);
        }
        added
    }

    /// Remove the track at `index`.
    ///
    /// `on_evict` sees the doomed track while it is still in the list; the
    /// caller uses it to release anything referencing the track before the
    /// entry disappears.
    pub fn remove<S, F>(&mut self, store: &S, index: usize, on_evict: F) -> Option<Track>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce(&Track),
    {
        let doomed = self.tracks.get(index)?;
        on_evict(doomed);

        let removed = self.tracks.remove(index);
        self.persist(store);
        Some(removed)
    }

    /// Set `played` on the named track. Returns false if no such track.
    pub fn mark_played<S: KeyValueStore + ?Sized>(&mut self, store: &S, name: &str) -> bool {
        let Some(track) = self.tracks.iter_mut().find(|t| t.name == name) else {
            return false;
        };
        track.played = true;
        self.persist(store);
        true
    }

    /// Clear every `played` flag, starting a new shuffle round.
    pub fn reset_played_flags<S: KeyValueStore + ?Sized>(&mut self, store: &S) {
        for track in &mut self.tracks {
            track.played = false;
        }
        self.persist(store);
    }

    /// Write the full snapshot.
    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &S) {
        match serde_json::to_string(&self.tracks) {
            Ok(raw) => storage::set_or_warn(store, &keys::playlist(&self.category), &raw),
            Err(e) => tracing::warn!(category = %self.category, error = %e, "failed to encode playlist"),
        }
    }
}
