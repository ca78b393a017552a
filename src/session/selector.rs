//! Next-track selection per play mode.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::storage::KeyValueStore;

use super::mode::PlayMode;
use super::playlist::PlaylistStore;

/// What the controller should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing to do: no current track or an empty playlist.
    Nothing,
    /// Play the current track again from the start.
    Restart,
    /// Select the track at this index.
    Track(usize),
}

pub struct TrackSelector;

impl TrackSelector {
    /// Pick what follows `current` under `mode`.
    ///
    /// In RANDOM mode an exhausted round resets every `played` flag (and
    /// persists that) before picking; the pick then avoids `current` unless
    /// it is the only track. The caller marks the pick played when it
    /// selects it.
    pub fn next<S, R>(
        playlist: &mut PlaylistStore,
        store: &S,
        current: Option<&str>,
        mode: PlayMode,
        rng: &mut R,
    ) -> Selection
    where
        S: KeyValueStore + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(current) = current else {
            return Selection::Nothing;
        };
        if playlist.is_empty() {
            return Selection::Nothing;
        }

        match mode {
            PlayMode::Single => Selection::Restart,
            PlayMode::Sequence => {
                let next = match playlist.position(current) {
                    Some(i) => (i + 1) % playlist.len(),
                    None => 0,
                };
                Selection::Track(next)
            }
            PlayMode::Random => Self::random(playlist, store, current, rng),
        }
    }

    fn random<S, R>(playlist: &mut PlaylistStore, store: &S, current: &str, rng: &mut R) -> Selection
    where
        S: KeyValueStore + ?Sized,
        R: Rng + ?Sized,
    {
        let unplayed: Vec<usize> = playlist
            .tracks()
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.played)
            .map(|(i, _)| i)
            .collect();

        if let Some(&pick) = unplayed.choose(rng) {
            return Selection::Track(pick);
        }

        tracing::debug!(category = %playlist.category(), "shuffle round exhausted, resetting played flags");
        playlist.reset_played_flags(store);

        let candidates: Vec<usize> = if playlist.len() > 1 {
            playlist
                .tracks()
                .iter()
                .enumerate()
                .filter(|(_, t)| t.name != current)
                .map(|(i, _)| i)
                .collect()
        } else {
            vec![0]
        };

        match candidates.choose(rng) {
            Some(&pick) => Selection::Track(pick),
            None => Selection::Nothing,
        }
    }
}
