//! Cyclic keyword search over a playlist.

use crate::library::Track;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Keyword was blank; nothing happened.
    Blank,
    /// No track name contains the keyword.
    NoMatch,
    /// Scroll to this index.
    Found(usize),
}

#[derive(Debug, Clone, Default)]
pub struct SearchNavigator {
    keyword: String,
    last_matched: Option<usize>,
}

impl SearchNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn last_matched(&self) -> Option<usize> {
        self.last_matched
    }

    /// Jump to the next track whose name contains `keyword`
    /// (case-insensitive), wrapping to the first match after the last.
    pub fn search(&mut self, tracks: &[Track], keyword: &str) -> SearchOutcome {
        if keyword.trim().is_empty() {
            return SearchOutcome::Blank;
        }
        self.keyword = keyword.to_string();

        let needle = keyword.to_lowercase();
        let matches: Vec<usize> = tracks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.name.to_lowercase().contains(&needle))
            .map(|(i, _)| i)
            .collect();

        let Some(&first) = matches.first() else {
            return SearchOutcome::NoMatch;
        };

        let target = matches
            .iter()
            .copied()
            .find(|&i| self.last_matched.is_none_or(|last| i > last))
            .unwrap_or(first);

        self.last_matched = Some(target);
        SearchOutcome::Found(target)
    }

    /// Clear keyword and cursor (the search surface closed).
    pub fn reset(&mut self) {
        self.keyword.clear();
        self.last_matched = None;
    }
}
