//! Application model types: `App`, `Screen` and `Prompt`.
//!
//! The `App` struct holds UI-only state: which screen is showing, list
//! cursors, the open prompt and the transient status line. Playback state
//! lives in the controller; the UI reads it through `PlaybackView`.

use std::time::{Duration, Instant};

use crate::library::CategoryStore;

/// How long a status notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Which screen is showing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Categories,
    Playback,
}

/// A modal input surface layered over the current screen.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Prompt {
    #[default]
    None,
    /// Typing a new category title.
    AddCategory(String),
    /// Waiting for `y` to delete the category at this index.
    ConfirmDeleteCategory(usize),
    /// Typing a search keyword; Enter jumps to the next match.
    Search(String),
    /// Typing a file or directory path to import.
    Import(String),
    /// Waiting for `y` to delete the track at this index.
    ConfirmDeleteTrack(usize),
    /// Picking one of the sleep timer presets.
    TimerPicker(usize),
    /// Scrubbing the position slider.
    Scrub,
}

impl Prompt {
    /// The editable text of a typing prompt.
    pub fn input_mut(&mut self) -> Option<&mut String> {
        match self {
            Prompt::AddCategory(s) | Prompt::Search(s) | Prompt::Import(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Prompt::None)
    }
}

/// The main application model.
pub struct App {
    pub screen: Screen,
    pub categories: CategoryStore,
    pub category_cursor: usize,
    pub track_cursor: usize,
    pub prompt: Prompt,
    status: Option<(String, Instant)>,
}

impl App {
    /// Create a new `App` showing the categories screen.
    pub fn new(categories: CategoryStore) -> Self {
        Self {
            screen: Screen::Categories,
            categories,
            category_cursor: 0,
            track_cursor: 0,
            prompt: Prompt::None,
            status: None,
        }
    }

    /// Show `msg` in the status line for a while.
    pub fn set_status(&mut self, msg: impl Into<String>, now: Instant) {
        self.status = Some((msg.into(), now));
    }

    /// The status message, if it has not expired at `now`.
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, at)| now.saturating_duration_since(*at) < NOTICE_TTL)
            .map(|(m, _)| m.as_str())
    }

    /// Switch to the playback screen with the cursor at `cursor`.
    pub fn enter_playback(&mut self, cursor: usize) {
        self.screen = Screen::Playback;
        self.track_cursor = cursor;
        self.prompt = Prompt::None;
    }

    pub fn enter_categories(&mut self) {
        self.screen = Screen::Categories;
        self.prompt = Prompt::None;
        self.clamp_category_cursor();
    }

    /// The category under the cursor.
    pub fn selected_category(&self) -> Option<&str> {
        self.categories
            .names()
            .get(self.category_cursor)
            .map(String::as_str)
    }

    pub fn clamp_category_cursor(&mut self) {
        self.category_cursor = clamp_cursor(self.category_cursor, self.categories.len());
    }

    pub fn clamp_track_cursor(&mut self, len: usize) {
        self.track_cursor = clamp_cursor(self.track_cursor, len);
    }

    /// Move the active list cursor down, wrapping to the top.
    pub fn next(&mut self, len: usize) {
        let cursor = self.cursor_mut();
        *cursor = next_in(*cursor, len);
    }

    /// Move the active list cursor up, wrapping to the bottom.
    pub fn prev(&mut self, len: usize) {
        let cursor = self.cursor_mut();
        *cursor = prev_in(*cursor, len);
    }

    pub fn first(&mut self) {
        *self.cursor_mut() = 0;
    }

    pub fn last(&mut self, len: usize) {
        *self.cursor_mut() = len.saturating_sub(1);
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Categories => &mut self.category_cursor,
            Screen::Playback => &mut self.track_cursor,
        }
    }

    /// Append a character to the open typing prompt.
    pub fn push_input_char(&mut self, c: char) {
        if let Some(input) = self.prompt.input_mut() {
            input.push(c);
        }
    }

    /// Remove the last character from the open typing prompt.
    pub fn pop_input_char(&mut self) {
        if let Some(input) = self.prompt.input_mut() {
            input.pop();
        }
    }

    pub fn close_prompt(&mut self) {
        self.prompt = Prompt::None;
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len == 0 { 0 } else { cursor.min(len - 1) }
}

fn next_in(cursor: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (cursor + 1) % len }
}

fn prev_in(cursor: usize, len: usize) -> usize {
    match (len, cursor) {
        (0, _) => 0,
        (_, 0) => len - 1,
        _ => (cursor - 1).min(len - 1),
    }
}
