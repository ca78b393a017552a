use std::time::{Duration, Instant};

use super::*;
use crate::library::CategoryStore;
use crate::storage::MemoryStore;

fn app_with(names: &[&str]) -> App {
    let store = MemoryStore::new();
    let mut categories = CategoryStore::load(&store);
    for n in names {
        categories.add(&store, n);
    }
    App::new(categories)
}

#[test]
fn cursor_wraps_both_ways() {
    let mut app = app_with(&["a", "b", "c"]);
    app.prev(3);
    assert_eq!(app.category_cursor, 2);
    app.next(3);
    assert_eq!(app.category_cursor, 0);
    app.next(3);
    assert_eq!(app.selected_category(), Some("b"));
}

#[test]
fn cursor_on_empty_list_stays_at_zero() {
    let mut app = app_with(&[]);
    app.next(0);
    app.prev(0);
    app.last(0);
    assert_eq!(app.category_cursor, 0);
    assert_eq!(app.selected_category(), None);
}

#[test]
fn cursor_moves_follow_the_active_screen() {
    let mut app = app_with(&["a", "b"]);
    app.enter_playback(4);
    app.next(10);
    assert_eq!(app.track_cursor, 5);
    assert_eq!(app.category_cursor, 0);

    app.last(10);
    assert_eq!(app.track_cursor, 9);
    app.clamp_track_cursor(3);
    assert_eq!(app.track_cursor, 2);
}

#[test]
fn typing_only_edits_text_prompts() {
    let mut app = app_with(&[]);
    app.prompt = Prompt::Search(String::new());
    app.push_input_char('a');
    app.push_input_char('b');
    app.pop_input_char();
    assert_eq!(app.prompt, Prompt::Search("a".into()));

    app.prompt = Prompt::ConfirmDeleteTrack(1);
    app.push_input_char('y');
    assert_eq!(app.prompt, Prompt::ConfirmDeleteTrack(1));
    assert!(app.prompt.is_open());

    app.close_prompt();
    assert!(!app.prompt.is_open());
}

#[test]
fn leaving_playback_closes_prompts_and_clamps() {
    let mut app = app_with(&["a"]);
    app.category_cursor = 7;
    app.enter_playback(0);
    app.prompt = Prompt::Scrub;
    app.enter_categories();
    assert_eq!(app.screen, Screen::Categories);
    assert_eq!(app.prompt, Prompt::None);
    assert_eq!(app.category_cursor, 0);
}

#[test]
fn status_expires() {
    let mut app = app_with(&[]);
    let now = Instant::now();
    app.set_status("saved", now);
    assert_eq!(app.status(now), Some("saved"));
    assert_eq!(app.status(now + NOTICE_TTL + Duration::from_millis(1)), None);
}
