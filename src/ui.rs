//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. It only
//! reads state: the `App` model, the controller's `PlaybackView` and the
//! open playlist.

use std::collections::BTreeMap;
use std::sync::LazyLock;
use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Prompt, Screen};
use crate::config::Settings;
use crate::library::Track;
use crate::session::{PlaybackView, SessionPhase, format_position};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = BTreeMap::new();
    map.insert("j/k", "up/down");
    map.insert("g/G", "top/bottom");
    map.insert("enter", "open / play selected");
    map.insert("a", "add category");
    map.insert("d", "delete");
    map.insert("space/p", "play/pause");
    map.insert("n", "next");
    // H/L is filled dynamically from config.
    map.insert("s", "scrub");
    map.insert("m", "mode");
    map.insert("t/T", "sleep timer / cancel");
    map.insert("/", "search");
    map.insert("z", "locate playing");
    map.insert("i", "import");
    map.insert("esc", "back");
    map.insert("q", "quit");
    map
});

/// Render the controls help text for `screen`, incorporating the seek step.
fn controls_text(screen: Screen, seek_seconds: u64) -> String {
    let order: &[&str] = match screen {
        Screen::Categories => &["j/k", "g/G", "enter", "a", "d", "q"],
        Screen::Playback => &[
            "j/k", "enter", "space/p", "n", "H/L", "s", "m", "t/T", "/", "z", "i", "d", "esc",
            "q",
        ],
    };
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] seek -/+{seek_seconds}s"))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{k}] {v}"))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Visible window `(start, end, selected_in_window)` that keeps `selected`
/// centered when the list is taller than `height`.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected.min(total.saturating_sub(1)));
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Render the entire UI into `frame`.
pub fn draw(
    frame: &mut Frame,
    app: &App,
    view: &PlaybackView,
    tracks: &[Track],
    settings: &Settings,
    now: Instant,
) {
    let gauge_height = if app.screen == Screen::Playback { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(gauge_height),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" cadence ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let status = Paragraph::new(status_text(app, view, now))
        .block(padded(" status "))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[1]);

    match app.screen {
        Screen::Categories => draw_categories(frame, app, chunks[3]),
        Screen::Playback => {
            draw_progress(frame, view, chunks[2]);
            draw_tracks(frame, app, view, tracks, settings, chunks[3]);
        }
    }

    let footer = Paragraph::new(controls_text(app.screen, settings.playback.seek_step_seconds))
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    if app.prompt.is_open() && app.prompt != Prompt::Scrub {
        draw_prompt(frame, app, tracks, settings, chunks[3]);
    }
}

fn status_text(app: &App, view: &PlaybackView, now: Instant) -> String {
    let mut parts: Vec<String> = Vec::new();

    match app.screen {
        Screen::Categories => {
            parts.push(format!("{} categories", app.categories.len()));
        }
        Screen::Playback => {
            if let Some(category) = &view.category {
                parts.push(format!("CATEGORY: {category}"));
            }
            parts.push(format!("MODE: {}", view.mode));

            match &view.current_track {
                Some(track) => {
                    let state = match view.phase {
                        SessionPhase::LoadedPlaying => "Playing",
                        _ => "Paused",
                    };
                    parts.push(format!("Song: {}", track.name));
                    parts.push(state.to_string());
                }
                None => parts.push("Stopped".to_string()),
            }

            match view.timer_deadline {
                Some(deadline) if view.timer_active => {
                    let left = deadline.saturating_duration_since(now);
                    let ms = u64::try_from(left.as_millis()).unwrap_or(u64::MAX);
                    parts.push(format!("TIMER: {} left", format_position(ms)));
                }
                _ => parts.push("TIMER: off".to_string()),
            }
        }
    }

    if let Some(msg) = app.status(now) {
        parts.push(msg.to_string());
    }

    parts.join(" • ")
}

fn draw_progress(frame: &mut Frame, view: &PlaybackView, area: Rect) {
    let total = view.duration_ms;
    let shown = if view.dragging {
        view.slider_value
    } else {
        view.position_ms
    };
    let ratio = if total > 0 {
        (shown as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let total_text = if total > 0 {
        format_position(total)
    } else {
        "--:--".to_string()
    };
    let label = if view.dragging {
        format!("scrub to {} / {}", format_position(shown), total_text)
    } else {
        format!("{} / {}", view.position_display, total_text)
    };

    let title = if view.dragging {
        " position (h/l move, enter seek, esc cancel) "
    } else {
        " position "
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_categories(frame: &mut Frame, app: &App, area: Rect) {
    let names = app.categories.names();
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected) = visible_window(names.len(), app.category_cursor, height);

    let items: Vec<ListItem> = names[start..end]
        .iter()
        .map(|n| ListItem::new(n.as_str()))
        .collect();
    let empty = names.is_empty();
    let title = if empty {
        " categories (press a to add one) "
    } else {
        " categories "
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !empty {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_tracks(
    frame: &mut Frame,
    app: &App,
    view: &PlaybackView,
    tracks: &[Track],
    settings: &Settings,
    area: Rect,
) {
    let height = area.height.saturating_sub(2) as usize;
    let (start, end, selected) = visible_window(tracks.len(), app.track_cursor, height);
    let current = view.current_track.as_ref().map(|t| t.name.as_str());

    let items: Vec<ListItem> = tracks[start..end]
        .iter()
        .enumerate()
        .map(|(offset, t)| {
            let marker = if Some(t.name.as_str()) == current {
                "▶ "
            } else if settings.ui.show_played_marker && t.played {
                "· "
            } else {
                "  "
            };
            let item = ListItem::new(format!("{marker}{}", t.name));
            if view.search_result_index == Some(start + offset) {
                item.underlined()
            } else {
                item
            }
        })
        .collect();

    let title = if tracks.is_empty() {
        " tracks (press i to import) ".to_string()
    } else {
        format!(" tracks ({}) ", tracks.len())
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if !tracks.is_empty() {
        state.select(Some(selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_prompt(frame: &mut Frame, app: &App, tracks: &[Track], settings: &Settings, area: Rect) {
    let (title, body) = match &app.prompt {
        Prompt::AddCategory(input) => (" new category (enter saves) ", format!("{input}_")),
        Prompt::ConfirmDeleteCategory(i) => (
            " delete category ",
            format!(
                "Delete \"{}\" and its playlist? [y/N]",
                app.categories.names().get(*i).map(String::as_str).unwrap_or("?")
            ),
        ),
        Prompt::Search(input) => (" search (enter: next match, esc: close) ", format!("{input}_")),
        Prompt::Import(input) => (" import file or directory ", format!("{input}_")),
        Prompt::ConfirmDeleteTrack(i) => (
            " delete track ",
            format!(
                "Remove \"{}\" from this category? [y/N]",
                tracks.get(*i).map(|t| t.name.as_str()).unwrap_or("?")
            ),
        ),
        Prompt::TimerPicker(selected) => {
            let lines: Vec<String> = settings
                .playback
                .timer_options_hours
                .iter()
                .enumerate()
                .map(|(i, h)| {
                    let cursor = if i == *selected { ">" } else { " " };
                    format!("{cursor} {h} h")
                })
                .collect();
            (" sleep timer (enter starts) ", lines.join("\n"))
        }
        Prompt::Scrub | Prompt::None => return,
    };

    let height = u16::try_from(body.lines().count()).unwrap_or(u16::MAX).saturating_add(2);
    let popup = centered_rect_sized(60, height, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(body)
        .block(padded(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_keeps_selection_centered() {
        assert_eq!(visible_window(5, 3, 10), (0, 5, 3));
        assert_eq!(visible_window(100, 50, 10), (45, 55, 5));
        assert_eq!(visible_window(100, 99, 10), (90, 100, 9));
        assert_eq!(visible_window(0, 0, 10), (0, 0, 0));
    }

    #[test]
    fn controls_mention_seek_step() {
        let text = controls_text(Screen::Playback, 7);
        assert!(text.contains("[H/L] seek -/+7s"));
        assert!(!controls_text(Screen::Categories, 7).contains("H/L"));
    }
}
