use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Prompt, Screen};
use crate::config;
use crate::error::Result;
use crate::library::import_paths;
use crate::session::SearchOutcome;
use crate::ui;

use super::Controller;
use super::startup::expand_home;

/// Upper bound on how long the loop blocks waiting for input.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Main terminal event loop: ticks the controller, draws, and dispatches
/// key presses. Returns `Ok(())` when the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
) -> Result<()> {
    loop {
        let now = Instant::now();
        controller.tick(now);
        if let Some(msg) = controller.take_notice() {
            app.set_status(msg, now);
        }

        let view = controller.view();
        terminal.draw(|f| ui::draw(f, app, &view, controller.tracks(), settings, now))?;

        let timeout = controller
            .next_deadline()
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
            .min(IDLE_POLL);

        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key_event(key, settings, app, controller) {
                break;
            }
        }
    }

    Ok(())
}

/// Dispatch one key press. Returns true when the app should quit.
pub(super) fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
) -> bool {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    let now = Instant::now();
    if app.prompt.is_open() {
        handle_prompt_key(key, settings, app, controller, now);
        return false;
    }

    match app.screen {
        Screen::Categories => handle_categories_key(key, app, controller, now),
        Screen::Playback => handle_playback_key(key, settings, app, controller, now),
    }
}

fn handle_categories_key(
    key: KeyEvent,
    app: &mut App,
    controller: &mut Controller,
    now: Instant,
) -> bool {
    let len = app.categories.len();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Char('g') => app.first(),
        KeyCode::Char('G') => app.last(len),
        KeyCode::Char('a') => app.prompt = Prompt::AddCategory(String::new()),
        KeyCode::Char('d') if len > 0 => {
            app.prompt = Prompt::ConfirmDeleteCategory(app.category_cursor);
        }
        KeyCode::Enter => {
            if let Some(name) = app.selected_category().map(str::to_string) {
                controller.open_category(&name, now);
                app.enter_playback(controller.locate_current().unwrap_or(0));
            }
        }
        _ => {}
    }
    false
}

fn handle_playback_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    now: Instant,
) -> bool {
    let len = controller.tracks().len();
    let step = i64::try_from(settings.playback.seek_step_seconds).unwrap_or(i64::MAX);

    // Engine failures are already logged and surfaced as notices by the
    // controller, so the results of playback intents are dropped here.
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Esc | KeyCode::Backspace => {
            controller.leave_category();
            app.enter_categories();
        }
        KeyCode::Char('j') | KeyCode::Down => app.next(len),
        KeyCode::Char('k') | KeyCode::Up => app.prev(len),
        KeyCode::Char('g') => app.first(),
        KeyCode::Char('G') => app.last(len),
        KeyCode::Enter if len > 0 => {
            let _ = controller.select_index(app.track_cursor);
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            let _ = controller.toggle_play_pause();
        }
        KeyCode::Char('n') => {
            let _ = controller.next();
        }
        KeyCode::Char('L') | KeyCode::Right => {
            let _ = controller.seek_by(step);
        }
        KeyCode::Char('H') | KeyCode::Left => {
            let _ = controller.seek_by(-step);
        }
        KeyCode::Char('m') => {
            let mode = controller.cycle_mode();
            app.set_status(format!("mode: {mode}"), now);
        }
        KeyCode::Char('t') if !settings.playback.timer_options_hours.is_empty() => {
            app.prompt = Prompt::TimerPicker(0);
        }
        KeyCode::Char('T') => {
            if controller.cancel_timer() {
                app.set_status("sleep timer cancelled", now);
            }
        }
        KeyCode::Char('/') => app.prompt = Prompt::Search(String::new()),
        KeyCode::Char('z') => match controller.locate_current() {
            Some(i) => app.track_cursor = i,
            None => app.set_status("nothing is playing", now),
        },
        KeyCode::Char('i') => app.prompt = Prompt::Import(String::new()),
        KeyCode::Char('d') if len > 0 => {
            app.prompt = Prompt::ConfirmDeleteTrack(app.track_cursor);
        }
        KeyCode::Char('s') if controller.current_track().is_some() => {
            controller.begin_drag();
            app.prompt = Prompt::Scrub;
        }
        _ => {}
    }
    false
}

fn handle_prompt_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    controller: &mut Controller,
    now: Instant,
) {
    match app.prompt.clone() {
        Prompt::None => {}
        Prompt::AddCategory(name) => match key.code {
            KeyCode::Esc => app.close_prompt(),
            KeyCode::Enter => {
                if app.categories.add(controller.store(), &name) {
                    app.category_cursor = app.categories.len() - 1;
                    app.close_prompt();
                } else {
                    app.set_status("category name is blank or already taken", now);
                }
            }
            _ => edit_input(key, app),
        },
        Prompt::ConfirmDeleteCategory(index) => {
            if key.code == KeyCode::Char('y')
                && let Some(name) = app.categories.remove(controller.store(), index)
            {
                app.set_status(format!("deleted {name}"), now);
                app.clamp_category_cursor();
            }
            app.close_prompt();
        }
        Prompt::Search(keyword) => match key.code {
            KeyCode::Esc => {
                controller.close_search();
                app.close_prompt();
            }
            KeyCode::Enter => {
                if let SearchOutcome::Found(i) = controller.search(&keyword) {
                    app.track_cursor = i;
                }
            }
            _ => edit_input(key, app),
        },
        Prompt::Import(path) => match key.code {
            KeyCode::Esc => app.close_prompt(),
            KeyCode::Enter => {
                let tracks = import_paths(&[expand_home(&path)], &settings.library);
                if tracks.is_empty() {
                    app.set_status("no audio files found", now);
                } else {
                    let added = controller.import(tracks);
                    app.set_status(format!("imported {added} tracks"), now);
                }
                app.close_prompt();
            }
            _ => edit_input(key, app),
        },
        Prompt::ConfirmDeleteTrack(index) => {
            if key.code == KeyCode::Char('y')
                && let Some(track) = controller.remove_track(index)
            {
                app.set_status(format!("removed {}", track.name), now);
                app.clamp_track_cursor(controller.tracks().len());
            }
            app.close_prompt();
        }
        Prompt::TimerPicker(selected) => {
            let options = &settings.playback.timer_options_hours;
            match key.code {
                KeyCode::Esc => app.close_prompt(),
                KeyCode::Char('j') | KeyCode::Down => {
                    app.prompt = Prompt::TimerPicker((selected + 1) % options.len().max(1));
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    let prev = selected.checked_sub(1).unwrap_or(options.len().saturating_sub(1));
                    app.prompt = Prompt::TimerPicker(prev);
                }
                KeyCode::Enter => {
                    if let Some(&hours) = options.get(selected) {
                        match controller.start_timer(hours, now) {
                            Ok(_) => app.set_status(format!("sleep timer set for {hours} h"), now),
                            Err(e) => app.set_status(e.to_string(), now),
                        }
                    }
                    app.close_prompt();
                }
                _ => {}
            }
        }
        Prompt::Scrub => {
            let step = settings.playback.seek_step_seconds.saturating_mul(1000);
            let view = controller.view();
            match key.code {
                KeyCode::Char('l') | KeyCode::Right => {
                    controller.drag_to(view.slider_value.saturating_add(step));
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    controller.drag_to(view.slider_value.saturating_sub(step));
                }
                KeyCode::Enter | KeyCode::Char('s') => {
                    let _ = controller.end_drag(view.slider_value, now);
                    app.close_prompt();
                }
                KeyCode::Esc => {
                    controller.cancel_drag(now);
                    app.close_prompt();
                }
                _ => {}
            }
        }
    }
}

fn edit_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Char(c) if !c.is_control() => app.push_input_char(c),
        _ => {}
    }
}
