use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use crate::app::App;
use crate::config;
use crate::library::CategoryStore;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};

use super::Controller;

/// Open the configured store file. A store that cannot be opened is
/// replaced by an in-memory one so the session still works; nothing is
/// written over the unreadable file.
pub fn open_store(settings: &config::Settings) -> Rc<dyn KeyValueStore> {
    let Some(path) = settings.store_path() else {
        eprintln!("cadence: no data directory found, progress will not be saved");
        return Rc::new(MemoryStore::new());
    };

    match FileStore::open(&path) {
        Ok(store) => Rc::new(store),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "cannot open store");
            eprintln!(
                "cadence: cannot open {}: {e}; progress will not be saved",
                path.display()
            );
            Rc::new(MemoryStore::new())
        }
    }
}

/// Reopen the category that was open when the app last exited.
pub fn restore_last_category(app: &mut App, controller: &mut Controller, now: Instant) {
    let Some(name) = CategoryStore::last_opened(controller.store()) else {
        return;
    };
    let Some(index) = app.categories.names().iter().position(|n| *n == name) else {
        tracing::debug!(category = %name, "last opened category no longer exists");
        CategoryStore::clear_last_opened(controller.store());
        return;
    };

    app.category_cursor = index;
    controller.open_category(&name, now);
    app.enter_playback(controller.locate_current().unwrap_or(0));
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(input: &str) -> PathBuf {
    let input = input.trim();
    match (input.strip_prefix('~'), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            PathBuf::from(home).join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(input),
    }
}
