use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn track_from_path(path: &Path) -> Option<Track> {
    let name = path.file_name()?.to_str()?.to_string();
    let uri = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string();
    Some(Track::new(name, uri))
}

/// Turn picked files and directories into tracks, in pick order.
///
/// Files are taken as-is when their extension is allowed. Directories are
/// walked (sorted by file name) according to `settings`. Duplicate names are
/// not filtered here; the playlist decides what it accepts.
pub fn import_paths(paths: &[PathBuf], settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for root in paths {
        if root.is_file() {
            if is_audio_file(root, settings) {
                tracks.extend(track_from_path(root));
            } else {
                tracing::debug!(path = %root.display(), "skipping non-audio file");
            }
            continue;
        }
        if !root.is_dir() {
            tracing::warn!(path = %root.display(), "import path does not exist");
            continue;
        }

        let mut walker = WalkDir::new(root)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the root directory.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && is_audio_file(path, settings) {
                tracks.extend(track_from_path(path));
            }
        }
    }

    tracing::info!(count = tracks.len(), "import scanned");
    tracks
}
