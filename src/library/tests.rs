use super::*;
use crate::config::LibrarySettings;
use crate::storage::{KeyValueStore, MemoryStore, keys};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn names(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.name.clone()).collect()
}

#[test]
fn track_json_matches_snapshot_format() {
    let t: Track = serde_json::from_str(r#"{"name":"a.mp3","uri":"/m/a.mp3"}"#).unwrap();
    assert_eq!(t, Track::new("a.mp3", "/m/a.mp3"));
    assert!(!t.played);

    let raw = serde_json::to_string(&Track {
        played: true,
        ..t
    })
    .unwrap();
    assert_eq!(raw, r#"{"name":"a.mp3","uri":"/m/a.mp3","played":true}"#);
}

#[test]
fn import_walks_directories_sorted_and_filters_extensions() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("a.ogg"), b"not a real ogg").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
    fs::write(dir.path().join(".hidden.mp3"), b"hidden").unwrap();

    let tracks = import_paths(&[dir.path().to_path_buf()], &LibrarySettings::default());
    assert_eq!(names(&tracks), vec!["a.ogg", "b.MP3"]);
    assert!(tracks.iter().all(|t| !t.played));
    assert!(tracks[0].uri.ends_with("a.ogg"));
}

#[test]
fn import_keeps_pick_order_across_roots() {
    let dir = tempdir().unwrap();
    let z = dir.path().join("z.mp3");
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(&z, b"x").unwrap();
    fs::write(sub.join("a.mp3"), b"x").unwrap();

    let tracks = import_paths(&[z, sub, PathBuf::from("/no/such/path")], &LibrarySettings::default());
    assert_eq!(names(&tracks), vec!["z.mp3", "a.mp3"]);
}

#[test]
fn import_respects_recursive_false_and_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("root.mp3"), b"x").unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("child.mp3"), b"x").unwrap();
    fs::write(dir.path().join(".dot.mp3"), b"x").unwrap();

    let settings = LibrarySettings {
        recursive: false,
        include_hidden: true,
        ..LibrarySettings::default()
    };
    let tracks = import_paths(&[dir.path().to_path_buf()], &settings);
    assert_eq!(names(&tracks), vec![".dot.mp3", "root.mp3"]);
}

#[test]
fn categories_add_refuses_blank_and_duplicates() {
    let store = MemoryStore::new();
    let mut cats = CategoryStore::load(&store);
    assert!(cats.is_empty());

    assert!(cats.add(&store, "  Sleep  "));
    assert!(!cats.add(&store, "Sleep"));
    assert!(!cats.add(&store, "   "));
    assert!(cats.add(&store, "Workout"));

    let reloaded = CategoryStore::load(&store);
    assert_eq!(reloaded.names(), ["Sleep".to_string(), "Workout".to_string()]);
}

#[test]
fn categories_remove_purges_category_keys() {
    let store = MemoryStore::new();
    let mut cats = CategoryStore::load(&store);
    cats.add(&store, "Sleep");
    cats.add(&store, "Workout");
    store.set(&keys::playlist("Sleep"), "[]").unwrap();
    store.set(&keys::playing("Sleep"), "a.mp3").unwrap();
    store.set(&keys::position("Sleep"), "1000").unwrap();
    CategoryStore::set_last_opened(&store, "Sleep");

    assert_eq!(cats.remove(&store, 0).as_deref(), Some("Sleep"));
    assert_eq!(cats.remove(&store, 5), None);

    assert_eq!(store.get(&keys::playlist("Sleep")).unwrap(), None);
    assert_eq!(store.get(&keys::playing("Sleep")).unwrap(), None);
    assert_eq!(store.get(&keys::position("Sleep")).unwrap(), None);
    assert_eq!(CategoryStore::last_opened(&store), None);
    assert_eq!(CategoryStore::load(&store).names(), ["Workout".to_string()]);
}

#[test]
fn corrupt_category_list_loads_empty() {
    let store = MemoryStore::new();
    store.set(keys::CATEGORIES, "{oops").unwrap();
    assert!(CategoryStore::load(&store).is_empty());
}
