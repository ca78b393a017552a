use super::*;
use tempfile::tempdir;

#[test]
fn memory_store_round_trips_and_removes() {
    let store = MemoryStore::new();
    assert_eq!(store.get("mode").unwrap(), None);

    store.set("mode", "random").unwrap();
    assert_eq!(store.get("mode").unwrap().as_deref(), Some("random"));

    store.remove("mode").unwrap();
    assert_eq!(store.get("mode").unwrap(), None);
    // Removing a missing key is fine.
    store.remove("mode").unwrap();
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.toml");

    {
        let store = FileStore::open(&path).unwrap();
        store.set(&keys::playlist("Road Trip"), r#"[{"name":"a.mp3"}]"#).unwrap();
        store.set(keys::MODE, "single").unwrap();
        store.set(keys::LAST_CATEGORY, "Road Trip").unwrap();
        store.remove(keys::LAST_CATEGORY).unwrap();
    }

    let store = FileStore::open(&path).unwrap();
    assert_eq!(
        store.get(&keys::playlist("Road Trip")).unwrap().as_deref(),
        Some(r#"[{"name":"a.mp3"}]"#)
    );
    assert_eq!(store.get(keys::MODE).unwrap().as_deref(), Some("single"));
    assert_eq!(store.get(keys::LAST_CATEGORY).unwrap(), None);
}

#[test]
fn file_store_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let store = FileStore::open(dir.path().join("absent.toml")).unwrap();
    assert_eq!(store.get(keys::MODE).unwrap(), None);
    assert!(!store.path().exists());
}

#[test]
fn file_store_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    assert!(matches!(
        FileStore::open(&path),
        Err(crate::error::StorageError::Corrupt(_))
    ));
}

#[test]
fn rc_store_shares_state() {
    let store = std::rc::Rc::new(MemoryStore::new());
    let other = store.clone();
    other.set(keys::CATEGORIES, "[]").unwrap();
    assert_eq!(
        KeyValueStore::get(&store, keys::CATEGORIES).unwrap().as_deref(),
        Some("[]")
    );
}

#[test]
fn category_keys_are_scoped() {
    assert_eq!(keys::playlist("Jazz"), "playlist/Jazz");
    assert_eq!(keys::playing("Jazz"), "playing/Jazz");
    assert_eq!(keys::position("Jazz"), "position/Jazz");
    assert_ne!(keys::playlist("Jazz"), keys::playlist("Rock"));
}
