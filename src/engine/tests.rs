use super::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn rodio_engine_requires_initialize_before_load() {
    let mut engine = RodioEngine::new();
    assert!(matches!(
        engine.load("/tmp/does-not-matter.mp3"),
        Err(crate::error::EngineError::NotInitialized)
    ));
}

#[test]
fn rodio_engine_reports_nothing_loaded() {
    let mut engine = RodioEngine::new();
    assert_eq!(engine.status(), None);
    assert!(matches!(
        engine.play(),
        Err(crate::error::EngineError::NothingLoaded)
    ));
    assert!(matches!(
        engine.seek(1_000),
        Err(crate::error::EngineError::NothingLoaded)
    ));
    // Unload and dispose without a track are no-ops.
    assert!(engine.unload().is_ok());
    assert!(engine.dispose().is_ok());
}

#[test]
fn probe_duration_ignores_non_audio_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fake.mp3");
    fs::write(&path, b"definitely not an mp3").unwrap();

    assert_eq!(probe_duration(&path), None);
    assert_eq!(probe_duration(&dir.path().join("missing.flac")), None);
}
