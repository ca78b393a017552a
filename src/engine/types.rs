//! Small value types exchanged with the engine.

/// Snapshot of the loaded track as reported by the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStatus {
    pub position_ms: u64,
    /// 0 when the duration is not known.
    pub duration_ms: u64,
    pub is_playing: bool,
    /// The track ran to its end.
    pub finished: bool,
}

/// Returned by a successful `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackHandle {
    pub duration_ms: Option<u64>,
}
