//! Error types shared across the crate.
//!
//! Each collaborator gets its own enum so callers can tell an engine
//! rejection apart from a storage hiccup. [`Error`] covers startup and the
//! terminal loop, and is what `main` returns; session errors are logged and
//! recovered from.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by an [`AudioEngine`](crate::engine::AudioEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// `initialize()` was never called, or `dispose()` already ran.
    #[error("audio engine is not initialized")]
    NotInitialized,

    /// No output device could be opened.
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    /// The track file could not be opened.
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The track file could not be decoded.
    #[error("failed to decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// A transport command was issued with nothing loaded.
    #[error("no track loaded")]
    NothingLoaded,

    /// The engine refused the request for another reason.
    #[error("engine rejected request: {0}")]
    Rejected(String),
}

/// Failures reported by a [`KeyValueStore`](crate::storage::KeyValueStore).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a valid table of strings.
    #[error("corrupt store file: {0}")]
    Corrupt(String),

    /// A value could not be encoded before writing.
    #[error("failed to encode value: {0}")]
    Encode(String),
}

/// Sleep timer errors.
#[derive(Debug, Error, PartialEq)]
pub enum TimerError {
    #[error("sleep timer duration must be a positive number of hours, got {0}")]
    InvalidDuration(f64),
}

/// Top-level error returned by [`runtime::run`](crate::runtime::run).
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
