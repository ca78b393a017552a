//! Durable string-keyed storage.
//!
//! The playback core only ever talks to the [`KeyValueStore`] trait. Two
//! adapters ship here: [`FileStore`] (a TOML table on disk) and
//! [`MemoryStore`] for tests and throwaway sessions. [`keys`] owns the key
//! schema so nobody hand-builds key strings.

mod file;
pub mod keys;
mod memory;

use std::rc::Rc;

use crate::error::StorageError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable get/set/remove over string keys and values.
///
/// Methods take `&self`: adapters use interior mutability so the store can
/// be shared between the controller and the category list on one thread.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Write `value`, logging instead of failing. Storage is never fatal:
/// in-memory state stays authoritative for the session.
pub(crate) fn set_or_warn<S: KeyValueStore + ?Sized>(store: &S, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!(key, error = %e, "failed to persist value");
    }
}

/// Remove `key`, logging instead of failing.
pub(crate) fn remove_or_warn<S: KeyValueStore + ?Sized>(store: &S, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, error = %e, "failed to remove value");
    }
}

/// Read `key`, treating a failed read like a missing value.
pub(crate) fn get_or_warn<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read value");
            None
        }
    }
}

#[cfg(test)]
mod tests;
