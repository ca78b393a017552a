//! The persisted list of categories and the "last opened" pointer.

use crate::storage::{self, KeyValueStore, keys};

#[derive(Debug, Default, Clone)]
pub struct CategoryStore {
    names: Vec<String>,
}

impl CategoryStore {
    /// Read the category list; unreadable data yields an empty list.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let names = match storage::get_or_warn(store, keys::CATEGORIES) {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "category list is corrupt, starting empty");
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Append a category. Blank or already-existing names are refused.
    pub fn add<S: KeyValueStore + ?Sized>(&mut self, store: &S, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        self.persist(store);
        tracing::info!(category = name, "category added");
        true
    }

    /// Remove the category at `index` along with its playlist and session
    /// keys.
    pub fn remove<S: KeyValueStore + ?Sized>(&mut self, store: &S, index: usize) -> Option<String> {
        if index >= self.names.len() {
            return None;
        }
        let name = self.names.remove(index);

        storage::remove_or_warn(store, &keys::playlist(&name));
        storage::remove_or_warn(store, &keys::playing(&name));
        storage::remove_or_warn(store, &keys::position(&name));
        if Self::last_opened(store).as_deref() == Some(name.as_str()) {
            Self::clear_last_opened(store);
        }

        self.persist(store);
        tracing::info!(category = %name, "category removed");
        Some(name)
    }

    /// The category that was open when the app last exited, if any.
    pub fn last_opened<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
        storage::get_or_warn(store, keys::LAST_CATEGORY).filter(|s| !s.is_empty())
    }

    pub fn set_last_opened<S: KeyValueStore + ?Sized>(store: &S, name: &str) {
        storage::set_or_warn(store, keys::LAST_CATEGORY, name);
    }

    pub fn clear_last_opened<S: KeyValueStore + ?Sized>(store: &S) {
        storage::remove_or_warn(store, keys::LAST_CATEGORY);
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, store: &S) {
        match serde_json::to_string(&self.names) {
            Ok(raw) => storage::set_or_warn(store, keys::CATEGORIES, &raw),
            Err(e) => tracing::warn!(error = %e, "failed to encode category list"),
        }
    }
}
