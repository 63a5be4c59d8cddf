#![forbid(unsafe_code)]

//! Light/dark theme preference.
//!
//! Resolution order at load: a stored `"dark"`/`"light"` wins; anything else
//! (missing, unreadable, or unrecognized) falls back to the system
//! "prefers dark" signal. Only [`ThemeController::toggle`] writes.

use std::collections::HashMap;

use crate::error::PageError;
use crate::{debug, warn};

/// Theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse a stored value. Only the exact strings `"light"` and `"dark"`
    /// are recognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Pick the effective preference from a stored value and the system hint.
    #[must_use]
    pub fn resolve(stored: Option<&str>, system_prefers_dark: bool) -> Self {
        match stored.and_then(Self::parse) {
            Some(pref) => pref,
            None if system_prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }
}

impl core::fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String key/value store backing the theme preference.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PageError>;
}

/// In-memory store for native hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Reject every write, like a browser with storage disabled.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PageError> {
        if self.read_only {
            return Err(PageError::Storage(format!("store is read-only ({key})")));
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Owns the active preference and its store.
#[derive(Debug)]
pub struct ThemeController<S> {
    store: S,
    key: String,
    current: ThemePreference,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the initial preference.
    ///
    /// A failing read is logged and treated as "nothing stored".
    pub fn load(store: S, key: impl Into<String>, system_prefers_dark: bool) -> Self {
        let key = key.into();
        let stored = match store.get(&key) {
            Ok(value) => value,
            Err(err) => {
                warn!(%err, "theme preference unreadable; using system preference");
                None
            }
        };
        let current = ThemePreference::resolve(stored.as_deref(), system_prefers_dark);
        debug!(theme = current.as_str(), system_prefers_dark, "theme resolved");
        Self {
            store,
            key,
            current,
        }
    }

    #[must_use]
    pub const fn current(&self) -> ThemePreference {
        self.current
    }

    /// Flip the preference and persist it.
    ///
    /// The flip stands even if persisting fails; the failure is logged.
    pub fn toggle(&mut self) -> ThemePreference {
        self.current = self.current.toggled();
        if let Err(err) = self.store.set(&self.key, self.current.as_str()) {
            warn!(%err, "theme preference not persisted");
        }
        debug!(theme = self.current.as_str(), "theme toggled");
        self.current
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PageError> {
            Err(PageError::Storage("denied".into()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PageError> {
            Err(PageError::Storage("denied".into()))
        }
    }

    #[test]
    fn stored_value_beats_system_signal() {
        let store = MemoryStore::new().with_entry("theme", "light");
        let theme = ThemeController::load(store, "theme", true);
        assert_eq!(theme.current(), ThemePreference::Light);

        let store = MemoryStore::new().with_entry("theme", "dark");
        let theme = ThemeController::load(store, "theme", false);
        assert_eq!(theme.current(), ThemePreference::Dark);
    }

    #[test]
    fn absent_value_follows_system_signal() {
        let theme = ThemeController::load(MemoryStore::new(), "theme", true);
        assert_eq!(theme.current(), ThemePreference::Dark);
        let theme = ThemeController::load(MemoryStore::new(), "theme", false);
        assert_eq!(theme.current(), ThemePreference::Light);
    }

    #[test]
    fn unrecognized_value_counts_as_absent() {
        let store = MemoryStore::new().with_entry("theme", "Dark ");
        let theme = ThemeController::load(store, "theme", false);
        assert_eq!(theme.current(), ThemePreference::Light);
    }

    #[test]
    fn toggle_persists() {
        let mut theme = ThemeController::load(MemoryStore::new(), "theme", false);
        assert_eq!(theme.toggle(), ThemePreference::Dark);
        assert_eq!(theme.store().entry("theme"), Some("dark"));
        assert_eq!(theme.toggle(), ThemePreference::Light);
        assert_eq!(theme.store().entry("theme"), Some("light"));
    }

    #[test]
    fn broken_store_degrades_gracefully() {
        let mut theme = ThemeController::load(BrokenStore, "theme", true);
        assert_eq!(theme.current(), ThemePreference::Dark);
        assert_eq!(theme.toggle(), ThemePreference::Light);
    }

    #[test]
    fn read_only_store_keeps_flip() {
        let store = MemoryStore::new().with_entry("theme", "dark").read_only();
        let mut theme = ThemeController::load(store, "theme", false);
        assert_eq!(theme.toggle(), ThemePreference::Light);
        assert_eq!(theme.store().entry("theme"), Some("dark"));
    }

    #[test]
    fn string_forms() {
        assert_eq!(ThemePreference::Dark.to_string(), "dark");
        assert_eq!(ThemePreference::parse("light"), Some(ThemePreference::Light));
        assert_eq!(ThemePreference::parse("auto"), None);
    }
}
