//! Theme preference
//!
//! Read once when the store is opened, written through to the settings table
//! on every change before the cached value moves. Clones share the cache, so
//! every window of the process sees the same theme.

use parking_lot::RwLock;
use std::sync::Arc;

use binjola_storage::Database;

use crate::Result;

const THEME_KEY: &str = "theme";

pub struct PreferenceStore {
    db: Database,
    dark_theme: Arc<RwLock<bool>>,
}

impl PreferenceStore {
    pub fn open(db: Database) -> Result<Self> {
        let dark_theme = db.get_bool_setting(THEME_KEY, false)?;

        tracing::debug!(dark_theme, "Loaded theme preference");

        Ok(Self {
            db,
            dark_theme: Arc::new(RwLock::new(dark_theme)),
        })
    }

    /// True when the dark theme is selected
    pub fn get_theme(&self) -> bool {
        *self.dark_theme.read()
    }

    /// Persist first; the cached value only changes once the write committed
    pub fn set_theme(&self, dark: bool) -> Result<()> {
        let mut current = self.dark_theme.write();
        self.db.set_bool_setting(THEME_KEY, dark)?;
        *current = dark;

        tracing::info!(dark_theme = dark, "Theme changed");

        Ok(())
    }

    /// Flip the theme and return the new value
    pub fn toggle_theme(&self) -> Result<bool> {
        let mut current = self.dark_theme.write();
        let next = !*current;
        self.db.set_bool_setting(THEME_KEY, next)?;
        *current = next;

        tracing::info!(dark_theme = next, "Theme toggled");

        Ok(next)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for PreferenceStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            dark_theme: Arc::clone(&self.dark_theme),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_light() {
        let store = PreferenceStore::open(Database::open_in_memory().unwrap()).unwrap();
        assert!(!store.get_theme());
    }

    #[test]
    fn test_theme_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("MyApp").join("WebKitBrowser").join("binjola.db");

        {
            let store = PreferenceStore::open(Database::open(&path).unwrap()).unwrap();
            store.set_theme(true).unwrap();
        }

        let store = PreferenceStore::open(Database::open(&path).unwrap()).unwrap();
        assert!(store.get_theme());
    }

    #[test]
    fn test_toggle_is_shared_between_clones() {
        let store = PreferenceStore::open(Database::open_in_memory().unwrap()).unwrap();
        let other_window = store.clone();

        assert!(store.toggle_theme().unwrap());
        assert!(other_window.get_theme());

        assert!(!other_window.toggle_theme().unwrap());
        assert!(!store.get_theme());
        assert_eq!(
            store.database().get_setting(THEME_KEY).unwrap().as_deref(),
            Some("false")
        );
    }
}
