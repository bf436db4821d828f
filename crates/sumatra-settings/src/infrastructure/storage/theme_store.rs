//! Persisted user-defined themes.
//!
//! Stored as a JSON object with a top-level `"themes"` key:
//!
//! ```json
//! {
//!     "themes": {
//!         "Custom": {
//!             "TextColor": "#e0e0e0",
//!             "BackgroundColor": "#101010",
//!             "MainWindowBackground": "#202020",
//!             "SelectionColor": "#3366cc",
//!             "GradientColors": "#101010 #181818 #202020"
//!         }
//!     }
//! }
//! ```
//!
//! Entries that do not describe a complete theme are skipped with a warning
//! rather than making every other theme unreadable.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sumatra_core::ThemeColors;
use thiserror::Error;
use tracing::{debug, warn};

use super::document::{read_document, write_document, DocumentError};

/// Top-level key holding the theme map.
pub const THEMES_KEY: &str = "themes";

/// Error type for theme store operations.
#[derive(Debug, Error)]
pub enum ThemeStoreError {
    /// `"themes"` exists but is not an object.
    #[error("{path}: \"themes\" must be an object")]
    NotAMap { path: PathBuf },

    /// Reading or writing the document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// JSON-backed store of custom themes.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns every valid stored theme by name.
    ///
    /// A missing document is an empty store.
    ///
    /// # Errors
    ///
    /// Read/parse failures, or [`ThemeStoreError::NotAMap`].
    pub fn load_all(&self) -> Result<BTreeMap<String, ThemeColors>, ThemeStoreError> {
        let Some(document) = read_document(&self.path)? else {
            return Ok(BTreeMap::new());
        };
        let entries = match document.get(THEMES_KEY) {
            None | Some(Value::Null) => return Ok(BTreeMap::new()),
            Some(Value::Object(entries)) => entries,
            Some(_) => {
                return Err(ThemeStoreError::NotAMap {
                    path: self.path.clone(),
                })
            }
        };

        let mut themes = BTreeMap::new();
        for (name, value) in entries {
            match serde_json::from_value::<ThemeColors>(value.clone()) {
                Ok(colors) => {
                    themes.insert(name.clone(), colors);
                }
                Err(e) => warn!(theme = %name, "skipping unreadable custom theme: {e}"),
            }
        }
        Ok(themes)
    }

    /// Looks up a stored theme by name.
    pub fn get(&self, name: &str) -> Result<Option<ThemeColors>, ThemeStoreError> {
        Ok(self.load_all()?.remove(name))
    }

    /// Inserts or overwrites the theme called `name`.
    ///
    /// # Errors
    ///
    /// Read/parse/write failures, or [`ThemeStoreError::NotAMap`].
    pub fn upsert(&self, name: &str, colors: &ThemeColors) -> Result<(), ThemeStoreError> {
        let mut document = read_document(&self.path)?.unwrap_or_default();
        let entry = document
            .entry(THEMES_KEY)
            .or_insert_with(|| Value::Object(Default::default()));
        if entry.is_null() {
            *entry = Value::Object(Default::default());
        }
        let Value::Object(entries) = entry else {
            return Err(ThemeStoreError::NotAMap {
                path: self.path.clone(),
            });
        };

        let value = serde_json::to_value(colors).map_err(|source| DocumentError::Serialize {
            path: self.path.clone(),
            source,
        })?;
        entries.insert(name.to_string(), value);
        debug!(theme = %name, "storing custom theme");
        write_document(&self.path, &document)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sumatra_core::{BuiltinTheme, ColorSetting};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ThemeStore {
        ThemeStore::new(dir.path().join("backup_db.json"))
    }

    #[test]
    fn test_missing_document_is_empty_store() {
        let dir = TempDir::new().unwrap();
        assert!(store_in(&dir).load_all().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_then_get() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let colors = BuiltinTheme::Dracula.colors();

        // Act
        store.upsert("Custom", &colors).unwrap();

        // Assert
        assert_eq!(store.get("Custom").unwrap(), Some(colors));
        assert_eq!(store.get("Other").unwrap(), None);
    }

    #[test]
    fn test_upsert_overwrites_existing_slot() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.upsert("Custom", &BuiltinTheme::Dark.colors()).unwrap();

        let mut changed = BuiltinTheme::Dark.colors();
        changed.set(ColorSetting::TextColor, "#abcdef");
        store.upsert("Custom", &changed).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["Custom"].get(ColorSetting::TextColor), "#abcdef");
    }

    #[test]
    fn test_upsert_preserves_ledger_key() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"backup records": [{"a.txt": "t"}]}"#).unwrap();

        store.upsert("Custom", &BuiltinTheme::Light.colors()).unwrap();

        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(json["backup records"][0]["a.txt"], "t");
        assert_eq!(json["themes"]["Custom"]["TextColor"], "#000000");
    }

    #[test]
    fn test_incomplete_entry_is_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r##"{"themes": {"Broken": {"TextColor": "#000000"}}}"##,
        )
        .unwrap();

        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_non_object_themes_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"themes": []}"#).unwrap();

        assert!(matches!(store.load_all(), Err(ThemeStoreError::NotAMap { .. })));
        assert!(matches!(
            store.upsert("Custom", &BuiltinTheme::Light.colors()),
            Err(ThemeStoreError::NotAMap { .. })
        ));
    }
}
