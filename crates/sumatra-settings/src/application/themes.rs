//! Theme catalog: built-in themes plus the user's persisted ones.
//!
//! Lookup order is the persisted store first, then the built-in table, so a
//! stored theme called `"Dark"` shadows the built-in `Dark`.  Listing shows
//! every name once: built-ins in their fixed order, then stored names sorted.

use sumatra_core::{BuiltinTheme, ThemeColors, ThemeError};
use thiserror::Error;

use crate::infrastructure::storage::theme_store::{ThemeStore, ThemeStoreError};

/// Slot the custom theme dialog saves into.
pub const CUSTOM_THEME_NAME: &str = "Custom";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("theme name must not be empty")]
    EmptyName,

    #[error(transparent)]
    Invalid(#[from] ThemeError),

    #[error(transparent)]
    Store(#[from] ThemeStoreError),
}

/// Named themes available to the rewriter.
#[derive(Debug, Clone)]
pub struct ThemeCatalog {
    store: ThemeStore,
}

impl ThemeCatalog {
    pub fn new(store: ThemeStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }

    /// Every selectable theme name.
    pub fn list_themes(&self) -> Result<Vec<String>, CatalogError> {
        let stored = self.store.load_all()?;
        let mut names: Vec<String> = BuiltinTheme::ALL
            .iter()
            .map(|theme| theme.name().to_string())
            .collect();
        names.extend(
            stored
                .into_keys()
                .filter(|name| BuiltinTheme::from_name(name).is_none()),
        );
        Ok(names)
    }

    /// Colour values for `name`, or `None` if no such theme exists.
    pub fn resolve(&self, name: &str) -> Result<Option<ThemeColors>, CatalogError> {
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(colors) = self.store.get(name)? {
            return Ok(Some(colors));
        }
        Ok(BuiltinTheme::from_name(name).map(BuiltinTheme::colors))
    }

    /// Validates `colors` and stores them under `name`, replacing any
    /// previous theme of that name.
    ///
    /// # Errors
    ///
    /// [`CatalogError::EmptyName`], [`CatalogError::Invalid`] for a
    /// malformed colour, or a store failure.
    pub fn add_theme(&self, name: &str, colors: &ThemeColors) -> Result<(), CatalogError> {
        if name.trim().is_empty() {
            return Err(CatalogError::EmptyName);
        }
        colors.validate()?;
        self.store.upsert(name, colors)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sumatra_core::ColorSetting;
    use tempfile::TempDir;

    fn catalog_in(dir: &TempDir) -> ThemeCatalog {
        ThemeCatalog::new(ThemeStore::new(dir.path().join("backup_db.json")))
    }

    #[test]
    fn test_list_without_store_shows_builtins_in_order() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            catalog_in(&dir).list_themes().unwrap(),
            ["Light", "Dark", "Dracula"]
        );
    }

    #[test]
    fn test_list_appends_sorted_custom_names_once() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);
        let colors = BuiltinTheme::Dark.colors();
        catalog.add_theme("Sepia", &colors).unwrap();
        catalog.add_theme("Custom", &colors).unwrap();
        catalog.add_theme("Dark", &colors).unwrap();

        // Act
        let names = catalog.list_themes().unwrap();

        // Assert
        assert_eq!(names, ["Light", "Dark", "Dracula", "Custom", "Sepia"]);
    }

    #[test]
    fn test_resolve_builtin_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        assert_eq!(
            catalog.resolve("Dracula").unwrap(),
            Some(BuiltinTheme::Dracula.colors())
        );
        assert_eq!(catalog.resolve("dracula").unwrap(), None);
        assert_eq!(catalog.resolve("").unwrap(), None);
    }

    #[test]
    fn test_stored_theme_shadows_builtin() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);
        let mut dark = BuiltinTheme::Dark.colors();
        dark.set(ColorSetting::TextColor, "#ff0000");
        catalog.add_theme("Dark", &dark).unwrap();

        let resolved = catalog.resolve("Dark").unwrap().unwrap();

        assert_eq!(resolved.get(ColorSetting::TextColor), "#ff0000");
    }

    #[test]
    fn test_add_theme_rejects_invalid_color() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);
        let mut colors = BuiltinTheme::Light.colors();
        colors.set(ColorSetting::SelectionColor, "yellow");

        let result = catalog.add_theme(CUSTOM_THEME_NAME, &colors);

        assert!(matches!(
            result,
            Err(CatalogError::Invalid(ThemeError::InvalidColor { .. }))
        ));
        assert!(!catalog.store().path().exists());
    }

    #[test]
    fn test_add_theme_rejects_blank_name() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            catalog_in(&dir).add_theme("  ", &BuiltinTheme::Light.colors()),
            Err(CatalogError::EmptyName)
        ));
    }
}
