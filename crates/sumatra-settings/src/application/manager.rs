//! `SettingsManager`: the single entry point front ends talk to.
//!
//! It owns the three file locations ([`SettingsPaths`]) and wires the backup
//! ledger, the theme catalog and the settings rewriter together.  Nothing
//! here is global; two managers pointed at different folders are fully
//! independent, which is what the integration tests rely on.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use sumatra_core::{extract_current, rewrite_theme, BackupRecord, ThemeColors, ThemeError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use super::manage_backups::BackupOptions;
use super::manage_backups::{BackupError, BackupManager, DeleteOutcome, RevertOutcome};
use super::themes::{CatalogError, ThemeCatalog, CUSTOM_THEME_NAME};
use crate::infrastructure::storage::atomic::write_atomic;
use crate::infrastructure::storage::ledger::{LedgerLookup, LedgerStore};
use crate::infrastructure::storage::theme_store::ThemeStore;

/// Absolute locations of every file the manager touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPaths {
    /// The live `SumatraPDF-settings.txt`.
    pub settings_file: PathBuf,
    /// JSON ledger of backups.
    pub ledger_file: PathBuf,
    /// JSON store of custom themes.  May be the same file as the ledger.
    pub theme_store_file: PathBuf,
}

impl SettingsPaths {
    /// Default file names inside `folder`, sharing one `backup_db.json`.
    pub fn in_folder(folder: &Path) -> Self {
        Self {
            settings_file: folder.join("SumatraPDF-settings.txt"),
            ledger_file: folder.join("backup_db.json"),
            theme_store_file: folder.join("backup_db.json"),
        }
    }
}

/// Umbrella error for facade operations.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// The settings file lacks a colour line or holds a blank one.
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Sumatra settings file not found at {0}")]
    SettingsFileMissing(PathBuf),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result of applying a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeApplyOutcome {
    /// The settings file was rewritten.
    Applied,
    /// The file already carried the theme's colours; nothing was written.
    Unchanged,
    /// No theme with that name exists; nothing was read or written.
    UnknownTheme,
}

/// Backup ledger and theme switching for one SumatraPDF settings file.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    paths: SettingsPaths,
    backups: BackupManager,
    catalog: ThemeCatalog,
}

impl SettingsManager {
    pub fn new(paths: SettingsPaths, options: BackupOptions) -> Self {
        let backups = BackupManager::new(
            paths.settings_file.clone(),
            LedgerStore::new(paths.ledger_file.clone()),
            options,
        );
        let catalog = ThemeCatalog::new(ThemeStore::new(paths.theme_store_file.clone()));
        Self {
            paths,
            backups,
            catalog,
        }
    }

    pub fn paths(&self) -> &SettingsPaths {
        &self.paths
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub fn settings_file_exists(&self) -> bool {
        self.paths.settings_file.is_file()
    }

    // ── Backups ───────────────────────────────────────────────────────────────

    pub fn create_backup(&self) -> Result<BackupRecord, ManagerError> {
        Ok(self.backups.create()?)
    }

    pub fn list_backups(&self) -> Result<LedgerLookup, ManagerError> {
        Ok(self.backups.list()?)
    }

    /// Restores the backup at 1-based `index` of [`Self::list_backups`].
    pub fn revert_to_backup(&self, index: usize) -> Result<RevertOutcome, ManagerError> {
        Ok(self.backups.revert(index)?)
    }

    /// Deletes the backup at 1-based `index` of [`Self::list_backups`].
    pub fn delete_backup(&self, index: usize) -> Result<DeleteOutcome, ManagerError> {
        Ok(self.backups.delete(index)?)
    }

    // ── Themes ────────────────────────────────────────────────────────────────

    pub fn list_themes(&self) -> Result<Vec<String>, ManagerError> {
        Ok(self.catalog.list_themes()?)
    }

    /// Colour values currently written in the settings file.
    ///
    /// # Errors
    ///
    /// [`ManagerError::SettingsFileMissing`], [`ManagerError::Io`], or
    /// [`ManagerError::Theme`] when a colour line is absent or blank.
    pub fn current_colors(&self) -> Result<ThemeColors, ManagerError> {
        let text = self.read_settings()?;
        Ok(extract_current(&text)?)
    }

    /// Rewrites the settings file to use the theme called `name`.
    ///
    /// Unknown and empty names are a no-op reported as
    /// [`ThemeApplyOutcome::UnknownTheme`].
    ///
    /// # Errors
    ///
    /// Catalog lookup failures, a missing or unreadable settings file, a
    /// settings file without all colour lines, or a failed write.  On error
    /// the settings file is left as it was.
    pub fn apply_theme(&self, name: &str) -> Result<ThemeApplyOutcome, ManagerError> {
        let Some(target) = self.catalog.resolve(name)? else {
            warn!(theme = %name, "unknown theme, nothing applied");
            return Ok(ThemeApplyOutcome::UnknownTheme);
        };

        let text = self.read_settings()?;
        let current = extract_current(&text)?;
        let rewritten = rewrite_theme(&text, &current, Some(&target));
        if rewritten == text {
            debug!(theme = %name, "settings already use theme");
            return Ok(ThemeApplyOutcome::Unchanged);
        }

        write_atomic(&self.paths.settings_file, rewritten.as_bytes()).map_err(|source| {
            ManagerError::Io {
                path: self.paths.settings_file.clone(),
                source,
            }
        })?;
        info!(theme = %name, "theme applied");
        Ok(ThemeApplyOutcome::Applied)
    }

    /// Saves `colors` as the `"Custom"` theme and applies it.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Invalid`] (wrapped) when a value is not a colour; the
    /// store and the settings file are untouched in that case.  Otherwise as
    /// [`Self::apply_theme`].
    pub fn add_custom_theme(&self, colors: &ThemeColors) -> Result<ThemeApplyOutcome, ManagerError> {
        self.catalog.add_theme(CUSTOM_THEME_NAME, colors)?;
        self.apply_theme(CUSTOM_THEME_NAME)
    }

    fn read_settings(&self) -> Result<String, ManagerError> {
        let path = &self.paths.settings_file;
        std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ManagerError::SettingsFileMissing(path.clone())
            } else {
                ManagerError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sumatra_core::{BuiltinTheme, ColorSetting};
    use tempfile::TempDir;

    const LIGHT_SETTINGS: &str = "\
FixedPageUI [
\tTextColor = #000000
\tBackgroundColor = #ffffff
\tSelectionColor = #f5fc0c
]
MainWindowBackground = #80fff200
\tGradientColors = #2828aa #28aa28 #aa2828
";

    fn manager_in(dir: &TempDir) -> SettingsManager {
        let paths = SettingsPaths::in_folder(dir.path());
        std::fs::write(&paths.settings_file, LIGHT_SETTINGS).unwrap();
        SettingsManager::new(paths, BackupOptions::default())
    }

    fn settings_text(mgr: &SettingsManager) -> String {
        std::fs::read_to_string(&mgr.paths().settings_file).unwrap()
    }

    #[test]
    fn test_in_folder_shares_one_json_document() {
        let paths = SettingsPaths::in_folder(Path::new("/x"));
        assert_eq!(paths.ledger_file, paths.theme_store_file);
        assert!(paths.settings_file.ends_with("SumatraPDF-settings.txt"));
    }

    #[test]
    fn test_current_colors_reads_light_values() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);

        assert_eq!(mgr.current_colors().unwrap(), BuiltinTheme::Light.colors());
    }

    #[test]
    fn test_apply_dark_rewrites_settings() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);

        // Act
        let outcome = mgr.apply_theme("Dark").unwrap();

        // Assert
        assert_eq!(outcome, ThemeApplyOutcome::Applied);
        assert!(settings_text(&mgr).contains("\tTextColor = #dddddd\n"));
        assert_eq!(mgr.current_colors().unwrap(), BuiltinTheme::Dark.colors());
    }

    #[test]
    fn test_apply_same_theme_twice_is_unchanged() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);
        mgr.apply_theme("Dracula").unwrap();
        let after_first = settings_text(&mgr);

        assert_eq!(mgr.apply_theme("Dracula").unwrap(), ThemeApplyOutcome::Unchanged);
        assert_eq!(settings_text(&mgr), after_first);
    }

    #[test]
    fn test_apply_unknown_theme_is_noop() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);

        assert_eq!(mgr.apply_theme("Solarized").unwrap(), ThemeApplyOutcome::UnknownTheme);
        assert_eq!(mgr.apply_theme("").unwrap(), ThemeApplyOutcome::UnknownTheme);
        assert_eq!(settings_text(&mgr), LIGHT_SETTINGS);
    }

    #[test]
    fn test_apply_with_missing_setting_leaves_file_untouched() {
        // Arrange: no GradientColors line
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);
        let truncated = LIGHT_SETTINGS.replace("\tGradientColors = #2828aa #28aa28 #aa2828\n", "");
        std::fs::write(&mgr.paths().settings_file, &truncated).unwrap();

        // Act
        let result = mgr.apply_theme("Dark");

        // Assert
        assert!(matches!(
            result,
            Err(ManagerError::Theme(ThemeError::MissingSetting(ColorSetting::GradientColors)))
        ));
        assert_eq!(settings_text(&mgr), truncated);
    }

    #[test]
    fn test_apply_without_settings_file() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);
        std::fs::remove_file(&mgr.paths().settings_file).unwrap();

        assert!(!mgr.settings_file_exists());
        assert!(matches!(
            mgr.apply_theme("Dark"),
            Err(ManagerError::SettingsFileMissing(_))
        ));
    }

    #[test]
    fn test_add_custom_theme_stores_and_applies() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);
        let mut custom = BuiltinTheme::Light.colors();
        custom.set(ColorSetting::BackgroundColor, "#fdf6e3");

        // Act
        let outcome = mgr.add_custom_theme(&custom).unwrap();

        // Assert
        assert_eq!(outcome, ThemeApplyOutcome::Applied);
        assert!(settings_text(&mgr).contains("BackgroundColor = #fdf6e3"));
        assert!(mgr.list_themes().unwrap().contains(&CUSTOM_THEME_NAME.to_string()));
    }

    #[test]
    fn test_add_invalid_custom_theme_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);
        let mut custom = BuiltinTheme::Light.colors();
        custom.set(ColorSetting::GradientColors, "#000000 #111111");

        let result = mgr.add_custom_theme(&custom);

        assert!(matches!(
            result,
            Err(ManagerError::Catalog(CatalogError::Invalid(ThemeError::GradientArity { found: 2, .. })))
        ));
        assert_eq!(settings_text(&mgr), LIGHT_SETTINGS);
        assert!(!mgr.paths().theme_store_file.exists());
    }

    #[test]
    fn test_backups_and_custom_theme_share_document() {
        let dir = TempDir::new().unwrap();
        let mgr = manager_in(&dir);

        let record = mgr.create_backup().unwrap();
        mgr.add_custom_theme(&BuiltinTheme::Dracula.colors()).unwrap();

        assert_eq!(mgr.list_backups().unwrap(), LedgerLookup::Records(vec![record]));
        assert_eq!(mgr.list_themes().unwrap().last().map(String::as_str), Some("Custom"));
    }
}
