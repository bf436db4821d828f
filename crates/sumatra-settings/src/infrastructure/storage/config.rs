//! TOML-based configuration for the settings manager.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\SumatraSettings\config.toml`
//! - Linux:    `~/.config/sumatra-settings/config.toml`
//! - macOS:    `~/Library/Application Support/SumatraSettings/config.toml`
//!
//! The config only says *where* things are and how backups are named; it never
//! holds colour values.  Example:
//!
//! ```toml
//! [paths]
//! settings_folder = 'C:\Users\reader\AppData\Local\SumatraPDF'
//! settings_file = "SumatraPDF-settings.txt"
//! ledger_file = "backup_db.json"
//! theme_store_file = "backup_db.json"
//!
//! [backup]
//! ledger_key = "backup records"
//! suffix = "_backup"
//! timestamp_format = "%Y-%m-%d %H:%M:%S"
//!
//! [logging]
//! level = "info"
//! ```
//!
//! # Serde default values
//!
//! Every field has a `#[serde(default = "...")]` so that a missing file, an
//! empty file, or a file written by an older version all load cleanly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sumatra_core::DEFAULT_BACKUP_SUFFIX;
use thiserror::Error;

use crate::application::manage_backups::{BackupOptions, DEFAULT_TIMESTAMP_FORMAT};
use crate::application::manager::SettingsPaths;
use crate::infrastructure::storage::ledger::DEFAULT_LEDGER_KEY;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// No settings folder was configured and none could be derived.
    #[error("could not determine the SumatraPDF settings folder; set paths.settings_folder")]
    NoSettingsFolder,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the settings file and the tool's own documents live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    /// Folder containing the SumatraPDF settings file.  When absent the
    /// platform default is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_folder: Option<PathBuf>,
    /// Settings file name, relative to the settings folder.
    #[serde(default = "default_settings_file")]
    pub settings_file: String,
    /// Ledger document name, relative to the settings folder.
    #[serde(default = "default_store_file")]
    pub ledger_file: String,
    /// Custom theme document name, relative to the settings folder.
    #[serde(default = "default_store_file")]
    pub theme_store_file: String,
}

/// Backup naming and ledger layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupConfig {
    #[serde(default = "default_ledger_key")]
    pub ledger_key: String,
    /// Marker inserted before the settings file's extension.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// `chrono` format string for backup timestamps (local time).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_settings_file() -> String {
    "SumatraPDF-settings.txt".to_string()
}
fn default_store_file() -> String {
    "backup_db.json".to_string()
}
fn default_ledger_key() -> String {
    DEFAULT_LEDGER_KEY.to_string()
}
fn default_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_string()
}
fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            settings_folder: None,
            settings_file: default_settings_file(),
            ledger_file: default_store_file(),
            theme_store_file: default_store_file(),
        }
    }
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            ledger_key: default_ledger_key(),
            suffix: default_suffix(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Resolves the absolute file locations.
    ///
    /// `folder_override` (from the command line) wins over the configured
    /// folder, which wins over the platform default.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NoSettingsFolder`] when no folder is configured and the
    /// platform default cannot be determined.
    pub fn settings_paths(&self, folder_override: Option<&Path>) -> Result<SettingsPaths, ConfigError> {
        let folder = folder_override
            .map(Path::to_path_buf)
            .or_else(|| self.paths.settings_folder.clone())
            .or_else(default_settings_folder)
            .ok_or(ConfigError::NoSettingsFolder)?;

        Ok(SettingsPaths {
            settings_file: folder.join(&self.paths.settings_file),
            ledger_file: folder.join(&self.paths.ledger_file),
            theme_store_file: folder.join(&self.paths.theme_store_file),
        })
    }

    /// Backup naming options from the `[backup]` section.
    pub fn backup_options(&self) -> BackupOptions {
        BackupOptions {
            ledger_key: self.backup.ledger_key.clone(),
            suffix: self.backup.suffix.clone(),
            timestamp_format: self.backup.timestamp_format.clone(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("SumatraSettings"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("SumatraSettings")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("sumatra-settings"))
    }
}

/// Where SumatraPDF keeps its settings when installed per user.
fn default_settings_folder() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %LOCALAPPDATA%\SumatraPDF
        std::env::var_os("LOCALAPPDATA").map(|p| PathBuf::from(p).join("SumatraPDF"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        // Wine prefixes and portable copies vary too much to guess; this is
        // only a starting point for paths.settings_folder.
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join(".local")
                .join("share")
                .join("SumatraPDF")
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_file_names() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.paths.settings_file, "SumatraPDF-settings.txt");
        assert_eq!(cfg.paths.ledger_file, "backup_db.json");
        assert_eq!(cfg.paths.theme_store_file, "backup_db.json");
        assert!(cfg.paths.settings_folder.is_none());
    }

    #[test]
    fn test_backup_config_defaults() {
        let cfg = BackupConfig::default();
        assert_eq!(cfg.ledger_key, "backup records");
        assert_eq!(cfg.suffix, "_backup");
        assert_eq!(cfg.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn test_logging_default_level_is_info() {
        assert_eq!(LoggingConfig::default().level, "info");
    }

    // ── TOML parsing ──────────────────────────────────────────────────────────

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_partial_backup_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[backup]
suffix = "_snap"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.backup.suffix, "_snap");
        // Unspecified fields keep their defaults
        assert_eq!(cfg.backup.ledger_key, "backup records");
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));
    }

    // ── load / save ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.paths.settings_folder = Some(PathBuf::from("/opt/sumatra"));
        cfg.logging.level = "debug".to_string();

        // Act
        save_config_to(&path, &cfg).unwrap();
        let loaded = load_config_from(&path).unwrap();

        // Assert
        assert_eq!(loaded, cfg);
    }

    // ── Path resolution ───────────────────────────────────────────────────────

    #[test]
    fn test_settings_paths_joins_folder_and_file_names() {
        let mut cfg = AppConfig::default();
        cfg.paths.settings_folder = Some(PathBuf::from("/data/sumatra"));
        cfg.paths.theme_store_file = "themes.json".to_string();

        let paths = cfg.settings_paths(None).unwrap();

        assert_eq!(
            paths.settings_file,
            PathBuf::from("/data/sumatra/SumatraPDF-settings.txt")
        );
        assert_eq!(paths.ledger_file, PathBuf::from("/data/sumatra/backup_db.json"));
        assert_eq!(paths.theme_store_file, PathBuf::from("/data/sumatra/themes.json"));
    }

    #[test]
    fn test_settings_paths_override_wins() {
        let mut cfg = AppConfig::default();
        cfg.paths.settings_folder = Some(PathBuf::from("/configured"));

        let paths = cfg.settings_paths(Some(Path::new("/override"))).unwrap();

        assert!(paths.settings_file.starts_with("/override"));
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
