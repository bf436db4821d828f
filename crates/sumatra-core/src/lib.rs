//! # sumatra-core
//!
//! Shared library for the SumatraPDF settings manager containing the colour
//! setting model, the built-in theme catalog, backup records, and the
//! settings-text extractor and rewriter.
//!
//! This crate has no file-system access.  Everything here works on strings
//! and plain values; reading and writing files is the job of the
//! `sumatra-settings` application crate.
//!
//! # Architecture overview (for beginners)
//!
//! SumatraPDF keeps its preferences in a plain-text file of `Key = value`
//! lines.  The tool built on this crate does two things with that file:
//!
//! - **Backups** – copies the file to a sibling snapshot and keeps a ledger
//!   of snapshots so they can later be restored or deleted.  This crate only
//!   defines the ledger entry ([`BackupRecord`]) and the snapshot naming rule.
//!
//! - **Themes** – reads five colour settings out of the file and substitutes
//!   new values in place, leaving every other byte alone.
//!
//! The crate is organised in two modules:
//!
//! - **`domain`** – value types: [`ColorSetting`], [`ThemeColors`],
//!   [`BuiltinTheme`], [`BackupRecord`].
//! - **`settings`** – text processing: [`extract_current`] and
//!   [`rewrite_theme`].

pub mod domain;
pub mod settings;

// Re-export the most-used types at the crate root so callers can write
// `sumatra_core::ThemeColors` instead of `sumatra_core::domain::color::ThemeColors`.
pub use domain::backup::{backup_file_name, BackupRecord, DEFAULT_BACKUP_SUFFIX};
pub use domain::catalog::BuiltinTheme;
pub use domain::color::{is_color_token, ColorSetting, ThemeColors, ThemeError};
pub use settings::extract::extract_current;
pub use settings::rewrite::rewrite_theme;
