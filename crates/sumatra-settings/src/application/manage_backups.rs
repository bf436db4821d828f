//! Backup snapshot, revert and delete.
//!
//! Every operation here touches two resources: a snapshot file next to the
//! settings file, and the ledger entry describing it.  They are kept in step
//! so that the set of snapshot files on disk always equals the set of file
//! names in the ledger:
//!
//! | Operation | File step                        | Ledger step | Ordering |
//! |-----------|----------------------------------|-------------|----------|
//! | create    | copy settings → snapshot         | append      | copy first; copy removed again if the append fails |
//! | revert    | rename snapshot → settings file  | remove      | rename first; ledger untouched if it fails |
//! | delete    | unlink snapshot                  | remove      | unlink first; an already-missing file still gets its record removed |

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use sumatra_core::{backup_file_name, BackupRecord};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::infrastructure::storage::ledger::{LedgerError, LedgerLookup, LedgerStore};

/// Upper bound on `_backup_N` candidates tried before giving up.
const MAX_NAME_ATTEMPTS: usize = 10_000;

/// `chrono` format used for `created_at` unless configured otherwise.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Error type for backup operations.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The settings file to snapshot does not exist.
    #[error("Sumatra settings file not found at {0}")]
    SettingsFileMissing(PathBuf),

    /// A ledger record points at a snapshot that is gone.
    #[error("backup file {0} not found")]
    SnapshotMissing(PathBuf),

    /// Every candidate snapshot name is already taken.
    #[error("no free backup file name next to {0}")]
    NoFreeName(PathBuf),

    /// A ledger record names something other than a plain file in the
    /// settings folder (an absolute path, `..`, or a nested path).
    #[error("backup record {0:?} is not a plain file name")]
    InvalidRecordName(String),

    /// The 1-based selection does not address a listed record.
    #[error("selection {index} is out of range (1..={len})")]
    SelectionOutOfRange { index: usize, len: usize },

    /// A file system I/O error occurred.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// How snapshots are named and recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOptions {
    /// Key the record list lives under in the ledger document.
    pub ledger_key: String,
    /// Marker inserted before the settings file's extension.
    pub suffix: String,
    /// `chrono` format string for `created_at`.
    pub timestamp_format: String,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            ledger_key: crate::infrastructure::storage::ledger::DEFAULT_LEDGER_KEY.to_string(),
            suffix: sumatra_core::DEFAULT_BACKUP_SUFFIX.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Result of a revert request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertOutcome {
    /// The ledger holds nothing to revert to.
    NoBackups,
    /// The settings file now holds the snapshot's content.
    Reverted(BackupRecord),
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The ledger holds nothing to delete.
    NoBackups,
    /// Snapshot file unlinked and record removed.
    Deleted(BackupRecord),
    /// The snapshot file was already gone; the record was removed anyway.
    FileAlreadyMissing(BackupRecord),
}

/// Picks the record at 1-based `index`.
///
/// # Errors
///
/// [`BackupError::SelectionOutOfRange`] for `0` or an index past the end.
pub fn select_record(records: &[BackupRecord], index: usize) -> Result<&BackupRecord, BackupError> {
    index
        .checked_sub(1)
        .and_then(|i| records.get(i))
        .ok_or(BackupError::SelectionOutOfRange {
            index,
            len: records.len(),
        })
}

/// Snapshot ledger for one settings file.
#[derive(Debug, Clone)]
pub struct BackupManager {
    settings_file: PathBuf,
    ledger: LedgerStore,
    options: BackupOptions,
}

impl BackupManager {
    pub fn new(settings_file: impl Into<PathBuf>, ledger: LedgerStore, options: BackupOptions) -> Self {
        Self {
            settings_file: settings_file.into(),
            ledger,
            options,
        }
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    /// Folder holding the settings file and its snapshots.
    pub fn settings_folder(&self) -> &Path {
        self.settings_file.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Absolute path of the snapshot described by `record`.
    ///
    /// # Errors
    ///
    /// [`BackupError::InvalidRecordName`] unless the record names a single
    /// plain file, so a hand-edited ledger cannot reach outside the folder.
    pub fn snapshot_path(&self, record: &BackupRecord) -> Result<PathBuf, BackupError> {
        let mut components = Path::new(&record.file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.settings_folder().join(&record.file_name)),
            _ => Err(BackupError::InvalidRecordName(record.file_name.clone())),
        }
    }

    /// Current ledger state, oldest record first.
    pub fn list(&self) -> Result<LedgerLookup, BackupError> {
        Ok(self.ledger.lookup(&self.options.ledger_key)?)
    }

    /// Copies the settings file to a fresh snapshot and records it.
    ///
    /// # Errors
    ///
    /// - [`BackupError::SettingsFileMissing`] if there is nothing to copy.
    /// - [`BackupError::Io`] if the copy fails (no record is written).
    /// - [`BackupError::Ledger`] if the ledger cannot be read (nothing is
    ///   copied) or recording fails (the copy is removed).
    pub fn create(&self) -> Result<BackupRecord, BackupError> {
        let mut input = match fs::File::open(&self.settings_file) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(BackupError::SettingsFileMissing(self.settings_file.clone()))
            }
            Err(source) => {
                return Err(BackupError::Io {
                    path: self.settings_file.clone(),
                    source,
                })
            }
        };

        let taken: HashSet<String> = self
            .list()?
            .into_records()
            .into_iter()
            .map(|r| r.file_name)
            .collect();
        let (path, mut dest) = self.open_free_snapshot(&taken)?;
        if let Err(source) = io::copy(&mut input, &mut dest).and_then(|_| dest.sync_all()) {
            drop(dest);
            self.discard(&path);
            return Err(BackupError::Io { path, source });
        }
        drop(dest);

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let record = BackupRecord::new(file_name, self.timestamp());

        if let Err(e) = self.ledger.append(&self.options.ledger_key, record.clone()) {
            self.discard(&path);
            return Err(e.into());
        }

        info!(file = %record.file_name, "settings backup created");
        Ok(record)
    }

    /// Replaces the settings file with the snapshot at 1-based `index` and
    /// forgets the snapshot.
    ///
    /// # Errors
    ///
    /// - [`BackupError::SelectionOutOfRange`] for a bad index.
    /// - [`BackupError::SnapshotMissing`] / [`BackupError::Io`] when the
    ///   rename fails; the ledger is left as it was.
    /// - [`BackupError::Ledger`] if the record cannot be removed afterwards.
    pub fn revert(&self, index: usize) -> Result<RevertOutcome, BackupError> {
        let LedgerLookup::Records(records) = self.list()? else {
            return Ok(RevertOutcome::NoBackups);
        };
        let record = select_record(&records, index)?.clone();
        let snapshot = self.snapshot_path(&record)?;

        fs::rename(&snapshot, &self.settings_file).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                BackupError::SnapshotMissing(snapshot.clone())
            } else {
                BackupError::Io {
                    path: snapshot.clone(),
                    source,
                }
            }
        })?;

        self.ledger.remove(&self.options.ledger_key, &record)?;
        info!(file = %record.file_name, "settings reverted to backup");
        Ok(RevertOutcome::Reverted(record))
    }

    /// Deletes the snapshot at 1-based `index` and forgets it.
    ///
    /// # Errors
    ///
    /// - [`BackupError::SelectionOutOfRange`] for a bad index.
    /// - [`BackupError::Io`] when unlinking fails for a reason other than
    ///   the file already being gone; the ledger is left as it was.
    /// - [`BackupError::Ledger`] if the record cannot be removed.
    pub fn delete(&self, index: usize) -> Result<DeleteOutcome, BackupError> {
        let LedgerLookup::Records(records) = self.list()? else {
            return Ok(DeleteOutcome::NoBackups);
        };
        let record = select_record(&records, index)?.clone();
        let snapshot = self.snapshot_path(&record)?;

        let file_was_present = match fs::remove_file(&snapshot) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file = %record.file_name, "backup file not found; removing dangling record");
                false
            }
            Err(source) => {
                return Err(BackupError::Io {
                    path: snapshot,
                    source,
                })
            }
        };

        self.ledger.remove(&self.options.ledger_key, &record)?;
        if file_was_present {
            info!(file = %record.file_name, "settings backup deleted");
            Ok(DeleteOutcome::Deleted(record))
        } else {
            Ok(DeleteOutcome::FileAlreadyMissing(record))
        }
    }

    /// Creates the first `<stem><suffix>[_N]<ext>` file next to the settings
    /// file that neither exists on disk nor appears in `taken` (the names
    /// already recorded in the ledger, including dangling ones).
    fn open_free_snapshot(&self, taken: &HashSet<String>) -> Result<(PathBuf, fs::File), BackupError> {
        let base = self
            .settings_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = backup_file_name(&base, &self.options.suffix, attempt);
            if taken.contains(&name) {
                continue;
            }
            let path = self.settings_folder().join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(source) => return Err(BackupError::Io { path, source }),
            }
        }
        Err(BackupError::NoFreeName(self.settings_file.clone()))
    }

    /// Current local time in the configured format.
    fn timestamp(&self) -> String {
        let now = chrono::Local::now();
        let mut out = String::new();
        if write!(out, "{}", now.format(&self.options.timestamp_format)).is_err() {
            warn!(format = %self.options.timestamp_format, "invalid timestamp format, using default");
            out = now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
        }
        out
    }

    /// Best-effort removal of a snapshot that must not outlive a failed create.
    fn discard(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            error!(path = %path.display(), "failed to remove unrecorded backup: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
