//! JSON-backed backup ledger.
//!
//! The ledger maps a logical key to the ordered list of backups taken so far:
//!
//! ```json
//! {
//!     "backup records": [
//!         { "SumatraPDF-settings_backup.txt": "2024-03-01 21:14:05" },
//!         { "SumatraPDF-settings_backup_1.txt": "2024-03-02 08:00:41" }
//!     ]
//! }
//! ```
//!
//! The list is in insertion order, oldest first.  Every mutation rewrites the
//! whole document; other top-level keys are carried over untouched.
//!
//! # "No file" versus "no backups"
//!
//! Callers often need to tell apart a ledger that was never written from one
//! that exists but holds nothing.  [`LedgerStore::lookup`] returns that as a
//! plain value ([`LedgerLookup`]) so the common "nothing yet" case is not an
//! error at all; [`LedgerStore::load`] maps the same states onto
//! [`LedgerError::NotFound`] and [`LedgerError::EmptyLedger`] for callers that
//! only want records.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sumatra_core::BackupRecord;
use thiserror::Error;
use tracing::debug;

use super::document::{read_document, write_document, Document, DocumentError};

/// Key the backup list is stored under.
pub const DEFAULT_LEDGER_KEY: &str = "backup records";

/// Error type for ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger document does not exist.
    #[error("backup ledger not found at {0}")]
    NotFound(PathBuf),

    /// The document exists but holds no records under the key.
    #[error("No backups created yet!")]
    EmptyLedger { key: String },

    /// The value under the key is not a list of records.
    #[error("ledger entry {key:?} in {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Outcome of reading the records for a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerLookup {
    /// The ledger document does not exist.
    Missing,
    /// The document exists but the key is absent or its list is empty.
    Empty,
    /// At least one record, oldest first.
    Records(Vec<BackupRecord>),
}

impl LedgerLookup {
    /// The records, or an empty list for `Missing` / `Empty`.
    pub fn into_records(self) -> Vec<BackupRecord> {
        match self {
            LedgerLookup::Records(records) => records,
            LedgerLookup::Missing | LedgerLookup::Empty => Vec::new(),
        }
    }
}

/// Ledger persisted as a single JSON document.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the records stored under `key`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Document`] when the file cannot be read or parsed,
    /// [`LedgerError::Malformed`] when the key does not hold a record list.
    pub fn lookup(&self, key: &str) -> Result<LedgerLookup, LedgerError> {
        let Some(document) = read_document(&self.path)? else {
            return Ok(LedgerLookup::Missing);
        };
        let records = self.records_in(&document, key)?;
        if records.is_empty() {
            Ok(LedgerLookup::Empty)
        } else {
            Ok(LedgerLookup::Records(records))
        }
    }

    /// Reads the records stored under `key`, treating "nothing" as an error.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] when the document does not exist.
    /// - [`LedgerError::EmptyLedger`] when the key is absent or empty.
    /// - Any error from [`LedgerStore::lookup`].
    pub fn load(&self, key: &str) -> Result<Vec<BackupRecord>, LedgerError> {
        match self.lookup(key)? {
            LedgerLookup::Missing => Err(LedgerError::NotFound(self.path.clone())),
            LedgerLookup::Empty => Err(LedgerError::EmptyLedger {
                key: key.to_string(),
            }),
            LedgerLookup::Records(records) => Ok(records),
        }
    }

    /// Appends `record` to the list under `key`, creating the document if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Read, parse or write failures.
    pub fn append(&self, key: &str, record: BackupRecord) -> Result<(), LedgerError> {
        let mut document = read_document(&self.path)?.unwrap_or_default();
        let mut records = self.records_in(&document, key)?;
        debug!(file = %record.file_name, "appending ledger record");
        records.push(record);
        self.store(&mut document, key, &records)
    }

    /// Removes the record equal to `record` (both fields) from the list under
    /// `key`.  Returns `false` if no such record was present, in which case
    /// nothing is written.
    ///
    /// # Errors
    ///
    /// Read, parse or write failures.
    pub fn remove(&self, key: &str, record: &BackupRecord) -> Result<bool, LedgerError> {
        let mut document = read_document(&self.path)?.unwrap_or_default();
        let mut records = self.records_in(&document, key)?;
        let Some(pos) = records.iter().position(|r| r == record) else {
            return Ok(false);
        };
        records.remove(pos);
        debug!(file = %record.file_name, remaining = records.len(), "removed ledger record");
        self.store(&mut document, key, &records)?;
        Ok(true)
    }

    fn records_in(&self, document: &Document, key: &str) -> Result<Vec<BackupRecord>, LedgerError> {
        match document.get(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|source| {
                LedgerError::Malformed {
                    path: self.path.clone(),
                    key: key.to_string(),
                    source,
                }
            }),
        }
    }

    fn store(
        &self,
        document: &mut Document,
        key: &str,
        records: &[BackupRecord],
    ) -> Result<(), LedgerError> {
        let value = serde_json::to_value(records).map_err(|source| LedgerError::Malformed {
            path: self.path.clone(),
            key: key.to_string(),
            source,
        })?;
        document.insert(key.to_string(), value);
        write_document(&self.path, document)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> LedgerStore {
        LedgerStore::new(dir.path().join("backup_db.json"))
    }

    fn record(name: &str) -> BackupRecord {
        BackupRecord::new(name, "2024-03-01 21:14:05")
    }

    #[test]
    fn test_lookup_missing_document() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            store_in(&dir).lookup(DEFAULT_LEDGER_KEY).unwrap(),
            LedgerLookup::Missing
        );
    }

    #[test]
    fn test_load_missing_document_is_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            store_in(&dir).load(DEFAULT_LEDGER_KEY),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_empty_list_is_empty_ledger() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"backup records": []}"#).unwrap();

        // Act / Assert
        assert_eq!(store.lookup(DEFAULT_LEDGER_KEY).unwrap(), LedgerLookup::Empty);
        assert!(matches!(
            store.load(DEFAULT_LEDGER_KEY),
            Err(LedgerError::EmptyLedger { .. })
        ));
    }

    #[test]
    fn test_load_absent_key_is_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"themes": {}}"#).unwrap();

        assert_eq!(store.lookup(DEFAULT_LEDGER_KEY).unwrap(), LedgerLookup::Empty);
    }

    #[test]
    fn test_append_creates_document_on_first_use() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        // Act
        store.append(DEFAULT_LEDGER_KEY, record("a_backup.txt")).unwrap();

        // Assert
        assert!(store.path().exists());
        assert_eq!(
            store.load(DEFAULT_LEDGER_KEY).unwrap(),
            vec![record("a_backup.txt")]
        );
    }

    #[test]
    fn test_append_keeps_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for name in ["one.txt", "two.txt", "three.txt"] {
            store.append(DEFAULT_LEDGER_KEY, record(name)).unwrap();
        }

        let names: Vec<String> = store
            .load(DEFAULT_LEDGER_KEY)
            .unwrap()
            .into_iter()
            .map(|r| r.file_name)
            .collect();
        assert_eq!(names, ["one.txt", "two.txt", "three.txt"]);
    }

    #[test]
    fn test_written_document_has_single_entry_records() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(DEFAULT_LEDGER_KEY, record("a_backup.txt")).unwrap();

        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "backup records": [ { "a_backup.txt": "2024-03-01 21:14:05" } ] })
        );
    }

    #[test]
    fn test_remove_matches_both_fields() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(DEFAULT_LEDGER_KEY, record("a.txt")).unwrap();
        let other_time = BackupRecord::new("a.txt", "another time");

        // Act
        let removed = store.remove(DEFAULT_LEDGER_KEY, &other_time).unwrap();

        // Assert
        assert!(!removed);
        assert_eq!(store.load(DEFAULT_LEDGER_KEY).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_last_record_leaves_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(DEFAULT_LEDGER_KEY, record("a.txt")).unwrap();

        assert!(store.remove(DEFAULT_LEDGER_KEY, &record("a.txt")).unwrap());

        assert_eq!(store.lookup(DEFAULT_LEDGER_KEY).unwrap(), LedgerLookup::Empty);
    }

    #[test]
    fn test_foreign_keys_survive_rewrite() {
        // Arrange: ledger shares its file with the custom theme store
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"themes": {"Custom": {}}}"#).unwrap();

        // Act
        store.append(DEFAULT_LEDGER_KEY, record("a.txt")).unwrap();

        // Assert
        let json: Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert!(json["themes"]["Custom"].is_object());
        assert_eq!(json["backup records"][0]["a.txt"], "2024-03-01 21:14:05");
    }

    #[test]
    fn test_non_list_value_is_malformed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), r#"{"backup records": "oops"}"#).unwrap();

        assert!(matches!(
            store.lookup(DEFAULT_LEDGER_KEY),
            Err(LedgerError::Malformed { .. })
        ));
    }
}
