//! Backup records and backup file naming.
//!
//! A [`BackupRecord`] pairs the file name of a settings snapshot with the
//! moment it was taken.  On disk each record is a single-key JSON object:
//!
//! ```json
//! { "SumatraPDF-settings_backup.txt": "2024-03-01 21:14:05" }
//! ```
//!
//! The custom `Serialize`/`Deserialize` impls below produce and accept exactly
//! that shape, so existing ledgers written by earlier versions of the tool
//! keep loading.

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker inserted before the extension of a snapshot's file name.
pub const DEFAULT_BACKUP_SUFFIX: &str = "_backup";

/// One snapshot of the settings file.
///
/// Identity is the file name; records are never edited, only created and
/// removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupRecord {
    /// File name only (no directory), relative to the settings folder.
    pub file_name: String,
    /// Creation time, already formatted for display.
    pub created_at: String,
}

impl BackupRecord {
    pub fn new(file_name: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            created_at: created_at.into(),
        }
    }
}

impl fmt::Display for BackupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.file_name, self.created_at)
    }
}

impl Serialize for BackupRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.file_name, &self.created_at)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for BackupRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = BackupRecord;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a single-entry map of backup file name to timestamp")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let (file_name, created_at) = access
                    .next_entry::<String, String>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                if access.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::custom(
                        "backup record must contain exactly one entry",
                    ));
                }
                Ok(BackupRecord {
                    file_name,
                    created_at,
                })
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Builds the snapshot file name for `file_name` using `suffix`.
///
/// `attempt == 0` gives the plain form (`settings_backup.txt`); later attempts
/// append a counter (`settings_backup_1.txt`, `settings_backup_2.txt`, ...) so
/// callers can walk forward until they find a name that is not yet taken.
/// Files without an extension get the suffix at the end.
pub fn backup_file_name(file_name: &str, suffix: &str, attempt: usize) -> String {
    let (stem, ext) = match file_name.rfind('.') {
        // A leading dot marks a hidden file, not an extension.
        Some(idx) if idx > 0 => (&file_name[..idx], &file_name[idx..]),
        _ => (file_name, ""),
    };
    if attempt == 0 {
        format!("{stem}{suffix}{ext}")
    } else {
        format!("{stem}{suffix}_{attempt}{ext}")
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
