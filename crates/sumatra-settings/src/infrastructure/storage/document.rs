//! Reading and writing top-level JSON object documents.
//!
//! Both the backup ledger and the custom theme store are JSON objects whose
//! top-level keys are owned by different parts of the tool.  They may even
//! live in the same file (`backup_db.json`), so every writer reads the whole
//! object, changes only its own key, and writes the whole object back.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use thiserror::Error;

use super::atomic::write_atomic;

/// A parsed top-level JSON object.
pub type Document = Map<String, Value>;

/// Error type for JSON document access.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file content is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file is valid JSON but not an object at the top level.
    #[error("{path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },

    /// The document could not be serialized.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the document at `path`.
///
/// Returns `Ok(None)` when the file does not exist.  A file containing only
/// whitespace is read as an empty object.
///
/// # Errors
///
/// [`DocumentError::Io`] for file-system errors other than "not found",
/// [`DocumentError::Parse`] / [`DocumentError::NotAnObject`] for bad content.
pub fn read_document(path: &Path) -> Result<Option<Document>, DocumentError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(DocumentError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(Some(Document::new()));
    }

    let value: Value = serde_json::from_str(&content).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(DocumentError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// Writes `document` to `path` as pretty JSON with four-space indentation.
///
/// # Errors
///
/// [`DocumentError::Serialize`] or [`DocumentError::Io`].
pub fn write_document(path: &Path, document: &Document) -> Result<(), DocumentError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut ser)
        .map_err(|source| DocumentError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;

    write_atomic(path, &buf).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_missing_document_returns_none() {
        let dir = TempDir::new().unwrap();
        assert!(read_document(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_read_blank_document_returns_empty_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "  \n").unwrap();

        let doc = read_document(&path).unwrap().expect("present");

        assert!(doc.is_empty());
    }

    #[test]
    fn test_read_array_document_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(
            read_document(&path),
            Err(DocumentError::NotAnObject { .. })
        ));
    }

    #[test]
    fn test_read_garbage_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(read_document(&path), Err(DocumentError::Parse { .. })));
    }

    #[test]
    fn test_write_uses_four_space_indent() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        let doc = json!({ "k": [1] }).as_object().cloned().unwrap();

        // Act
        write_document(&path, &doc).unwrap();

        // Assert
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n    \"k\": [\n        1\n    ]\n}");
    }
}
