//! Whole-file replacement via a temporary sibling and a rename.
//!
//! Every file this tool writes (the settings file, the ledger, the theme
//! store) is rewritten in full.  Writing straight into the destination with
//! truncate-then-write leaves a half-written file behind if the process dies
//! mid-write.  Instead the new content goes into a temporary file in the
//! *same directory*, which is then renamed over the destination.  A rename
//! within one file system is atomic: readers see either the old file or the
//! new one, never a mixture.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Replaces the content of `path` with `contents` atomically.
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Any I/O error from creating, writing, syncing or renaming the temporary
/// file.  On error the destination is left untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
