//! Mirror writer: create-or-replace a file under the hidden directory.
//!
//! ## `write_file` protocol
//!
//! 1. Create missing parent directories.
//! 2. Write the full content to `<path>.confetti.tmp` (handle closed on return).
//! 3. Rename over the final path (atomic on POSIX).
//! 4. On rename failure, remove the `.tmp` and leave the original untouched.
//!
//! There is no skip-if-unchanged gate: the target is always fully replaced,
//! and writing identical bytes twice yields an identical file.

use std::path::{Path, PathBuf};

use crate::error::{io_err, SyncError};

/// Suffix of the sibling temp file used during a write.
pub const TMP_SUFFIX: &str = ".confetti.tmp";

/// A file that was created or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteResult {
    pub path: PathBuf,
    pub bytes: usize,
}

/// Create or fully overwrite `path` with `content`.
pub fn write_file(path: &Path, content: &[u8]) -> Result<WriteResult, SyncError> {
    let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()));
    write_file_with_tmp(path, content, &tmp)
}

fn write_file_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<WriteResult, SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    if let Some(tmp_parent) = tmp.parent() {
        std::fs::create_dir_all(tmp_parent).map_err(|e| io_err(tmp_parent, e))?;
    }

    if let Err(e) = std::fs::write(tmp, content) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(tmp, e));
    }

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult {
        path: path.to_path_buf(),
        bytes: content.len(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
