use std::path::{Path, PathBuf};
use std::time::Duration;

use confetti_core::types::HIDDEN_DIR;

/// Quiet period after the last event for a path before it is synced.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Top-level directories whose events never trigger a sync.
pub const SKIPPED_DIRS: &[&str] = &[HIDDEN_DIR, ".git"];

/// `path` relative to `root`, with `/` separators, if it lies inside `root`.
pub fn relative_trigger_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// `true` if `path` lies inside one of [`SKIPPED_DIRS`] under `root`.
pub fn is_skipped(root: &Path, path: &Path) -> bool {
    SKIPPED_DIRS
        .iter()
        .any(|dir| path.starts_with(root.join(dir)))
}

pub fn canonical_root(root: &Path) -> PathBuf {
    std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
}
