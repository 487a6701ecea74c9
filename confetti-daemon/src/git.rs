//! Git helpers used to decide whether a changed path should trigger a sync.

use std::path::Path;
use std::process::Command;

use crate::error::{io_err, DaemonError};

/// `owner/repo` from an origin URL.
///
/// Accepts `git@github.com:owner/repo.git` and
/// `https://github.com/owner/repo.git`.
pub fn repository_name_from_origin_url(url: &str) -> Result<String, DaemonError> {
    let parse_failed = || DaemonError::Git(format!("failed to parse repo name from url: '{url}'"));

    let without_ext = url.trim().strip_suffix(".git").ok_or_else(parse_failed)?;
    let (prefix, repo) = without_ext.rsplit_once('/').ok_or_else(parse_failed)?;
    let owner = prefix.rsplit(|c: char| c == '/' || c == ':').next().unwrap_or(prefix);
    if owner.is_empty() || repo.is_empty() {
        return Err(parse_failed());
    }
    Ok(format!("{owner}/{repo}"))
}

/// Repository name of the `origin` remote of the repo at `root`.
pub fn repository_name(root: &Path) -> Result<String, DaemonError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(["config", "--get", "remote.origin.url"])
        .output()
        .map_err(|e| io_err("git config", e))?;
    if !output.status.success() {
        return Err(DaemonError::Git(format!(
            "failed to get repository name (status {}): {}",
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    repository_name_from_origin_url(String::from_utf8_lossy(&output.stdout).trim())
}

/// `true` if git ignores `path` inside the repository at `root`.
///
/// The root itself is never ignored. If git is unavailable or `root` is not a
/// repository, nothing is treated as ignored.
pub fn is_ignored(root: &Path, path: &Path) -> bool {
    if path == root {
        return false;
    }
    let relative = path.strip_prefix(root).unwrap_or(path);
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .arg("check-ignore")
        .arg(relative)
        .output();
    match output {
        Ok(output) => !output.stdout.is_empty(),
        Err(err) => {
            tracing::debug!(error = %err, "git check-ignore unavailable");
            false
        }
    }
}
