use std::path::PathBuf;

use thiserror::Error;

/// Error surface for the watcher runtime and git helpers.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),

    #[error("sync error: {0}")]
    Sync(#[from] confetti_sync::SyncError),

    #[error("channel closed: {0}")]
    ChannelClosed(&'static str),

    #[error("task failed: {0}")]
    Task(String),

    #[error("git error: {0}")]
    Git(String),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
