//! Error types for confetti-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading or rendering the Map template.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (parse or render).
    #[error("template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Filesystem error while loading override templates.
    #[error("template io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}
