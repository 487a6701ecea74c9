//! Error types for confetti-sync.

use std::path::PathBuf;

use thiserror::Error;

use confetti_renderer::RenderError;

/// Failure of the HTTP transport underneath the fetcher.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The service answered with a non-2xx status.
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16, body: String },

    /// Connection, DNS, timeout or body-read failure.
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },
}

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The authoring service has no component for the requested file.
    #[error("can not upsert hidden component: file not found: {file}")]
    NotFound { file: String },

    /// A `content` field was not valid base64.
    #[error("invalid base64 content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// A response record lacked a required field.
    #[error("response record is missing field '{field}'")]
    MissingField { field: &'static str },

    /// Network failure or non-2xx response.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The response body was not the expected JSON array.
    #[error("response JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The Map template could not be loaded or rendered.
    #[error("template error: {0}")]
    Template(#[from] RenderError),

    /// A `name_class` that is not a single plain file name.
    #[error("refusing component name that is not a plain file name: {name:?}")]
    InvalidName { name: String },

    /// A standard-set path would escape the hidden directory.
    #[error("refusing to write outside the hidden directory: {path}")]
    UnsafePath { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
