//! Error types for confetti-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from loading the project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `app_config.json5` could not be read; the directory is most likely not
    /// a Confetti project.
    #[error("probably, you are not running this command in a Confetti project ({path}): {source}")]
    NotAProject {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON5 parse error on load.
    #[error("failed to parse app config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },

    /// Several environments exist and none was named.
    #[error("choose an environment; available names are {available}")]
    NoEnvironmentSelected { available: String },

    /// The requested environment is not declared.
    #[error("the name {name} does not match any environment. Available names are {available}")]
    UnknownEnvironment { name: String, available: String },

    /// The environment declares no containers or hosts at all.
    #[error("environment {environment} has no hosts configured")]
    NoHosts { environment: String },
}
