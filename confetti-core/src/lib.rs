//! Confetti core library: domain types, mirror layout, project configuration.
//!
//! - [`types`]: newtypes, artifacts and [`MirrorLayout`]
//! - [`config`]: `app_config.json5` environments
//! - [`error`]: [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ContainerConfig, Environment};
pub use error::ConfigError;
pub use types::{ComponentArtifact, ComponentName, MirrorLayout, StandardArtifact};
