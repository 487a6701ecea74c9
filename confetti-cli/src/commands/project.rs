//! Arguments shared by commands that talk to the authoring service.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use confetti_core::{AppConfig, ConfigError};
use confetti_sync::{SyncConfig, Synchronizer};

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root containing `app_config.json5`.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Authoring service host; overrides the environment's first host.
    #[arg(long, env = "CONFETTI_HOST")]
    pub host: Option<String>,

    /// Environment name from `app_config.json5`.
    #[arg(long = "env")]
    pub environment: Option<String>,

    /// Print every file that is fetched or saved.
    #[arg(long, short)]
    pub verbose: bool,
}

impl ProjectArgs {
    pub fn sync_config(&self) -> Result<SyncConfig> {
        resolve_sync_config(&self.root, self.host.as_deref(), self.environment.as_deref())
    }

    pub fn synchronizer(&self) -> Result<Synchronizer> {
        let config = self.sync_config()?;
        Synchronizer::with_http(&self.root, &config)
            .with_context(|| format!("failed to prepare sync for {}", self.root.display()))
    }
}

/// Host precedence: explicit `host`, then the selected environment in
/// `app_config.json5`, then the localhost default when the project has no
/// config file.
pub fn resolve_sync_config(
    root: &Path,
    host: Option<&str>,
    environment: Option<&str>,
) -> Result<SyncConfig> {
    if let Some(host) = host {
        return Ok(SyncConfig::new(host));
    }
    let config = match AppConfig::load(root) {
        Ok(config) => config,
        Err(ConfigError::NotAProject { .. }) => return Ok(SyncConfig::default()),
        Err(err) => return Err(err).context("failed to load app config"),
    };
    let environment = config.environment(environment)?;
    let host = environment
        .sync_host()
        .with_context(|| format!("environment '{}' has no usable host", environment.name))?;
    Ok(SyncConfig::new(host))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TWO_ENVS: &str = r#"{
        environments: [
            { name: "dev", containers: [{ hosts: ["office.localhost"] }] },
            { name: "prod", containers: [{ hosts: ["office.example.com"] }] },
        ],
    }"#;

    #[test]
    fn explicit_host_wins() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("app_config.json5"), TWO_ENVS).unwrap();
        let config = resolve_sync_config(root.path(), Some("cli.test"), Some("dev")).unwrap();
        assert_eq!(config.host, "cli.test");
    }

    #[test]
    fn environment_host_used_when_no_override() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("app_config.json5"), TWO_ENVS).unwrap();
        let config = resolve_sync_config(root.path(), None, Some("prod")).unwrap();
        assert_eq!(config.base_url(), "http://api.office.example.com");
    }

    #[test]
    fn missing_config_falls_back_to_default() {
        let root = TempDir::new().unwrap();
        let config = resolve_sync_config(root.path(), None, None).unwrap();
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn ambiguous_environment_is_an_error() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("app_config.json5"), TWO_ENVS).unwrap();
        let err = resolve_sync_config(root.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("dev, prod"), "{err}");
    }
}
