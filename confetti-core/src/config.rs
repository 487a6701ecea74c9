//! Project configuration: `app_config.json5` at the project root.
//!
//! ```json5
//! {
//!   environments: [
//!     {
//!       name: "dev",
//!       run_on_localhost: true,
//!       containers: [
//!         { hosts: ["office.localhost"] },
//!         { name: "image", hosts: ["img.localhost"], paths: ["/__SERVICE__"] },
//!       ],
//!     },
//!   ],
//! }
//! ```
//!
//! A container supports at most one path; any further entries in `paths` are
//! ignored.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the project configuration, relative to the project root.
pub const CONFIG_FILE: &str = "app_config.json5";

pub const ORCHESTRATOR_API_DEFAULT: &str = "http://api.confetti-cms.com/orchestrator";
pub const ORCHESTRATOR_API_LOCALHOST: &str = "http://api.confetti-cms.localhost/orchestrator";

const SERVICE_PLACEHOLDER: &str = "__SERVICE__";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

impl ContainerConfig {
    /// Every `<host>/<uri>` this container answers on, trailing `/` trimmed.
    ///
    /// The first configured path replaces `default_uri` when present.
    pub fn url_combinations(&self, default_uri: &str) -> Vec<String> {
        let uri = match self.paths.first() {
            Some(path) => path.trim_start_matches('/'),
            None => default_uri,
        };
        self.hosts
            .iter()
            .map(|host| format!("{host}/{uri}").trim_end_matches('/').to_string())
            .collect()
    }

    fn uri_for_service(&self, service: &str) -> String {
        let uri = match self.paths.first() {
            Some(path) => format!("/{}", path.trim_start_matches('/')),
            None => String::new(),
        };
        uri.replace(SERVICE_PLACEHOLDER, service)
            .trim_end_matches('/')
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    #[serde(default)]
    pub run_on_localhost: bool,
    #[serde(default)]
    pub containers: Vec<ContainerConfig>,
}

impl Environment {
    pub fn orchestrator_api(&self) -> &'static str {
        if self.run_on_localhost {
            ORCHESTRATOR_API_LOCALHOST
        } else {
            ORCHESTRATOR_API_DEFAULT
        }
    }

    /// All hosts across containers, de-duplicated in first-seen order.
    pub fn all_hosts(&self) -> Vec<String> {
        collect_unique_hosts(self.containers.iter())
    }

    /// Hosts of named containers only, de-duplicated in first-seen order.
    pub fn explicit_hosts(&self) -> Vec<String> {
        collect_unique_hosts(self.containers.iter().filter(|c| !c.name.is_empty()))
    }

    /// `http://<host><path>` for `service`.
    ///
    /// The unnamed container is the default; a container named after the
    /// service wins over it. `__SERVICE__` in the path is replaced by the
    /// service name.
    pub fn service_url(&self, service: &str) -> Result<String, ConfigError> {
        let matched = self
            .containers
            .iter()
            .rev()
            .find(|c| c.name == service)
            .or_else(|| self.containers.iter().rev().find(|c| c.name.is_empty()));
        let Some(container) = matched else {
            return Err(self.no_hosts());
        };
        let Some(host) = container.hosts.first() else {
            return Err(self.no_hosts());
        };
        Ok(format!("http://{host}{}", container.uri_for_service(service)))
    }

    /// Host used to reach the authoring service for this environment.
    pub fn sync_host(&self) -> Result<String, ConfigError> {
        self.all_hosts()
            .into_iter()
            .next()
            .ok_or_else(|| self.no_hosts())
    }

    fn no_hosts(&self) -> ConfigError {
        ConfigError::NoHosts {
            environment: self.name.clone(),
        }
    }
}

fn collect_unique_hosts<'a>(containers: impl Iterator<Item = &'a ContainerConfig>) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for host in containers.flat_map(|c| c.hosts.iter()) {
        if !hosts.contains(host) {
            hosts.push(host.clone());
        }
    }
    hosts
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl AppConfig {
    /// `<root>/app_config.json5`: pure, no I/O.
    pub fn path_at(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Load and parse `<root>/app_config.json5`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_at(root);
        let contents = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::NotAProject { path: path.clone(), source })?;
        Self::parse(&path, &contents)
    }

    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        json5::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Select an environment.
    ///
    /// A project with exactly one environment always resolves to it, whatever
    /// name was asked for.
    pub fn environment(&self, name: Option<&str>) -> Result<&Environment, ConfigError> {
        if let [only] = self.environments.as_slice() {
            return Ok(only);
        }
        let available = self
            .environments
            .iter()
            .map(|e| e.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let Some(name) = name else {
            return Err(ConfigError::NoEnvironmentSelected { available });
        };
        self.environments
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| ConfigError::UnknownEnvironment {
                name: name.to_string(),
                available,
            })
    }
}
