//! Connection settings for the authoring service.

/// Host used when neither the CLI nor `app_config.json5` names one.
pub const DEFAULT_HOST: &str = "confetti-cms.localhost";

pub const DEFAULT_SCHEME: &str = "http";

/// Where the authoring service lives. Passed into [`crate::Synchronizer`]
/// at construction; there is no process-wide host setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub scheme: String,
    pub host: String,
}

impl SyncConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: host.into(),
        }
    }

    /// `<scheme>://api.<host>`
    pub fn base_url(&self) -> String {
        format!("{}://api.{}", self.scheme, self.host)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}
