//! Artifact fetcher: reads authoritative component content from the
//! authoring service and decodes it.
//!
//! Endpoints, relative to [`SyncConfig::base_url`]:
//!
//! | Call                  | Path                                            |
//! |-----------------------|-------------------------------------------------|
//! | single component      | `/parser/source/components?file=/<file>`        |
//! | standard set          | `/parser/source/components/standard`            |
//!
//! Both answer with a JSON array of records carrying base64 `content`.
//! Nothing here touches the filesystem, and nothing is retried.

use std::path::{Component, Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;

use confetti_core::types::{ComponentArtifact, ComponentName, StandardArtifact};

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::transport::Transport;

const COMPONENTS_PATH: &str = "/parser/source/components";
const STANDARD_PATH: &str = "/parser/source/components/standard";

/// Wire record. Fields are optional so that a missing one is reported by
/// name instead of as a generic JSON error.
#[derive(Debug, Deserialize)]
struct ContentRecord {
    content: Option<String>,
    name_class: Option<String>,
    file: Option<String>,
}

pub struct ArtifactFetcher {
    base_url: String,
    transport: Box<dyn Transport>,
}

impl ArtifactFetcher {
    pub fn new(config: &SyncConfig, transport: Box<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url(),
            transport,
        }
    }

    /// Fetch the rendered class for the component defined at `file`.
    ///
    /// `file` is relative to the project root, without a leading `/`.
    pub fn fetch_component(&self, file: &str) -> Result<ComponentArtifact, SyncError> {
        let url = format!("{}{COMPONENTS_PATH}", self.base_url);
        let query_file = format!("/{}", file.trim_start_matches('/'));
        tracing::debug!("fetching component {query_file} from {url}");
        let body = self.transport.get(&url, &[("file", &query_file)])?;
        decode_component_response(&body, file)
    }

    /// Fetch every file of the standard set.
    pub fn fetch_standard_set(&self) -> Result<Vec<StandardArtifact>, SyncError> {
        let url = format!("{}{STANDARD_PATH}", self.base_url);
        tracing::debug!("fetching standard set from {url}");
        let body = self.transport.get(&url, &[])?;
        decode_standard_response(&body)
    }
}

/// Decode a single-component response. Only the first record is used.
pub fn decode_component_response(body: &str, file: &str) -> Result<ComponentArtifact, SyncError> {
    let records: Vec<ContentRecord> = serde_json::from_str(body)?;
    let Some(record) = records.into_iter().next() else {
        return Err(SyncError::NotFound {
            file: file.to_string(),
        });
    };
    let name = record
        .name_class
        .filter(|n| !n.is_empty())
        .ok_or(SyncError::MissingField { field: "name_class" })?;
    ensure_plain_name(&name)?;
    Ok(ComponentArtifact {
        name: ComponentName::from(name),
        content: decode_content(record.content)?,
    })
}

/// Decode a standard-set response. An empty array is a valid, empty set.
pub fn decode_standard_response(body: &str) -> Result<Vec<StandardArtifact>, SyncError> {
    let records: Vec<ContentRecord> = serde_json::from_str(body)?;
    records
        .into_iter()
        .map(|record| {
            let file = record.file.ok_or(SyncError::MissingField { field: "file" })?;
            Ok(StandardArtifact {
                relative_path: PathBuf::from(file),
                content: decode_content(record.content)?,
            })
        })
        .collect()
}

/// A component name becomes `Components/<name>.php`, so it must be exactly
/// one normal path segment.
fn ensure_plain_name(name: &str) -> Result<(), SyncError> {
    let mut components = Path::new(name).components();
    let single_segment = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_segment || name.contains(['/', '\\']) {
        return Err(SyncError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn decode_content(content: Option<String>) -> Result<Vec<u8>, SyncError> {
    let content = content.ok_or(SyncError::MissingField { field: "content" })?;
    Ok(STANDARD.decode(content.as_bytes())?)
}
