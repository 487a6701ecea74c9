//! Synchronization orchestrator: the entry points shared by the CLI and the
//! watcher.
//!
//! Per changed file:
//!
//! ```text
//! Classifying ──not relevant──▶ done (no writes, no error)
//!      │
//!   Fetching ──error──▶ failed (mirror untouched)
//!      │
//!   Writing ──error──▶ failed
//!      │
//! RebuildingMap ──error──▶ failed (component written, Map stale until the next rebuild)
//!      │
//!    done
//! ```
//!
//! The standard-set resync fetches and writes each item, without a Map
//! rebuild.
//!
//! Calls are blocking and not coordinated: callers must run at most one
//! pipeline per project root at a time.

use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use confetti_core::types::{ComponentName, MirrorLayout, StandardArtifact};
use confetti_renderer::MapRenderer;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::fetcher::ArtifactFetcher;
use crate::map::regenerate_map;
use crate::naming::{classify, Classification};
use crate::transport::{Transport, UreqTransport};
use crate::writer::{write_file, WriteResult};

/// Result of handling one changed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The path is not a component file; nothing was done.
    NotRelevant,
    /// The component was written and the Map rebuilt.
    Synced {
        component: ComponentName,
        component_write: WriteResult,
        map_write: WriteResult,
    },
}

impl SyncOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, SyncOutcome::Synced { .. })
    }
}

/// Mirror synchronizer for a single project root.
pub struct Synchronizer {
    layout: MirrorLayout,
    fetcher: ArtifactFetcher,
    renderer: RwLock<MapRenderer>,
}

impl Synchronizer {
    /// Build a synchronizer for `root`.
    ///
    /// Loads the Map template up front, so a broken template fails here
    /// rather than halfway through a sync.
    pub fn new(
        root: impl Into<PathBuf>,
        config: &SyncConfig,
        transport: Box<dyn Transport>,
    ) -> Result<Self, SyncError> {
        let layout = MirrorLayout::new(root);
        let renderer = MapRenderer::for_project(layout.root())?;
        Ok(Self {
            fetcher: ArtifactFetcher::new(config, transport),
            layout,
            renderer: RwLock::new(renderer),
        })
    }

    /// [`Synchronizer::new`] with the default HTTP transport.
    pub fn with_http(root: impl Into<PathBuf>, config: &SyncConfig) -> Result<Self, SyncError> {
        Self::new(root, config, Box::new(UreqTransport::new()))
    }

    /// Reload the Map template from the project's override directory.
    ///
    /// On error the previously loaded template stays in use.
    pub fn reload_templates(&self) -> Result<(), SyncError> {
        let renderer = MapRenderer::for_project(self.layout.root())?;
        *self.renderer.write().unwrap_or_else(PoisonError::into_inner) = renderer;
        tracing::info!("reloaded Map template for {}", self.layout.root().display());
        Ok(())
    }

    /// `true` once `.confetti/Components/` exists.
    pub fn has_components_dir(&self) -> bool {
        self.layout.components_dir().is_dir()
    }

    /// Mirror the component behind a changed file, then rebuild the Map.
    ///
    /// `file` is relative to the project root. Paths that are not component
    /// files yield [`SyncOutcome::NotRelevant`].
    pub fn upsert_hidden_component(
        &self,
        file: &str,
        verbose: bool,
    ) -> Result<SyncOutcome, SyncError> {
        let lookup_key = match classify(file) {
            Classification::Component { lookup_key } => lookup_key,
            Classification::NotRelevant => {
                tracing::debug!("not a component file: {file}");
                return Ok(SyncOutcome::NotRelevant);
            }
        };
        if verbose {
            println!("Hidden component triggered by: {file}");
        }

        let artifact = self.fetcher.fetch_component(&lookup_key)?;
        let target = self.layout.component_path(&artifact.name);
        let component_write = write_file(&target, &artifact.content)?;
        if verbose {
            println!("Hidden component saved: {}", target.display());
        }

        let map_write = self.upsert_hidden_map(verbose)?;
        Ok(SyncOutcome::Synced {
            component: artifact.name,
            component_write,
            map_write,
        })
    }

    /// Rebuild `Components/Map.php` from the mirrored component files.
    pub fn upsert_hidden_map(&self, verbose: bool) -> Result<WriteResult, SyncError> {
        let renderer = self.renderer.read().unwrap_or_else(PoisonError::into_inner);
        let result = regenerate_map(&self.layout.components_dir(), &renderer)?;
        if verbose {
            println!("Hidden Map component saved: {}", result.path.display());
        }
        Ok(result)
    }

    /// Fetch the standard set and write every item under `.confetti/`.
    ///
    /// All item paths are validated before the first write.
    pub fn save_standard_hidden_files(&self, verbose: bool) -> Result<Vec<WriteResult>, SyncError> {
        let artifacts = self.fetcher.fetch_standard_set()?;
        for artifact in &artifacts {
            ensure_relative(&artifact.relative_path)?;
        }

        let mut writes = Vec::with_capacity(artifacts.len());
        for StandardArtifact {
            relative_path,
            content,
        } in &artifacts
        {
            let target = self.layout.standard_path(relative_path);
            writes.push(write_file(&target, content)?);
            if verbose {
                println!("Standard hidden component saved: {}", target.display());
            }
        }
        tracing::info!("saved {} standard hidden file(s)", writes.len());
        Ok(writes)
    }
}

/// Reject absolute paths and `..` segments.
fn ensure_relative(path: &Path) -> Result<(), SyncError> {
    let escapes = path.as_os_str().is_empty()
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(SyncError::UnsafePath {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
