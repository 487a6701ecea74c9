//! Tera rendering engine for `Map.php`.
//!
//! The Map template is embedded in the binary. A project may override it by
//! placing `Map.php.tera` in `<root>/.confetti-templates/`; override names are
//! matched case-insensitively.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use crate::context::MapContext;
use crate::error::RenderError;

/// Name under which the Map template is registered.
pub const MAP_TEMPLATE: &str = "map.php.tera";

/// Directory, relative to the project root, searched for template overrides.
pub const TEMPLATE_OVERRIDE_DIR: &str = ".confetti-templates";

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[(MAP_TEMPLATE, include_str!("templates/Map.php.tera"))];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/").to_lowercase()
}

fn load_override_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.is_dir() {
        return Ok(vec![]);
    }
    let mut templates = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if !meta.is_file() || path.extension().and_then(|s| s.to_str()) != Some("tera") {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((normalize_template_name(rel), contents));
    }
    Ok(templates)
}

fn build_tera(override_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = override_dir {
        for (name, content) in load_override_templates(dir)? {
            templates.insert(name, content);
        }
    }

    let mut tera = Tera::default();
    tera.add_raw_templates(templates.into_iter().collect::<Vec<_>>())?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// MapRenderer
// ---------------------------------------------------------------------------

/// Renders `Map.php` from a [`MapContext`]. Create once and reuse.
pub struct MapRenderer {
    tera: Tera,
}

impl MapRenderer {
    /// Renderer backed by the embedded template only.
    pub fn new() -> Result<Self, RenderError> {
        Ok(MapRenderer { tera: build_tera(None)? })
    }

    /// Renderer that honours overrides in `<root>/.confetti-templates/`.
    ///
    /// A missing override directory is not an error.
    pub fn for_project(root: &Path) -> Result<Self, RenderError> {
        Self::with_override_dir(&root.join(TEMPLATE_OVERRIDE_DIR))
    }

    pub fn with_override_dir(dir: &Path) -> Result<Self, RenderError> {
        Ok(MapRenderer { tera: build_tera(Some(dir))? })
    }

    /// Render the full Map class. Stanzas appear in `ctx.accessors` order.
    pub fn render(&self, ctx: &MapContext) -> Result<String, RenderError> {
        let tera_ctx = ctx.to_tera_context()?;
        let rendered = self.tera.render(MAP_TEMPLATE, &tera_ctx)?;
        Ok(rendered.replace("\r\n", "\n"))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
