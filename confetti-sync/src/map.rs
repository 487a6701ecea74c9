//! Map generator: rebuilds `Components/Map.php` from the component files
//! currently present in the mirror.
//!
//! The Map is always rebuilt wholesale from a directory scan; it is never
//! patched. Names are sorted so the output does not depend on directory
//! listing order, which makes the result a pure function of the set of
//! component file names.

use std::io::ErrorKind;
use std::path::Path;

use confetti_core::types::{ComponentName, MAP_FILE_NAME};
use confetti_renderer::{AccessorCtx, MapContext, MapRenderer};

use crate::error::{io_err, SyncError};
use crate::naming::{accessor_identifier, component_name_from_file_name};
use crate::writer::{write_file, WriteResult, TMP_SUFFIX};

/// Known component names directly inside `components_dir`, sorted.
pub fn known_component_names(components_dir: &Path) -> Result<Vec<ComponentName>, SyncError> {
    let entries = std::fs::read_dir(components_dir).map_err(|e| io_err(components_dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(components_dir, e))?;
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            // Removed between listing and stat.
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) => return Err(io_err(entry.path(), err)),
        };
        if !file_type.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::debug!("skipping non UTF-8 file name: {}", entry.path().display());
            continue;
        };
        if file_name.ends_with(TMP_SUFFIX) {
            continue;
        }
        if let Some(name) = component_name_from_file_name(file_name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// One accessor per name, in the given order.
pub fn build_map_context(names: &[ComponentName]) -> MapContext {
    MapContext {
        accessors: names
            .iter()
            .map(|name| AccessorCtx::new(accessor_identifier(name.as_str()), name.as_str()))
            .collect(),
    }
}

/// Render the Map for the current contents of `components_dir` without
/// writing it.
pub fn render_map(components_dir: &Path, renderer: &MapRenderer) -> Result<String, SyncError> {
    let names = known_component_names(components_dir)?;
    let ctx = build_map_context(&names);
    Ok(renderer.render(&ctx)?)
}

/// Rebuild and write `components_dir/Map.php`.
///
/// Safe to call at any time, e.g. to repair a Map left behind by an earlier
/// failed sync.
pub fn regenerate_map(
    components_dir: &Path,
    renderer: &MapRenderer,
) -> Result<WriteResult, SyncError> {
    let content = render_map(components_dir, renderer)?;
    write_file(&components_dir.join(MAP_FILE_NAME), content.as_bytes())
}
