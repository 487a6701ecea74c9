//! Domain types for the hidden component mirror.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mirror layout constants
// ---------------------------------------------------------------------------

/// Name of the hidden, git-ignorable mirror directory at the project root.
pub const HIDDEN_DIR: &str = ".confetti";

/// Subdirectory of [`HIDDEN_DIR`] that holds one file per component.
pub const COMPONENTS_DIR: &str = "Components";

/// Extension shared by component files and the Map.
pub const COMPONENT_EXTENSION: &str = "php";

/// File name of the aggregate accessor class inside [`COMPONENTS_DIR`].
pub const MAP_FILE_NAME: &str = "Map.php";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Canonical class name of a component, e.g. `Article`.
///
/// The name doubles as the file stem inside `.confetti/Components/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ComponentName(pub String);

impl ComponentName {
    /// `<name>.php`
    pub fn file_name(&self) -> String {
        format!("{}.{COMPONENT_EXTENSION}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// A decoded single-component payload, addressed by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentArtifact {
    pub name: ComponentName,
    pub content: Vec<u8>,
}

/// A decoded item of the standard set, addressed by a path relative to the
/// hidden directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardArtifact {
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
}

// ---------------------------------------------------------------------------
// MirrorLayout
// ---------------------------------------------------------------------------

/// Paths of the mirror tree for one project root.
///
/// ```text
/// <root>/.confetti/
///   Components/
///     <ComponentName>.php
///     Map.php
///   <standard files...>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorLayout {
    root: PathBuf,
}

impl MirrorLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root the mirror lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.confetti`
    pub fn hidden_dir(&self) -> PathBuf {
        self.root.join(HIDDEN_DIR)
    }

    /// `<root>/.confetti/Components`
    pub fn components_dir(&self) -> PathBuf {
        self.hidden_dir().join(COMPONENTS_DIR)
    }

    /// `<root>/.confetti/Components/<name>.php`
    pub fn component_path(&self, name: &ComponentName) -> PathBuf {
        self.components_dir().join(name.file_name())
    }

    /// `<root>/.confetti/Components/Map.php`
    pub fn map_path(&self) -> PathBuf {
        self.components_dir().join(MAP_FILE_NAME)
    }

    /// `<root>/.confetti/<relative>`: pure, does not validate `relative`.
    pub fn standard_path(&self, relative: &Path) -> PathBuf {
        self.hidden_dir().join(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_paths_are_rooted_in_hidden_dir() {
        let layout = MirrorLayout::new("/srv/office");
        assert_eq!(layout.hidden_dir(), PathBuf::from("/srv/office/.confetti"));
        assert_eq!(
            layout.component_path(&ComponentName::from("Article")),
            PathBuf::from("/srv/office/.confetti/Components/Article.php")
        );
        assert_eq!(
            layout.map_path(),
            PathBuf::from("/srv/office/.confetti/Components/Map.php")
        );
        assert_eq!(
            layout.standard_path(Path::new("a/b.php")),
            PathBuf::from("/srv/office/.confetti/a/b.php")
        );
    }
}
