//! Naming conventions: which changed files are components, and how component
//! names map to files and accessor methods.
//!
//! The suffixes below omit the leading `c` of "component": it
//! may be written upper case (`ArticleComponent.blade.php`) or lower case
//! (`article.component.blade.php`). Everything after it is case-sensitive.

use confetti_core::types::{ComponentName, COMPONENT_EXTENSION, MAP_FILE_NAME};

/// Suffix of a component definition (template) file.
pub const COMPONENT_DEFINITION_SUFFIX: &str = "omponent.blade.php";

/// Suffix of a component class file; maps onto the definition suffix.
pub const COMPONENT_CLASS_SUFFIX: &str = "omponent.class.php";

/// Result of classifying a changed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The path belongs to a component; `lookup_key` is the definition file
    /// path to request from the authoring service.
    Component { lookup_key: String },
    /// Not a component file. Callers take no action.
    NotRelevant,
}

/// Classify a changed file path (relative to the project root).
///
/// A class file edit is treated as an edit of its definition file, since both
/// describe one logical component.
pub fn classify(path: &str) -> Classification {
    if path.ends_with(COMPONENT_DEFINITION_SUFFIX) {
        return Classification::Component {
            lookup_key: path.to_string(),
        };
    }
    match path.strip_suffix(COMPONENT_CLASS_SUFFIX) {
        Some(stem) => Classification::Component {
            lookup_key: format!("{stem}{COMPONENT_DEFINITION_SUFFIX}"),
        },
        None => Classification::NotRelevant,
    }
}

/// Method name used for `class_name` in the Map.
///
/// The first character is lower-cased. A trailing `_` (how reserved words
/// are escaped in class names) is then trimmed once.
pub fn accessor_identifier(class_name: &str) -> String {
    let mut chars = class_name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut name: String = first.to_lowercase().collect();
    name.push_str(chars.as_str());
    if let Some(trimmed) = name.strip_suffix('_') {
        name.truncate(trimmed.len());
    }
    name
}

/// Component name for a file directly inside `Components/`, if it is one.
///
/// Helper files (lower-case first letter) and the Map itself are skipped. The
/// file name is assumed to equal the class name.
pub fn component_name_from_file_name(file_name: &str) -> Option<ComponentName> {
    if file_name == MAP_FILE_NAME {
        return None;
    }
    if !file_name.chars().next().is_some_and(char::is_uppercase) {
        return None;
    }
    let ext = format!(".{COMPONENT_EXTENSION}");
    let stem = file_name.strip_suffix(ext.as_str()).unwrap_or(file_name);
    Some(ComponentName::from(stem))
}
