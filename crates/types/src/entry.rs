//! Tree entries and extension sets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Extensions recognized as images when no configuration overrides them.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "bmp", "webp"];

/// Extensions recognized as documents that may reference images.
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &["md"];

/// Snapshot of a single file in the document tree.
///
/// `path` is relative to the vault root and always uses `/` separators so
/// it can be compared directly against references found in documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Vault-relative path, e.g. `notes/diagram.png`
    pub path: String,
    /// Base name including extension, e.g. `diagram.png`
    pub name: String,
    /// Extension without the leading dot, as it appears on disk
    pub extension: String,
}

impl TreeEntry {
    /// Build an entry from a vault-relative, `/`-separated path.
    #[must_use]
    pub fn from_relative(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = path.rsplit('/').next().unwrap_or(&path).to_string();
        let extension = match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx + 1..].to_string(),
            _ => String::new(),
        };
        Self {
            path,
            name,
            extension,
        }
    }

    /// Path of the containing directory, empty for entries at the root.
    #[must_use]
    pub fn parent(&self) -> &str {
        match self.path.rfind('/') {
            Some(idx) => &self.path[..idx],
            None => "",
        }
    }

    /// Whether the entry sits directly inside `folder` (not in a subfolder).
    #[must_use]
    pub fn is_directly_in(&self, folder: &str) -> bool {
        self.parent() == folder
    }

    /// File name without its extension.
    #[must_use]
    pub fn stem(&self) -> &str {
        if self.extension.is_empty() {
            &self.name
        } else {
            &self.name[..self.name.len() - self.extension.len() - 1]
        }
    }
}

impl fmt::Display for TreeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Case-insensitive set of file extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet(Vec<String>);

impl ExtensionSet {
    /// Build a set; entries are lowercased and stripped of a leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exts: Vec<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        Self(exts)
    }

    /// The recognized image extensions.
    #[must_use]
    pub fn images() -> Self {
        Self::new(DEFAULT_IMAGE_EXTENSIONS)
    }

    /// The recognized document extensions.
    #[must_use]
    pub fn documents() -> Self {
        Self::new(DEFAULT_DOCUMENT_EXTENSIONS)
    }

    /// Whether `path` ends with `.<ext>` for any extension in the set.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let lower = path.to_lowercase();
        self.0.iter().any(|ext| {
            lower.len() > ext.len()
                && lower.ends_with(ext.as_str())
                && lower.as_bytes()[lower.len() - ext.len() - 1] == b'.'
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(extensions: Vec<String>) -> Self {
        Self::new(extensions)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        set.0
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::images()
    }
}
