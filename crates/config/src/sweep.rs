//! Settings that drive a single sweep

use crate::constants::DEFAULT_CANONICAL_FOLDER;
use imgsweep_errors::{ConfigError, Error};
use imgsweep_types::ExtensionSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What to do when a relocation target is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Leave the image where it is and report a collision
    #[default]
    Skip,
    /// Pick `<stem>-<n>.<ext>` with the smallest free `n`.
    ///
    /// Documents are never rewritten, so nothing references the suffixed
    /// name. Unless a document already links it, the orphan reaper deletes
    /// the suffixed copy later in the same sweep.
    Suffix,
}

impl FromStr for CollisionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "suffix" => Ok(Self::Suffix),
            _ => Err(ConfigError::InvalidValue {
                field: "collision_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Suffix => write!(f, "suffix"),
        }
    }
}

/// Sweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Vault to sweep; falls back to the working directory
    #[serde(default)]
    pub vault_root: Option<PathBuf>,
    #[serde(default = "default_canonical_folder")]
    pub canonical_folder: String,
    #[serde(default = "ExtensionSet::images")]
    pub image_extensions: ExtensionSet,
    #[serde(default = "ExtensionSet::documents")]
    pub document_extensions: ExtensionSet,
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            vault_root: None,
            canonical_folder: default_canonical_folder(),
            image_extensions: ExtensionSet::images(),
            document_extensions: ExtensionSet::documents(),
            skip_hidden: default_skip_hidden(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl SweepConfig {
    /// Check values that serde cannot reject on its own.
    ///
    /// The canonical folder must be a single, non-hidden path segment at the
    /// vault root with no surrounding whitespace, and both extension lists
    /// must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` describing the first offending value.
    pub fn validate(&self) -> Result<(), Error> {
        let folder = self.canonical_folder.as_str();
        if folder.trim().is_empty() {
            return Err(invalid("canonical_folder must not be empty"));
        }
        if folder.trim() != folder {
            return Err(invalid(format!(
                "canonical_folder '{folder}' has leading or trailing whitespace"
            )));
        }
        if folder.contains('/') || folder.contains('\\') {
            return Err(invalid(format!(
                "canonical_folder must be a single directory name, got '{folder}'"
            )));
        }
        if folder == "." || folder == ".." {
            return Err(invalid(format!("canonical_folder cannot be '{folder}'")));
        }
        if folder.starts_with('.') && self.skip_hidden {
            return Err(invalid(format!(
                "canonical_folder '{folder}' is hidden and would be skipped"
            )));
        }
        if self.image_extensions.is_empty() {
            return Err(invalid("image_extensions must not be empty"));
        }
        if self.document_extensions.is_empty() {
            return Err(invalid("document_extensions must not be empty"));
        }
        Ok(())
    }

    /// Resolve the vault root, defaulting to the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::VaultNotFound` if the resolved path is not an
    /// existing directory.
    pub fn resolve_vault_root(&self) -> Result<PathBuf, Error> {
        let root = match &self.vault_root {
            Some(path) => path.clone(),
            None => std::env::current_dir().map_err(|e| ConfigError::VaultNotFound {
                path: format!("current directory ({e})"),
            })?,
        };

        if !root.is_dir() {
            return Err(ConfigError::VaultNotFound {
                path: root.display().to_string(),
            }
            .into());
        }
        Ok(root)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    ConfigError::Invalid {
        message: message.into(),
    }
    .into()
}

fn default_canonical_folder() -> String {
    DEFAULT_CANONICAL_FOLDER.to_string()
}

fn default_skip_hidden() -> bool {
    true
}
