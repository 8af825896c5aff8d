//! Sweep-specific error types for relocation, reference extraction and reaping

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors emitted by the sweep pipeline.
///
/// Only `FolderCreationFailure`, `EnumerationFailure` and `AlreadyRunning`
/// abort a sweep. The remaining variants describe a single item and are
/// collected into the sweep report while processing continues.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SweepError {
    /// The canonical folder could not be created.
    #[error("failed to create canonical folder {folder}: {reason}")]
    FolderCreationFailure { folder: String, reason: String },

    /// The document tree could not be listed.
    #[error("failed to enumerate {path}: {reason}")]
    EnumerationFailure { path: String, reason: String },

    /// A single image could not be relocated.
    #[error("failed to move {source_path} to {destination}: {reason}")]
    MoveFailure {
        source_path: String,
        destination: String,
        reason: String,
    },

    /// The relocation target is already taken and the collision policy
    /// forbids picking another name.
    #[error("cannot move {source_path}: {destination} already exists")]
    Collision {
        source_path: String,
        destination: String,
    },

    /// A document could not be read; it contributes no references.
    #[error("failed to read document {path}: {reason}")]
    ReadFailure { path: String, reason: String },

    /// An orphaned image could not be deleted.
    #[error("failed to delete {path}: {reason}")]
    DeleteFailure { path: String, reason: String },

    /// Another sweep holds the run guard.
    #[error("a sweep is already running")]
    AlreadyRunning,
}

impl SweepError {
    /// Whether this error stops the whole sweep.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::FolderCreationFailure { .. }
                | Self::EnumerationFailure { .. }
                | Self::AlreadyRunning
        )
    }

    /// Vault-relative path of the item this error concerns, if any.
    #[must_use]
    pub fn item_path(&self) -> Option<&str> {
        match self {
            Self::MoveFailure { source_path, .. } | Self::Collision { source_path, .. } => {
                Some(source_path)
            }
            Self::ReadFailure { path, .. } | Self::DeleteFailure { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl UserFacingError for SweepError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::FolderCreationFailure { .. } => {
                Some("Check that the vault is writable and nothing else uses the folder name.")
            }
            Self::Collision { .. } => Some(
                "Rename one of the images or set collision_policy = \"suffix\" in the config.",
            ),
            Self::AlreadyRunning => Some("Wait for the running sweep to finish."),
            _ => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyRunning | Self::ReadFailure { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FolderCreationFailure { .. } => "sweep.folder_creation_failed",
            Self::EnumerationFailure { .. } => "sweep.enumeration_failed",
            Self::MoveFailure { .. } => "sweep.move_failed",
            Self::Collision { .. } => "sweep.collision",
            Self::ReadFailure { .. } => "sweep.read_failed",
            Self::DeleteFailure { .. } => "sweep.delete_failed",
            Self::AlreadyRunning => "sweep.already_running",
        };
        Some(code)
    }
}
