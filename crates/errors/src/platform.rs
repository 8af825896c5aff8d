//! Platform-specific operation errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors that can occur during platform filesystem operations
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("filesystem operation failed: {operation} - {message}")]
    FilesystemOperationFailed { operation: String, message: String },

    #[error("permission denied: {operation} - {message}")]
    PermissionDenied { operation: String, message: String },

    #[error("path not found: {operation} - {path}")]
    NotFound { operation: String, path: String },

    #[error("destination exists: {operation} - {path}")]
    DestinationExists { operation: String, path: String },
}

impl PlatformError {
    /// Classify an `io::Error` raised by `operation` on `path`.
    #[must_use]
    pub fn from_io(operation: &str, path: &std::path::Path, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                operation: operation.to_string(),
                message: format!("{}: {err}", path.display()),
            },
            std::io::ErrorKind::NotFound => Self::NotFound {
                operation: operation.to_string(),
                path: path.display().to_string(),
            },
            std::io::ErrorKind::AlreadyExists => Self::DestinationExists {
                operation: operation.to_string(),
                path: path.display().to_string(),
            },
            _ => Self::FilesystemOperationFailed {
                operation: operation.to_string(),
                message: format!("{}: {err}", path.display()),
            },
        }
    }
}

impl UserFacingError for PlatformError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::FilesystemOperationFailed { .. } => "platform.filesystem_failed",
            Self::PermissionDenied { .. } => "platform.permission_denied",
            Self::NotFound { .. } => "platform.not_found",
            Self::DestinationExists { .. } => "platform.destination_exists",
        };
        Some(code)
    }
}
