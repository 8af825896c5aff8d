//! Filesystem operations over a vault

use async_trait::async_trait;
use imgsweep_errors::PlatformError;
use imgsweep_types::TreeEntry;
use std::path::Path;

use crate::core::PlatformContext;

/// Trait for the filesystem operations a sweep needs
#[async_trait]
pub trait FilesystemOperations: Send + Sync {
    /// List every regular file below `root`, relative to it and sorted by path.
    ///
    /// Symlinks are not followed. With `skip_hidden`, entries whose name or
    /// any ancestor directory starts with `.` are left out. Unreadable
    /// subdirectories are skipped; only a failure to read `root` itself is
    /// an error.
    async fn list_files(
        &self,
        ctx: &PlatformContext,
        root: &Path,
        skip_hidden: bool,
    ) -> Result<Vec<TreeEntry>, PlatformError>;

    /// Check if a path exists (without following a final symlink)
    async fn exists(&self, ctx: &PlatformContext, path: &Path) -> bool;

    /// Check if a path points to a directory.
    async fn is_dir(&self, ctx: &PlatformContext, path: &Path) -> bool;

    /// Create directory and all parent directories
    async fn create_dir_all(&self, ctx: &PlatformContext, path: &Path)
        -> Result<(), PlatformError>;

    /// Rename `src` to `dst`, refusing to replace an existing `dst`
    async fn rename(&self, ctx: &PlatformContext, src: &Path, dst: &Path)
        -> Result<(), PlatformError>;

    /// Remove a single file
    async fn remove_file(&self, ctx: &PlatformContext, path: &Path) -> Result<(), PlatformError>;

    /// Read a file as text; invalid UTF-8 is replaced rather than rejected
    async fn read_text(&self, ctx: &PlatformContext, path: &Path) -> Result<String, PlatformError>;
}
