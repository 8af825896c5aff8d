//! Listing the vault and picking out images and documents

use imgsweep_errors::SweepError;
use imgsweep_platform::{FilesystemOperations, PlatformContext};
use imgsweep_types::{ExtensionSet, TreeEntry};
use std::path::Path;

/// Current state of the tree under `root`.
///
/// Each call lists the disk afresh.
///
/// # Errors
///
/// Returns `SweepError::EnumerationFailure` if `root` cannot be listed.
pub async fn enumerate(
    fs: &dyn FilesystemOperations,
    ctx: &PlatformContext,
    root: &Path,
    skip_hidden: bool,
) -> Result<Vec<TreeEntry>, SweepError> {
    fs.list_files(ctx, root, skip_hidden)
        .await
        .map_err(|e| SweepError::EnumerationFailure {
            path: root.display().to_string(),
            reason: e.to_string(),
        })
}

/// Entries whose path ends with one of `extensions`, compared case-insensitively.
#[must_use]
pub fn classify(entries: &[TreeEntry], extensions: &ExtensionSet) -> Vec<TreeEntry> {
    entries
        .iter()
        .filter(|entry| extensions.matches(&entry.path))
        .cloned()
        .collect()
}
