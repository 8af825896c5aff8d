//! Deleting canonical images nothing refers to

use imgsweep_errors::SweepError;
use imgsweep_platform::{FilesystemOperations, PlatformContext};
use imgsweep_types::{ReferenceSet, TreeEntry};
use std::path::Path;

/// Images directly inside `canonical` whose path is not referenced.
///
/// Only direct children are candidates; images anywhere else are never
/// removed.
#[must_use]
pub fn find_orphans(
    images: &[TreeEntry],
    canonical: &str,
    references: &ReferenceSet,
) -> Vec<TreeEntry> {
    images
        .iter()
        .filter(|image| image.is_directly_in(canonical) && !references.contains(&image.path))
        .cloned()
        .collect()
}

/// Permanently delete `orphans`, continuing past individual failures.
pub async fn reap_orphans(
    fs: &dyn FilesystemOperations,
    ctx: &PlatformContext,
    root: &Path,
    orphans: Vec<TreeEntry>,
) -> (Vec<String>, Vec<SweepError>) {
    let mut deleted = Vec::with_capacity(orphans.len());
    let mut failures = Vec::new();

    for orphan in orphans {
        match fs.remove_file(ctx, &root.join(&orphan.path)).await {
            Ok(()) => deleted.push(orphan.path),
            Err(e) => failures.push(SweepError::DeleteFailure {
                path: orphan.path,
                reason: e.to_string(),
            }),
        }
    }

    (deleted, failures)
}
