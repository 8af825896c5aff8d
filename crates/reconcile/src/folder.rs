use imgsweep_errors::SweepError;
use imgsweep_platform::{FilesystemOperations, PlatformContext};
use std::path::Path;

/// Make sure `<root>/<folder>` exists as a directory.
///
/// Returns `true` when the folder was missing (and, unless `dry_run`, has
/// now been created).
///
/// # Errors
///
/// Returns `SweepError::FolderCreationFailure` if a non-directory occupies
/// the name or the directory cannot be created.
pub async fn ensure_canonical_folder(
    fs: &dyn FilesystemOperations,
    ctx: &PlatformContext,
    root: &Path,
    folder: &str,
    dry_run: bool,
) -> Result<bool, SweepError> {
    let path = root.join(folder);

    if fs.is_dir(ctx, &path).await {
        return Ok(false);
    }
    if fs.exists(ctx, &path).await {
        return Err(SweepError::FolderCreationFailure {
            folder: folder.to_string(),
            reason: "a file with that name already exists".to_string(),
        });
    }
    if dry_run {
        return Ok(true);
    }

    fs.create_dir_all(ctx, &path)
        .await
        .map_err(|e| SweepError::FolderCreationFailure {
            folder: folder.to_string(),
            reason: e.to_string(),
        })?;
    Ok(true)
}
