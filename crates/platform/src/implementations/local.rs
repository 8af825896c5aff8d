//! Local disk implementation of filesystem operations
//!
//! Wraps `tokio::fs` (and `walkdir` on a blocking thread for listing) with
//! platform event emission and `PlatformError` classification.

use async_trait::async_trait;
use imgsweep_errors::PlatformError;
use imgsweep_events::{
    AppEvent, EventEmitter, FailureContext, PlatformEvent, PlatformOperationContext,
    PlatformOperationMetrics,
};
use imgsweep_types::TreeEntry;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use walkdir::WalkDir;

use crate::core::PlatformContext;
use crate::filesystem::FilesystemOperations;

/// Filesystem operations against the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystemOperations;

impl LocalFilesystemOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn filesystem_context(
    operation: &str,
    source: Option<&Path>,
    target: &Path,
) -> PlatformOperationContext {
    PlatformOperationContext {
        operation: operation.to_string(),
        target: Some(target.to_path_buf()),
        source: source.map(Path::to_path_buf),
    }
}

fn filesystem_metrics(
    duration: Duration,
    changes: Option<Vec<String>>,
) -> PlatformOperationMetrics {
    PlatformOperationMetrics {
        duration_ms: Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)),
        changes,
    }
}

fn emit_fs_started(ctx: &PlatformContext, operation: &str, source: Option<&Path>, target: &Path) {
    ctx.emit(AppEvent::Platform(PlatformEvent::OperationStarted {
        context: filesystem_context(operation, source, target),
    }));
}

fn emit_fs_completed(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    changes: Option<Vec<String>>,
    duration: Duration,
) {
    ctx.emit(AppEvent::Platform(PlatformEvent::OperationCompleted {
        context: filesystem_context(operation, source, target),
        metrics: Some(filesystem_metrics(duration, changes)),
    }));
}

fn emit_fs_failed(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    error: &PlatformError,
    duration: Duration,
) {
    ctx.emit(AppEvent::Platform(PlatformEvent::OperationFailed {
        context: filesystem_context(operation, source, target),
        failure: FailureContext::from_error(error),
        metrics: Some(filesystem_metrics(duration, None)),
    }));
}

/// Report the outcome of a timed operation and hand the result back.
fn finish<T>(
    ctx: &PlatformContext,
    operation: &str,
    source: Option<&Path>,
    target: &Path,
    start: Instant,
    result: Result<T, PlatformError>,
    changes: impl FnOnce(&T) -> Option<Vec<String>>,
) -> Result<T, PlatformError> {
    let duration = start.elapsed();
    match &result {
        Ok(value) => emit_fs_completed(ctx, operation, source, target, changes(value), duration),
        Err(e) => emit_fs_failed(ctx, operation, source, target, e, duration),
    }
    result
}

fn is_hidden_name(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}

/// Join the components of a relative path with `/`.
///
/// Returns `None` for names that are not valid UTF-8; such files cannot be
/// matched against references in text documents.
fn to_vault_path(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    Some(parts.join("/"))
}

fn walk_tree(root: &Path, skip_hidden: bool) -> Result<Vec<TreeEntry>, PlatformError> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !skip_hidden || !is_hidden_name(e.file_name()));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) if err.depth() == 0 => {
                let message = err.to_string();
                return Err(match err.into_io_error() {
                    Some(io) => PlatformError::from_io("list_files", root, &io),
                    None => PlatformError::FilesystemOperationFailed {
                        operation: "list_files".to_string(),
                        message,
                    },
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        match to_vault_path(relative) {
            Some(path) => entries.push(TreeEntry::from_relative(path)),
            None => {
                tracing::debug!(path = %entry.path().display(), "skipping non UTF-8 path");
            }
        }
    }

    entries.sort();
    Ok(entries)
}

#[async_trait]
impl FilesystemOperations for LocalFilesystemOperations {
    async fn list_files(
        &self,
        ctx: &PlatformContext,
        root: &Path,
        skip_hidden: bool,
    ) -> Result<Vec<TreeEntry>, PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "list_files", None, root);

        let walk_root: PathBuf = root.to_path_buf();
        let result = match fs::metadata(root).await {
            Ok(meta) if meta.is_dir() => {
                tokio::task::spawn_blocking(move || walk_tree(&walk_root, skip_hidden))
                    .await
                    .unwrap_or_else(|e| {
                        Err(PlatformError::FilesystemOperationFailed {
                            operation: "list_files".to_string(),
                            message: format!("listing task failed: {e}"),
                        })
                    })
            }
            Ok(_) => Err(PlatformError::FilesystemOperationFailed {
                operation: "list_files".to_string(),
                message: format!("{} is not a directory", root.display()),
            }),
            Err(e) => Err(PlatformError::from_io("list_files", root, &e)),
        };

        finish(ctx, "list_files", None, root, start, result, |entries| {
            Some(vec![format!("{} files", entries.len())])
        })
    }

    async fn exists(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::symlink_metadata(path).await.is_ok()
    }

    async fn is_dir(&self, _ctx: &PlatformContext, path: &Path) -> bool {
        fs::metadata(path).await.is_ok_and(|m| m.is_dir())
    }

    async fn create_dir_all(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "create_dir_all", None, path);

        let result = fs::create_dir_all(path)
            .await
            .map_err(|e| PlatformError::from_io("create_dir_all", path, &e));

        finish(ctx, "create_dir_all", None, path, start, result, |_| {
            Some(vec![format!("created {}", path.display())])
        })
    }

    async fn rename(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
    ) -> Result<(), PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "rename", Some(src), dst);

        let result = if self.exists(ctx, dst).await {
            Err(PlatformError::DestinationExists {
                operation: "rename".to_string(),
                path: dst.display().to_string(),
            })
        } else {
            fs::rename(src, dst)
                .await
                .map_err(|e| PlatformError::from_io("rename", src, &e))
        };

        finish(ctx, "rename", Some(src), dst, start, result, |_| None)
    }

    async fn remove_file(&self, ctx: &PlatformContext, path: &Path) -> Result<(), PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "remove_file", None, path);

        let result = fs::remove_file(path)
            .await
            .map_err(|e| PlatformError::from_io("remove_file", path, &e));

        finish(ctx, "remove_file", None, path, start, result, |_| {
            Some(vec![format!("removed {}", path.display())])
        })
    }

    async fn read_text(&self, ctx: &PlatformContext, path: &Path) -> Result<String, PlatformError> {
        let start = Instant::now();
        emit_fs_started(ctx, "read_text", None, path);

        let result = fs::read(path)
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .map_err(|e| PlatformError::from_io("read_text", path, &e));

        finish(ctx, "read_text", None, path, start, result, |_| None)
    }
}
