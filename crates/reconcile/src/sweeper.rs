//! The sweep pipeline: ensure folder, enumerate, relocate, extract, reap

use imgsweep_config::SweepConfig;
use imgsweep_errors::{Error, OpsError, SweepError};
use imgsweep_events::{
    AppEvent, EventEmitter, EventMeta, EventSender, FailureContext, SweepEvent,
};
use imgsweep_platform::{Platform, PlatformContext};
use imgsweep_types::{ReferenceSet, SweepFailure, SweepReport, SweepStage, TreeEntry};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::enumerate::{classify, enumerate};
use crate::folder::ensure_canonical_folder;
use crate::reap::{find_orphans, reap_orphans};
use crate::references::{extract_references, ReferenceExtractor};
use crate::relocate::{apply_relocations, plan_relocations};

/// Per-invocation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOptions {
    /// Plan every move and deletion without touching the tree
    pub dry_run: bool,
}

/// Runs sweeps over one vault.
///
/// A sweeper allows a single sweep at a time; a call made while another is
/// in progress fails with `SweepError::AlreadyRunning` and leaves the tree
/// alone.
pub struct Sweeper {
    platform: Platform,
    config: SweepConfig,
    vault_root: PathBuf,
    extractor: ReferenceExtractor,
    tx: Option<EventSender>,
    run_guard: Mutex<()>,
}

/// Builder for [`Sweeper`]
#[derive(Default)]
pub struct SweeperBuilder {
    platform: Option<Platform>,
    config: Option<SweepConfig>,
    vault_root: Option<PathBuf>,
    tx: Option<EventSender>,
}

impl SweeperBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: SweepConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Vault to sweep; overrides `vault_root` from the config
    #[must_use]
    pub fn with_vault_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.vault_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Validate the configuration and compile the reference matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or no vault root
    /// was given.
    pub fn build(self) -> Result<Sweeper, Error> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let vault_root = self
            .vault_root
            .or_else(|| config.vault_root.clone())
            .ok_or_else(|| OpsError::MissingComponent {
                component: "vault root".to_string(),
            })?;

        let extractor = ReferenceExtractor::new(
            &config.image_extensions,
            config.canonical_folder.clone(),
        )?;

        Ok(Sweeper {
            platform: self.platform.unwrap_or_else(Platform::current),
            config,
            vault_root,
            extractor,
            tx: self.tx,
            run_guard: Mutex::new(()),
        })
    }
}

/// Event emitter for one sweep; stamps the sweep id on every event.
struct SweepRun {
    id: Uuid,
    tx: Option<EventSender>,
}

impl EventEmitter for SweepRun {
    fn event_sender(&self) -> Option<&EventSender> {
        self.tx.as_ref()
    }

    fn enrich_event_meta(&self, _event: &AppEvent, meta: &mut EventMeta) {
        meta.correlation_id = Some(self.id.to_string());
    }
}

impl SweepRun {
    fn sweep(&self, event: SweepEvent) {
        self.emit(AppEvent::Sweep(event));
    }

    fn item_failed(&self, stage: SweepStage, error: &SweepError, report: &mut SweepReport) {
        tracing::warn!(%stage, error = %error, "sweep item failed");
        self.sweep(SweepEvent::ItemFailed {
            stage,
            path: error.item_path().map(str::to_string),
            failure: FailureContext::from_error(error),
        });
        report.failures.push(SweepFailure::from_error(stage, error));
    }

    fn fatal(&self, stage: SweepStage, error: SweepError) -> Error {
        tracing::error!(%stage, error = %error, "sweep aborted");
        self.sweep(SweepEvent::Failed {
            sweep_id: self.id,
            failure: FailureContext::from_error(&error),
        });
        error.into()
    }
}

impl Sweeper {
    #[must_use]
    pub fn builder() -> SweeperBuilder {
        SweeperBuilder::new()
    }

    #[must_use]
    pub fn vault_root(&self) -> &Path {
        &self.vault_root
    }

    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    fn canonical(&self) -> &str {
        &self.config.canonical_folder
    }

    /// Run one full sweep.
    ///
    /// Stages run strictly in order and every filesystem call is awaited
    /// before the next. Per-item failures end up in the report; only a
    /// fatal error is returned as `Err`.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::AlreadyRunning` if another sweep holds the run
    /// guard, `FolderCreationFailure` if the canonical folder cannot be
    /// made, or `EnumerationFailure` if the vault cannot be listed.
    #[allow(clippy::too_many_lines)]
    pub async fn run(&self, options: SweepOptions) -> Result<SweepReport, Error> {
        let Ok(_guard) = self.run_guard.try_lock() else {
            tracing::warn!(vault = %self.vault_root.display(), "sweep already running");
            return Err(SweepError::AlreadyRunning.into());
        };

        let started = Instant::now();
        let mut report = SweepReport::new(
            self.vault_root.clone(),
            self.canonical(),
            options.dry_run,
        );
        let run = SweepRun {
            id: report.sweep_id,
            tx: self.tx.clone(),
        };
        let ctx = PlatformContext::new(self.tx.clone()).with_correlation_id(run.id.to_string());
        let fs = self.platform.filesystem();
        let root = self.vault_root.as_path();
        let canonical = self.canonical();

        tracing::info!(
            sweep_id = %run.id,
            vault = %root.display(),
            dry_run = options.dry_run,
            "starting sweep"
        );
        run.sweep(SweepEvent::Started {
            sweep_id: run.id,
            vault_root: self.vault_root.clone(),
            canonical_folder: canonical.to_string(),
            dry_run: options.dry_run,
        });

        if !fs.is_dir(&ctx, root).await {
            return Err(run.fatal(
                SweepStage::Enumerate,
                SweepError::EnumerationFailure {
                    path: root.display().to_string(),
                    reason: "vault root is not a directory".to_string(),
                },
            ));
        }

        // 1. canonical folder
        run.sweep(SweepEvent::StageStarted {
            stage: SweepStage::EnsureFolder,
        });
        report.folder_created =
            ensure_canonical_folder(fs, &ctx, root, canonical, options.dry_run)
                .await
                .map_err(|e| run.fatal(SweepStage::EnsureFolder, e))?;
        if report.folder_created {
            run.sweep(SweepEvent::FolderCreated {
                folder: canonical.to_string(),
            });
        }
        run.sweep(SweepEvent::StageCompleted {
            stage: SweepStage::EnsureFolder,
            items: usize::from(report.folder_created),
        });

        // 2. enumerate and classify
        run.sweep(SweepEvent::StageStarted {
            stage: SweepStage::Enumerate,
        });
        let entries = enumerate(fs, &ctx, root, self.config.skip_hidden)
            .await
            .map_err(|e| run.fatal(SweepStage::Enumerate, e))?;
        let images = classify(&entries, &self.config.image_extensions);
        let documents = classify(&entries, &self.config.document_extensions);
        report.images_found = images.len();
        run.sweep(SweepEvent::StageCompleted {
            stage: SweepStage::Enumerate,
            items: entries.len(),
        });

        // 3. relocate
        run.sweep(SweepEvent::StageStarted {
            stage: SweepStage::Relocate,
        });
        let plan = plan_relocations(&entries, &images, canonical, self.config.collision_policy);
        for collision in &plan.collisions {
            run.item_failed(SweepStage::Relocate, collision, &mut report);
        }
        let (moved, move_failures) = if options.dry_run {
            (plan.moves, Vec::new())
        } else {
            apply_relocations(fs, &ctx, root, plan.moves).await
        };
        for failure in &move_failures {
            run.item_failed(SweepStage::Relocate, failure, &mut report);
        }
        for record in &moved {
            tracing::debug!(from = %record.from, to = %record.to, "relocated image");
            run.sweep(SweepEvent::ImageMoved {
                from: record.from.clone(),
                to: record.to.clone(),
                renamed: record.renamed,
            });
        }
        run.sweep(SweepEvent::StageCompleted {
            stage: SweepStage::Relocate,
            items: moved.len(),
        });
        report.moved = moved;

        // 4. extract references
        run.sweep(SweepEvent::StageStarted {
            stage: SweepStage::ExtractReferences,
        });
        let extraction = extract_references(fs, &ctx, root, &documents, &self.extractor).await;
        for failure in &extraction.failures {
            run.item_failed(SweepStage::ExtractReferences, failure, &mut report);
        }
        report.documents_scanned = extraction.documents_scanned;
        report.references = extraction.references.len();
        run.sweep(SweepEvent::ReferencesCollected {
            documents: extraction.documents_scanned,
            references: extraction.references.len(),
        });
        run.sweep(SweepEvent::StageCompleted {
            stage: SweepStage::ExtractReferences,
            items: extraction.references.len(),
        });

        // 5. reap orphans from the post-relocation canonical folder
        run.sweep(SweepEvent::StageStarted {
            stage: SweepStage::Reap,
        });
        let canonical_images = if options.dry_run {
            simulated_canonical_images(&images, &report, canonical)
        } else {
            let entries = enumerate(fs, &ctx, root, self.config.skip_hidden)
                .await
                .map_err(|e| run.fatal(SweepStage::Reap, e))?;
            classify(&entries, &self.config.image_extensions)
        };
        let orphans = find_orphans(&canonical_images, canonical, &extraction.references);
        let (deleted, delete_failures) = if options.dry_run {
            (orphans.into_iter().map(|o| o.path).collect(), Vec::new())
        } else {
            reap_orphans(fs, &ctx, root, orphans).await
        };
        for failure in &delete_failures {
            run.item_failed(SweepStage::Reap, failure, &mut report);
        }
        for path in &deleted {
            tracing::debug!(%path, "deleted orphaned image");
            run.sweep(SweepEvent::ImageDeleted { path: path.clone() });
        }
        run.sweep(SweepEvent::StageCompleted {
            stage: SweepStage::Reap,
            items: deleted.len(),
        });
        report.deleted = deleted;

        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            sweep_id = %run.id,
            moved = report.moved.len(),
            deleted = report.deleted.len(),
            failures = report.failures.len(),
            duration_ms = report.duration_ms,
            "sweep completed"
        );
        run.sweep(SweepEvent::Completed {
            sweep_id: run.id,
            moved: report.moved.len(),
            deleted: report.deleted.len(),
            failures: report.failures.len(),
            duration_ms: report.duration_ms,
        });

        Ok(report)
    }

    /// Enumerate the vault and collect the normalized reference set without
    /// changing anything.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::EnumerationFailure` if the vault cannot be listed.
    pub async fn collect_references(&self) -> Result<(ReferenceSet, Vec<SweepError>), Error> {
        let ctx = PlatformContext::new(self.tx.clone());
        let fs = self.platform.filesystem();
        let entries = enumerate(fs, &ctx, &self.vault_root, self.config.skip_hidden).await?;
        let documents = classify(&entries, &self.config.document_extensions);
        let extraction =
            extract_references(fs, &ctx, &self.vault_root, &documents, &self.extractor).await;
        Ok((extraction.references, extraction.failures))
    }
}

/// What the canonical folder would hold after the planned moves.
fn simulated_canonical_images(
    images: &[TreeEntry],
    report: &SweepReport,
    canonical: &str,
) -> Vec<TreeEntry> {
    let mut simulated: Vec<TreeEntry> = images
        .iter()
        .filter(|i| i.is_directly_in(canonical))
        .cloned()
        .chain(report.moved.iter().map(|m| TreeEntry::from_relative(m.to.clone())))
        .collect();
    simulated.sort();
    simulated
}
