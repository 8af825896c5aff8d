//! Sweep and reference listing operations

use crate::{OpsCtx, ReferenceReport};
use imgsweep_errors::{Error, UserFacingError};
use imgsweep_events::{AppEvent, EventEmitter, GeneralEvent};
use imgsweep_reconcile::SweepOptions;
use imgsweep_types::{SweepFailure, SweepReport, SweepStage};

/// Run one sweep over the context's vault.
///
/// With `check` set nothing on disk changes; the report lists what a real
/// sweep would move and delete.
///
/// # Errors
///
/// Returns an error if the sweep fails fatally or another sweep is running.
pub async fn sweep(ctx: &OpsCtx, check: bool) -> Result<SweepReport, Error> {
    let operation = if check { "sweep --check" } else { "sweep" };
    ctx.emit_operation_started(operation);
    ctx.emit(AppEvent::General(GeneralEvent::debug_with_context(
        "sweep settings",
        [
            ("vault", ctx.vault_root().display().to_string()),
            ("canonical_folder", ctx.config.sweep.canonical_folder.clone()),
            ("collision_policy", ctx.config.sweep.collision_policy.to_string()),
            ("skip_hidden", ctx.config.sweep.skip_hidden.to_string()),
        ],
    )));

    match ctx.sweeper.run(SweepOptions { dry_run: check }).await {
        Ok(report) => {
            ctx.emit_operation_completed(operation, !report.has_failures());
            Ok(report)
        }
        Err(e) => {
            ctx.emit_operation_failed(operation, e.user_message());
            Err(e)
        }
    }
}

/// Collect the normalized reference set without touching the vault.
///
/// # Errors
///
/// Returns an error if the vault cannot be listed.
pub async fn references(ctx: &OpsCtx) -> Result<ReferenceReport, Error> {
    ctx.emit_operation_started("refs");

    let (set, read_failures) = ctx.sweeper.collect_references().await?;
    for failure in &read_failures {
        ctx.emit_warning_with_context("document could not be read", failure.to_string());
    }

    let report = ReferenceReport {
        vault_root: ctx.vault_root().to_path_buf(),
        references: set.into_sorted_vec(),
        failures: read_failures
            .iter()
            .map(|e| SweepFailure::from_error(SweepStage::ExtractReferences, e))
            .collect(),
    };

    ctx.emit_debug(format!("{} references collected", report.references.len()));
    ctx.emit_operation_completed("refs", report.failures.is_empty());
    Ok(report)
}
