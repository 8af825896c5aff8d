#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for imgsweep
//!
//! This crate sits between the CLI and the sweep pipeline. It resolves the
//! vault, wires configuration and events into a [`Sweeper`](imgsweep_reconcile::Sweeper)
//! and exposes one function per command.

mod context;
mod sweep;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use sweep::{references, sweep};
pub use types::ReferenceReport;

use imgsweep_errors::Error;
use imgsweep_types::SweepReport;

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Outcome of a sweep (or a `--check` plan)
    SweepReport(SweepReport),
    /// Reference set of a vault
    References(ReferenceReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            imgsweep_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Whether every item of the operation went through
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            OperationResult::SweepReport(report) => !report.has_failures(),
            OperationResult::References(report) => report.failures.is_empty(),
        }
    }
}
