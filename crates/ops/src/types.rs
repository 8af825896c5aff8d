//! Types for operations and results

use imgsweep_types::SweepFailure;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of the `refs` operation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReferenceReport {
    /// Vault that was scanned
    pub vault_root: PathBuf,
    /// Normalized references, sorted
    pub references: Vec<String>,
    /// Documents that could not be read
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<SweepFailure>,
}

impl ReferenceReport {
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
