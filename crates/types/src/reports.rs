//! Report type definitions for sweeps

use chrono::{DateTime, Utc};
use imgsweep_errors::{SweepError, UserFacingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Pipeline stage a failure or event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStage {
    EnsureFolder,
    Enumerate,
    Relocate,
    ExtractReferences,
    Reap,
}

impl fmt::Display for SweepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnsureFolder => "ensure-folder",
            Self::Enumerate => "enumerate",
            Self::Relocate => "relocate",
            Self::ExtractReferences => "extract-references",
            Self::Reap => "reap",
        };
        f.write_str(name)
    }
}

/// A single image relocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Vault-relative source path
    pub from: String,
    /// Vault-relative destination path
    pub to: String,
    /// Whether the destination name was changed to avoid a collision
    pub renamed: bool,
}

/// A per-item failure recorded while the sweep kept going
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepFailure {
    pub stage: SweepStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

impl SweepFailure {
    #[must_use]
    pub fn from_error(stage: SweepStage, error: &SweepError) -> Self {
        Self {
            stage,
            path: error.item_path().map(str::to_string),
            code: error.user_code().map(str::to_string),
            message: error.user_message().into_owned(),
        }
    }
}

/// Sweep report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepReport {
    /// Identifier shared by every event of this sweep
    pub sweep_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub vault_root: PathBuf,
    pub canonical_folder: String,
    /// No filesystem mutation was performed
    pub dry_run: bool,
    /// The canonical folder did not exist and was created
    pub folder_created: bool,
    /// Recognized images found at the start of the sweep
    pub images_found: usize,
    /// Documents whose content was scanned
    pub documents_scanned: usize,
    /// Distinct normalized references
    pub references: usize,
    pub moved: Vec<MoveRecord>,
    /// Vault-relative paths of deleted orphans
    pub deleted: Vec<String>,
    pub failures: Vec<SweepFailure>,
    /// Total execution time
    pub duration_ms: u64,
}

impl SweepReport {
    #[must_use]
    pub fn new(vault_root: PathBuf, canonical_folder: impl Into<String>, dry_run: bool) -> Self {
        Self {
            sweep_id: Uuid::new_v4(),
            started_at: Utc::now(),
            vault_root,
            canonical_folder: canonical_folder.into(),
            dry_run,
            folder_created: false,
            images_found: 0,
            documents_scanned: 0,
            references: 0,
            moved: Vec::new(),
            deleted: Vec::new(),
            failures: Vec::new(),
            duration_ms: 0,
        }
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Whether the sweep left the tree exactly as it found it
    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.folder_created && self.moved.is_empty() && self.deleted.is_empty()
    }

    /// One-line human summary
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "would move" } else { "moved" };
        let del = if self.dry_run { "would delete" } else { "deleted" };
        let mut line = format!(
            "{verb} {} image(s), {del} {} orphan(s), {} reference(s) in {} document(s)",
            self.moved.len(),
            self.deleted.len(),
            self.references,
            self.documents_scanned
        );
        if self.has_failures() {
            line.push_str(&format!(", {} failure(s)", self.failures.len()));
        }
        line
    }
}
