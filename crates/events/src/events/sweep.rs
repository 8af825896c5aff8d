use imgsweep_types::SweepStage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use super::FailureContext;

/// Sweep pipeline events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SweepEvent {
    /// A sweep acquired the run guard and is starting
    Started {
        sweep_id: Uuid,
        vault_root: PathBuf,
        canonical_folder: String,
        dry_run: bool,
    },

    /// The canonical folder did not exist and was created
    FolderCreated { folder: String },

    StageStarted { stage: SweepStage },

    StageCompleted { stage: SweepStage, items: usize },

    /// An image was moved (or would be, in a dry run) into the canonical folder
    ImageMoved {
        from: String,
        to: String,
        renamed: bool,
    },

    /// An unreferenced image was deleted
    ImageDeleted { path: String },

    ReferencesCollected { documents: usize, references: usize },

    /// A single item failed; the sweep continues
    ItemFailed {
        stage: SweepStage,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        failure: FailureContext,
    },

    Completed {
        sweep_id: Uuid,
        moved: usize,
        deleted: usize,
        failures: usize,
        duration_ms: u64,
    },

    /// The sweep aborted before finishing
    Failed {
        sweep_id: Uuid,
        failure: FailureContext,
    },
}
