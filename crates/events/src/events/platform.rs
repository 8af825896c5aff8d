//! Filesystem operation events

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// What a platform operation touched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOperationContext {
    /// Operation name (e.g. `rename`, `remove_file`)
    pub operation: String,
    /// Path the operation acted on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,
    /// Source path for two-path operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

/// Timing and change summary of a platform operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformOperationMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<String>>,
}

/// Platform operation events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEvent {
    OperationStarted {
        context: PlatformOperationContext,
    },

    OperationCompleted {
        context: PlatformOperationContext,
        #[serde(skip_serializing_if = "Option::is_none")]
        metrics: Option<PlatformOperationMetrics>,
    },

    OperationFailed {
        context: PlatformOperationContext,
        failure: FailureContext,
        #[serde(skip_serializing_if = "Option::is_none")]
        metrics: Option<PlatformOperationMetrics>,
    },
}
