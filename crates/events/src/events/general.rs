use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Events not tied to one sweep stage: command lifecycle, warnings and
/// debug notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneralEvent {
    Warning {
        message: String,
        context: Option<String>,
    },

    /// Diagnostic note, only rendered with `--debug`
    DebugLog {
        message: String,
        context: BTreeMap<String, String>,
    },

    OperationStarted { operation: String },

    /// `success` is false when some items failed
    OperationCompleted { operation: String, success: bool },

    OperationFailed { operation: String, error: String },
}

impl GeneralEvent {
    pub fn warning_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::DebugLog {
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Debug note with key/value fields, e.g. the effective sweep settings
    pub fn debug_with_context<K, V>(
        message: impl Into<String>,
        context: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::DebugLog {
            message: message.into(),
            context: context
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
