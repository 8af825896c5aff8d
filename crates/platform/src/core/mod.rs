//! Core platform abstractions and context management

use imgsweep_events::{AppEvent, EventEmitter, EventMeta, EventSender};
use std::sync::Arc;

use crate::filesystem::FilesystemOperations;
use crate::implementations::local::LocalFilesystemOperations;

/// Context for platform operations, providing event emission and correlation
#[derive(Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
    correlation_id: Option<String>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self {
            event_sender,
            correlation_id: None,
        }
    }

    /// Tag every event emitted through this context with `id`
    #[must_use]
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }

    fn enrich_event_meta(&self, _event: &AppEvent, meta: &mut EventMeta) {
        if let Some(id) = &self.correlation_id {
            meta.correlation_id = Some(id.clone());
        }
    }
}

/// Main platform abstraction providing access to filesystem operations
#[derive(Clone)]
pub struct Platform {
    filesystem_ops: Arc<dyn FilesystemOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementation
    #[must_use]
    pub fn new(filesystem_ops: Arc<dyn FilesystemOperations>) -> Self {
        Self { filesystem_ops }
    }

    /// Platform backed by the local disk
    #[must_use]
    pub fn current() -> Self {
        Self::new(Arc::new(LocalFilesystemOperations::new()))
    }

    /// Access filesystem operations
    #[must_use]
    pub fn filesystem(&self) -> &dyn FilesystemOperations {
        &*self.filesystem_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
