//! Operations context for dependency injection

use imgsweep_config::Config;
use imgsweep_errors::{Error, OpsError};
use imgsweep_events::{EventEmitter, EventSender};
use imgsweep_platform::Platform;
use imgsweep_reconcile::Sweeper;
use std::path::{Path, PathBuf};

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Sweep pipeline bound to the resolved vault
    pub sweeper: Sweeper,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Effective configuration
    pub config: Config,
}

impl OpsCtx {
    /// Vault this context operates on
    #[must_use]
    pub fn vault_root(&self) -> &Path {
        self.sweeper.vault_root()
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for the operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    platform: Option<Platform>,
    tx: Option<EventSender>,
    config: Option<Config>,
    vault_root: Option<PathBuf>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the platform (defaults to the local disk)
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the vault root from the configuration
    #[must_use]
    pub fn with_vault_root(mut self, root: Option<PathBuf>) -> Self {
        self.vault_root = root;
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if the event sender is missing, the vault root does
    /// not exist, or the sweep configuration is invalid.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event sender".to_string(),
        })?;
        let mut config = self.config.unwrap_or_default();

        if let Some(root) = self.vault_root {
            config.sweep.vault_root = Some(root);
        }
        let vault_root = config.sweep.resolve_vault_root()?;
        tracing::debug!(vault = %vault_root.display(), "resolved vault root");

        let sweeper = Sweeper::builder()
            .with_platform(self.platform.unwrap_or_else(Platform::current))
            .with_config(config.sweep.clone())
            .with_vault_root(vault_root)
            .with_event_sender(tx.clone())
            .build()?;

        Ok(OpsCtx {
            sweeper,
            tx,
            config,
        })
    }
}
