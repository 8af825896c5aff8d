#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for imgsweep
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/imgsweep/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
pub mod general;
pub mod sweep;

pub use general::GeneralConfig;
pub use sweep::{CollisionPolicy, SweepConfig};

use imgsweep_errors::{ConfigError, Error};
use imgsweep_types::{ColorChoice, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::APP_DIR)
            .join(constants::CONFIG_FILE))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            tracing::debug!("no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: &Option<PathBuf>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // IMGSWEEP_OUTPUT
        if let Ok(output) = std::env::var("IMGSWEEP_OUTPUT") {
            self.general.default_output = match output.as_str() {
                "plain" => OutputFormat::Plain,
                "tty" => OutputFormat::Tty,
                "json" => OutputFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "IMGSWEEP_OUTPUT".to_string(),
                        value: output,
                    }
                    .into())
                }
            };
        }

        // IMGSWEEP_COLOR
        if let Ok(color) = std::env::var("IMGSWEEP_COLOR") {
            self.general.color = match color.as_str() {
                "always" => ColorChoice::Always,
                "auto" => ColorChoice::Auto,
                "never" => ColorChoice::Never,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "IMGSWEEP_COLOR".to_string(),
                        value: color,
                    }
                    .into())
                }
            };
        }

        // IMGSWEEP_VAULT
        if let Ok(vault) = std::env::var("IMGSWEEP_VAULT") {
            if !vault.is_empty() {
                self.sweep.vault_root = Some(PathBuf::from(vault));
            }
        }

        // IMGSWEEP_CANONICAL_FOLDER
        if let Ok(folder) = std::env::var("IMGSWEEP_CANONICAL_FOLDER") {
            self.sweep.canonical_folder = folder;
        }

        // IMGSWEEP_COLLISION_POLICY
        if let Ok(policy) = std::env::var("IMGSWEEP_COLLISION_POLICY") {
            self.sweep.collision_policy =
                policy.parse().map_err(|_| ConfigError::InvalidValue {
                    field: "IMGSWEEP_COLLISION_POLICY".to_string(),
                    value: policy,
                })?;
        }

        // IMGSWEEP_SKIP_HIDDEN
        if let Ok(skip) = std::env::var("IMGSWEEP_SKIP_HIDDEN") {
            self.sweep.skip_hidden = match skip.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "IMGSWEEP_SKIP_HIDDEN".to_string(),
                        value: skip,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }
}
