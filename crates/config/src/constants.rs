//! Fixed names and locations that are not exposed via TOML configuration

use std::path::PathBuf;

/// Directory name used under the platform config/data directories.
pub const APP_DIR: &str = "imgsweep";

/// Config file name inside `<config_dir>/imgsweep`.
pub const CONFIG_FILE: &str = "config.toml";

/// Canonical image folder used when none is configured.
pub const DEFAULT_CANONICAL_FOLDER: &str = "images";

/// Log directory name inside `<data_dir>/imgsweep`.
pub const LOGS_DIR: &str = "logs";

/// Directory receiving JSON debug logs, if the platform has a data dir.
#[must_use]
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(LOGS_DIR))
}
