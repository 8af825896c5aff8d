//! Platform abstraction layer for vault filesystem access.
//!
//! Every filesystem touch made by a sweep goes through
//! [`FilesystemOperations`], so the pipeline can be driven against the local
//! disk or a test double. Operations that change or read the tree report
//! their start, completion and failure as `Platform` events on the
//! [`PlatformContext`] they are given.

pub mod core;
pub mod filesystem;
pub mod implementations;

pub use crate::core::{Platform, PlatformContext};
pub use filesystem::FilesystemOperations;
pub use implementations::local::LocalFilesystemOperations;
