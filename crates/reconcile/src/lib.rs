#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Image housekeeping for a markdown vault
//!
//! A sweep gathers every recognized image into one canonical folder at the
//! vault root and then deletes the images in that folder that no document
//! embeds. It runs as a fixed sequence of stages:
//!
//! 1. ensure the canonical folder exists ([`folder`])
//! 2. list the vault and classify images and documents ([`enumerate`])
//! 3. move images into the canonical folder ([`relocate`])
//! 4. collect normalized image references from documents ([`references`])
//! 5. delete unreferenced images from the canonical folder ([`reap`])
//!
//! [`Sweeper`] drives the stages and reports the outcome as a
//! [`SweepReport`](imgsweep_types::SweepReport).

pub mod enumerate;
pub mod folder;
pub mod reap;
pub mod references;
pub mod relocate;
mod sweeper;

pub use references::{normalize_reference, LinkSyntax, ReferenceExtractor};
pub use relocate::RelocationPlan;
pub use sweeper::{SweepOptions, Sweeper, SweeperBuilder};
