//! Command line interface definition

use clap::{Parser, Subcommand};
use imgsweep_types::ColorChoice;
use std::path::PathBuf;

/// imgsweep - keep a vault's images in one folder
#[derive(Parser)]
#[command(name = "imgsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Collects a notes vault's images into one folder and deletes the unreferenced ones"
)]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to the imgsweep log directory
    #[arg(long, global = true)]
    pub debug: bool,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Move images into the canonical folder and delete unreferenced ones
    Sweep {
        /// Vault root (defaults to the configured vault, then the current directory)
        #[arg(long, value_name = "PATH")]
        vault: Option<PathBuf>,

        /// Show what would be moved and deleted without changing anything
        #[arg(long)]
        check: bool,
    },

    /// List the images referenced by the vault's documents
    Refs {
        /// Vault root (defaults to the configured vault, then the current directory)
        #[arg(long, value_name = "PATH")]
        vault: Option<PathBuf>,
    },
}

impl Commands {
    /// Vault override given on the command line, if any
    pub fn vault(&self) -> Option<&PathBuf> {
        match self {
            Commands::Sweep { vault, .. } | Commands::Refs { vault } => vault.as_ref(),
        }
    }
}
