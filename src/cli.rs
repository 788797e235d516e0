//! CLI definitions for the autofill overlay engine.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Autofill overlay CLI.
#[derive(Parser)]
#[command(name = "autofill-overlay")]
#[command(about = "Autofill inline-menu overlay engine")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "AUTOFILL_OVERLAY_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Load and validate the configuration file
    Check,

    /// Replay a frame-tree scenario against in-memory hosts
    Simulate {
        /// Path to the scenario JSON file
        #[arg(short, long)]
        scenario: PathBuf,

        /// Pretty-print the resulting messages
        #[arg(long)]
        pretty: bool,
    },
}
