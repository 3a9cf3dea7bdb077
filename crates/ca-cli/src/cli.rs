//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Controller activity auditor.
///
/// Cross-references the facility roster against logged controlling
/// sessions, reports inactive controllers, and can notify or remove them.
#[derive(Debug, Parser)]
#[command(name = "ca", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check and display inactive controllers without taking any action.
    Check {
        /// Emit the classification result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Email an inactivity notice to every inactive controller.
    SendNotices,

    /// Remove inactive controllers from the roster (interactive, destructive).
    Remove,
}
