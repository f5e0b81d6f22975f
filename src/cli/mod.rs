//! cli
//!
//! Command-line interface layer for shuffleshard.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load the topology and delegate to the core
//! - Render reports and diagnostics
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap, builds the lattice
//! from the topology file, and calls into [`crate::core`]. Everything it
//! prints goes through [`crate::ui::output`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::PathBuf;

use anyhow::Result;

use crate::ui::output::Verbosity;

/// Execution context built from global flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit topology file
    pub config: Option<PathBuf>,
    /// Debug logging enabled
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Reports as JSON
    pub json: bool,
}

impl Context {
    /// Output verbosity for this invocation.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = Context {
        config: cli.config.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        json: cli.json,
    };

    commands::dispatch(cli.command, &ctx)
}
