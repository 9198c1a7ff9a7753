//! cli
//!
//! Command-line interface for the AtomGit adapter.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Build the adapter from configuration and delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. Every repository command goes through the
//! [`crate::forge::CodeApi`] contract, the same way an embedding host would.

pub mod args;
pub mod commands;

pub use args::Cli;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::ui::output::Verbosity;

/// Flags every command handler sees.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Debug output
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Prompts allowed
    pub interactive: bool,
    /// JSON results
    pub json: bool,
}

impl Context {
    /// Output verbosity for these flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        config: cli.config.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        interactive: cli.interactive(),
        json: cli.json,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(commands::dispatch(cli.command, &ctx))
}

/// Log to stderr. `RUST_LOG` takes precedence; `--debug` falls back to DEBUG.
fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
