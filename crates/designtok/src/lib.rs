//! # designtok
//!
//! **CLI Binary**
//!
//! This is the entry point for the `designtok` command-line application.
//!
//! ## Responsibilities
//! * Parse command line arguments
//! * Install the stderr log subscriber
//! * Merge flags over the settings file
//! * Dispatch commands and map errors to exit codes
//!
//! This crate should contain minimal business logic.

#![forbid(unsafe_code)]

pub mod cli;
mod commands;
mod error_hints;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "DESIGNTOK_LOG";

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    commands::dispatch(cli)
}

/// Render an error with remediation hints for stderr.
pub fn format_error(err: &anyhow::Error) -> String {
    error_hints::format(err)
}
