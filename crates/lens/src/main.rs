//! Command-line interface for lens.
//!
//! Loads documents into a headless host, runs searches through its result views with the
//! augmentation layer installed, and prints what the host ends up showing.

mod cli;

use std::{io, process::ExitCode};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{args::Cli, commands};

/// Environment variable holding the log filter (`debug`, `lens_patch=trace`, ...).
const LOG_ENV: &str = "LENS_LOG";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();
    commands::run(cli.command)
}

/// Sends log events to stderr, at `warn` unless `LENS_LOG` says otherwise.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
