//! Clap argument definitions for the `lens` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "lens")]
#[command(about = "Hierarchical context views for search results")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Supported `lens` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search files and print the rendered results
    Search(SearchCommand),

    /// Show the structure lens sees in a file
    Inspect(InspectCommand),

    /// Show effective configuration and warnings
    Config,
}

/// Arguments for `lens search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Text to search for (case-insensitive)
    pub query: String,

    /// Markdown or text files to search
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Show results as unlinked mentions, with link actions
    #[arg(long)]
    pub backlinks: bool,

    /// Leave rendering to the host (no context views)
    #[arg(long)]
    pub native: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `lens inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectCommand {
    /// File to inspect
    pub file: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
