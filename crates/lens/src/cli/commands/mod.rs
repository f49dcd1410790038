//! Command implementations and dispatch.

pub mod config;
pub mod inspect;
pub mod search;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Builds the context a command needs and runs it.
pub fn run(command: Commands) -> ExitCode {
    let ctx = match &command {
        Commands::Inspect(_) => CommandContext::load_cwd_only(),
        Commands::Search(_) | Commands::Config => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    match command {
        Commands::Search(cmd) => search::run(&ctx, &cmd),
        Commands::Inspect(cmd) => inspect::run(&ctx, &cmd),
        Commands::Config => config::run(&ctx),
    }
}
