//! CLI support for the `lens` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod output;
