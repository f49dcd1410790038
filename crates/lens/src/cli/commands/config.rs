//! Implementation of `lens config`.

use std::process::ExitCode;

use lens_config::{CONFIG_FILENAME, is_global_config};
use lens_highlight::{Highlighter, Tone};

use crate::cli::context::CommandContext;

/// Width of the rules framing the settings.
const RULE_WIDTH: usize = 40;

/// Shows where configuration came from, the effective settings and any warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let painter = ctx.painter;
    let config = &ctx.config;

    let toml = match config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", painter.paint(Tone::Title, "Config files"));
    if config.sources.is_empty() {
        let note = format!(
            "no {CONFIG_FILENAME} found from {} upwards, using defaults",
            ctx.cwd.display()
        );
        println!("  {}", painter.paint(Tone::Dim, &note));
    } else {
        for path in &config.sources {
            let scope = if is_global_config(path) { "global" } else { "local" };
            println!(
                "  {} {}",
                path.display(),
                painter.paint(Tone::Dim, &format!("({scope})"))
            );
        }
    }
    println!();

    println!("{}", painter.paint(Tone::Title, "Effective settings"));
    println!("{}", painter.rule(RULE_WIDTH));
    if painter.is_ansi() {
        print!("{}", Highlighter::new().highlight_toml(&toml));
    } else {
        print!("{toml}");
    }
    println!("{}", painter.rule(RULE_WIDTH));

    let warnings = config.validate();
    if !warnings.is_empty() {
        println!();
        let title = format!("Warnings ({})", warnings.len());
        println!("{}", painter.paint(Tone::Warning, &title));
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    ExitCode::SUCCESS
}
