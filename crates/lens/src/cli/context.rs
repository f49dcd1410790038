//! Shared context for running CLI commands.

use std::{
    env,
    io::{self, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use lens_config::Config;
use lens_highlight::Painter;

/// Environment variable that turns colored output off when set.
const NO_COLOR_ENV: &str = "NO_COLOR";

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (default if no config files were found).
    pub config: Config,
    /// Styling for stdout.
    pub painter: Painter,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = match Config::load(&cwd) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                return Err(ExitCode::FAILURE);
            }
        };
        Ok(Self {
            cwd,
            config,
            painter: stdout_painter(),
        })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `inspect`, which should work even when a config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
            painter: stdout_painter(),
        })
    }
}

/// Returns the working directory or reports why it is unavailable.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Colors stdout only when it is a terminal and `NO_COLOR` is unset.
fn stdout_painter() -> Painter {
    if io::stdout().is_terminal() && env::var_os(NO_COLOR_ENV).is_none() {
        Painter::ansi()
    } else {
        Painter::plain()
    }
}
