//! Configuration system for lens.
//!
//! lens reads TOML files named `.lens.toml`. Configuration is resolved by walking up the
//! directory tree from the working directory, collecting any `.lens.toml` files found, then
//! loading `~/.lens.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawDomSettings, RawRenderSettings, RawSettings, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Top-level merged configuration for lens.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Host element class names.
    pub dom: DomSettings,
    /// Context view rendering settings.
    pub render: RenderSettings,
    /// Files the configuration was merged from, highest precedence first.
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.lens.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        Self::load_from_files(&discover_config_files(cwd))
    }

    /// Loads configuration from config file paths given highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings in `.lens.toml` format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            settings: &self.settings,
            dom: &self.dom,
            render: &self.render,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// General settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Whether search results are augmented at all.
    pub enabled: bool,
    /// Lifetime of the error notice, in milliseconds.
    pub notice_timeout_ms: u64,
    /// File extensions (without the dot) that are never augmented.
    pub skip_extensions: Vec<String>,
}

impl Settings {
    /// Lifetime of the error notice.
    pub fn notice_timeout(&self) -> Duration {
        Duration::from_millis(self.notice_timeout_ms)
    }

    /// Whether files with this extension are left as the host renders them.
    pub fn skips_extension(&self, extension: &str) -> bool {
        self.skip_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            notice_timeout_ms: 10_000,
            skip_extensions: vec![String::from("canvas")],
        }
    }
}

/// Class names of host elements that must survive a mount.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DomSettings {
    /// Class of the "link" action shown on unlinked mentions.
    pub replace_button_class: String,
    /// Class of the hover-revealed actions.
    pub hover_button_class: String,
}

impl Default for DomSettings {
    fn default() -> Self {
        Self {
            replace_button_class: String::from("search-result-file-match-replace-button"),
            hover_button_class: String::from("search-result-hover-button"),
        }
    }
}

/// Context view rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Lines of section text kept around each match; 0 keeps the whole section.
    pub context_lines: usize,
}

/// Borrowed view of the settings tables for TOML output.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Host element class names.
    dom: &'a DomSettings,
    /// Context view rendering settings.
    render: &'a RenderSettings,
}
