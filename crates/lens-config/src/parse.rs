//! Configuration file parsing.
//!
//! Parses individual `.lens.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
/// This mirrors the TOML schema exactly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Element class names the host uses for its match actions.
    pub dom: Option<RawDomSettings>,
    /// Context view rendering settings.
    pub render: Option<RawRenderSettings>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawSettings {
    /// Whether search results are augmented at all.
    pub enabled: Option<bool>,
    /// Lifetime of the error notice, in milliseconds.
    pub notice_timeout_ms: Option<u64>,
    /// File extensions that are never augmented.
    pub skip_extensions: Option<Vec<String>>,
}

/// Raw DOM settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawDomSettings {
    /// Class of the host's "link" action on unlinked mentions.
    pub replace_button_class: Option<String>,
    /// Class of the host's hover-revealed actions.
    pub hover_button_class: Option<String>,
}

/// Raw render settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRenderSettings {
    /// Lines of section text kept around each match (0 keeps the whole section).
    pub context_lines: Option<usize>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&content, path)
}

/// Parses configuration from a string.
///
/// The `path` is used only for error messages.
pub fn parse_config_str(content: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig = toml::from_str(content).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(settings) = &config.settings
        && let Some(extensions) = &settings.skip_extensions
        && let Some(bad) = extensions.iter().find(|e| e.starts_with('.'))
    {
        return Err(ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key: "settings.skip_extensions",
            reason: format!("extension '{bad}' must not start with a dot"),
        });
    }

    Ok(config)
}

/// Checks whether a config file has `root = true`.
///
/// Unreadable or malformed files are treated as non-root; the error surfaces later
/// when the file is parsed for real.
pub fn is_root_config(path: &Path) -> bool {
    parse_config_file(path)
        .map(|c| c.root.unwrap_or(false))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(content: &str) -> Result<RawConfig, ConfigError> {
        parse_config_str(content, &PathBuf::from("test.toml"))
    }

    #[test]
    fn test_parse_empty() {
        let config = parse("").unwrap();
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.dom.is_none());
    }

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"
root = true

[settings]
enabled = false
notice_timeout_ms = 2500
skip_extensions = ["canvas", "excalidraw"]

[dom]
replace_button_class = "link-button"
hover_button_class = "hover-button"

[render]
context_lines = 2
"#,
        )
        .unwrap();

        assert_eq!(config.root, Some(true));
        let settings = config.settings.unwrap();
        assert_eq!(settings.enabled, Some(false));
        assert_eq!(settings.notice_timeout_ms, Some(2500));
        assert_eq!(
            settings.skip_extensions,
            Some(vec!["canvas".to_string(), "excalidraw".to_string()])
        );
        let dom = config.dom.unwrap();
        assert_eq!(dom.replace_button_class.as_deref(), Some("link-button"));
        assert_eq!(config.render.unwrap().context_lines, Some(2));
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse("[settings\nenabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse("[settings]\nenable = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_dotted_extension_rejected() {
        let err = parse("[settings]\nskip_extensions = [\".canvas\"]\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: "settings.skip_extensions", .. }
        ));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("root.toml");
        let plain = dir.path().join("plain.toml");
        fs::write(&root, "root = true\n").unwrap();
        fs::write(&plain, "[settings]\nenabled = true\n").unwrap();

        assert!(is_root_config(&root));
        assert!(!is_root_config(&plain));
        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
