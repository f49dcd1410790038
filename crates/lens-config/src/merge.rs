//! Configuration merging.
//!
//! Folds several `RawConfig` files into one [`Config`]. Scalars take the value from the
//! highest-precedence file that sets them; lists replace rather than concatenate.

use std::path::PathBuf;

use crate::{
    Config, DomSettings, RenderSettings, Settings,
    parse::{RawConfig, RawDomSettings, RawRenderSettings, RawSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges configuration files given in precedence order (highest first).
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut config = Config::default();

    // Lowest precedence first so later writes win.
    for parsed in configs.iter().rev() {
        if let Some(raw) = &parsed.config.settings {
            apply_settings(&mut config.settings, raw);
        }
        if let Some(raw) = &parsed.config.dom {
            apply_dom(&mut config.dom, raw);
        }
        if let Some(raw) = &parsed.config.render {
            apply_render(&mut config.render, raw);
        }
    }

    config.sources = configs.iter().map(|c| c.path.clone()).collect();
    config
}

/// Overlays the general settings a file sets.
fn apply_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(v) = raw.enabled {
        result.enabled = v;
    }
    if let Some(v) = raw.notice_timeout_ms {
        result.notice_timeout_ms = v;
    }
    if let Some(v) = &raw.skip_extensions {
        result.skip_extensions.clone_from(v);
    }
}

/// Overlays the DOM class names a file sets.
fn apply_dom(result: &mut DomSettings, raw: &RawDomSettings) {
    if let Some(v) = &raw.replace_button_class {
        result.replace_button_class.clone_from(v);
    }
    if let Some(v) = &raw.hover_button_class {
        result.hover_button_class.clone_from(v);
    }
}

/// Overlays the render settings a file sets.
fn apply_render(result: &mut RenderSettings, raw: &RawRenderSettings) {
    if let Some(v) = raw.context_lines {
        result.context_lines = v;
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::parse::parse_config_str;

    fn parsed(path: &str, content: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(content, Path::new(path)).unwrap(),
        }
    }

    #[test]
    fn test_merge_empty_is_default() {
        let config = merge_configs(&[]);
        assert!(config.settings.enabled);
        assert_eq!(config.settings.notice_timeout_ms, 10_000);
        assert!(config.sources.is_empty());
    }

    #[test]
    fn test_closest_file_wins() {
        let configs = [
            parsed("/vault/.lens.toml", "[settings]\nnotice_timeout_ms = 500\n"),
            parsed(
                "/home/.lens.toml",
                "[settings]\nnotice_timeout_ms = 9000\nenabled = false\n",
            ),
        ];
        let config = merge_configs(&configs);

        assert_eq!(config.settings.notice_timeout_ms, 500);
        // Only the global file sets it, so it still applies.
        assert!(!config.settings.enabled);
        assert_eq!(config.sources.len(), 2);
    }

    #[test]
    fn test_lists_replace() {
        let configs = [
            parsed("/a/.lens.toml", "[settings]\nskip_extensions = [\"pdf\"]\n"),
            parsed("/.lens.toml", "[settings]\nskip_extensions = [\"canvas\"]\n"),
        ];
        let config = merge_configs(&configs);
        assert_eq!(config.settings.skip_extensions, vec!["pdf".to_string()]);
    }

    #[test]
    fn test_dom_and_render_sections() {
        let configs = [parsed(
            "/a/.lens.toml",
            "[dom]\nhover_button_class = \"hover\"\n[render]\ncontext_lines = 3\n",
        )];
        let config = merge_configs(&configs);
        assert_eq!(config.dom.hover_button_class, "hover");
        assert_eq!(
            config.dom.replace_button_class,
            DomSettings::default().replace_button_class
        );
        assert_eq!(config.render.context_lines, 3);
    }
}
