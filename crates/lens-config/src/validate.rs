//! Configuration validation.
//!
//! Reports settings that load fine but will not do what the user probably wants.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Augmentation is switched off entirely.
    Disabled,
    /// Error notices would disappear immediately.
    ZeroNoticeTimeout,
    /// A DOM class name is empty, so the matching actions can never be found.
    EmptyClassName {
        /// Dotted key of the setting.
        key: &'static str,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "augmentation is disabled (settings.enabled = false)"),
            Self::ZeroNoticeTimeout => {
                write!(f, "settings.notice_timeout_ms is 0; error notices will not be visible")
            }
            Self::EmptyClassName { key } => {
                write!(f, "{key} is empty; those actions will not be preserved")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    let mut warnings = Vec::new();

    if !config.settings.enabled {
        warnings.push(ConfigWarning::Disabled);
    }
    if config.settings.notice_timeout_ms == 0 {
        warnings.push(ConfigWarning::ZeroNoticeTimeout);
    }
    if config.dom.replace_button_class.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyClassName {
            key: "dom.replace_button_class",
        });
    }
    if config.dom.hover_button_class.trim().is_empty() {
        warnings.push(ConfigWarning::EmptyClassName {
            key: "dom.hover_button_class",
        });
    }

    warnings
}
