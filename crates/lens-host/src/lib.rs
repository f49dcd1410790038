//! A headless host application for lens.
//!
//! The host owns the pieces the augmentation layer intercepts: a component tree whose
//! search and backlinks views hold result lists, result items that render their match
//! children into an element tree, and a notification surface. Behaviour that can be
//! intercepted lives in per-kind prototypes made of [`Hook`] slots.

#![warn(missing_docs)]

mod dom;
mod hook;
mod host;
mod notice;
mod result;
mod vault;
mod view;

pub use dom::Element;
pub use hook::{Behavior, Hook, Uninstaller};
pub use host::Host;
pub use notice::{Notice, Notifier, RecordingNotifier};
pub use result::{
    FileInfo, InfinityScroll, MatchActions, MatchChild, MatchGroup, NewResult, RawMatch,
    ResultItem, ResultItemPrototype, ResultSet, ResultSetPrototype,
};
pub use vault::{Vault, VaultDocument};
pub use view::{Component, ComponentPrototype};

/// Class names the host renders with.
pub mod classes {
    /// A result list.
    pub const RESULTS: &str = "search-results-children";
    /// One result item.
    pub const FILE: &str = "search-result-file";
    /// A result item's title.
    pub const FILE_TITLE: &str = "search-result-file-title";
    /// Container of a result item's match elements.
    pub const FILE_MATCHES: &str = "search-result-file-matches";
    /// One match element.
    pub const MATCH: &str = "search-result-file-match";
    /// Highlighted text inside a native snippet.
    pub const MATCHED_TEXT: &str = "search-result-file-matched-text";
    /// Marks a native snippet taken from a code block.
    pub const CODE_MATCH: &str = "search-result-code-match";
    /// The "link" action of unlinked mentions.
    pub const REPLACE_BUTTON: &str = "search-result-file-match-replace-button";
    /// Hover-revealed actions.
    pub const HOVER_BUTTON: &str = "search-result-hover-button";
}
