//! Context trees for lens search results.
//!
//! For each matched file the patcher asks for a context tree: the headings and blocks
//! that surround its matches. This crate builds that tree from a document's structure
//! ([`build_context_tree`]), merges redundant branches ([`dedupe_context_tree`]) and paints
//! it into the host's element tree ([`render_context_tree`]). [`MarkdownContextEngine`]
//! bundles the three for the patcher.

#![warn(missing_docs)]

mod dedupe;
mod engine;
mod error;
mod render;
mod tree;

pub use dedupe::dedupe_context_tree;
pub use engine::MarkdownContextEngine;
pub use error::ContextError;
pub use render::{DISPOSED_ATTR, classes, render_context_tree};
pub use tree::{ContextNode, ContextTree, Excerpt, NodeKind, Preorder, build_context_tree};
