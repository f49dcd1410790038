//! The seam to the context-tree builder, deduper and renderer.

use std::rc::Rc;

use lens_document::{FileStat, Position, StructureCache};
use lens_host::{Element, InfinityScroll};

use crate::{disposer::Disposer, error::BoxError};

/// Everything the builder needs to lay out one file's matches.
#[derive(Debug, Clone, Copy)]
pub struct ContextTreeInput<'a> {
    /// Positions of the eligible matches, in match order.
    pub positions: &'a [Position],
    /// Full text of the file.
    pub file_contents: &'a str,
    /// File timestamps and size.
    pub stat: FileStat,
    /// Path of the file.
    pub file_path: &'a str,
    /// Structural metadata of the file.
    pub structure: &'a StructureCache,
}

/// Everything the renderer needs to paint a tree.
#[derive(Debug)]
pub struct RenderInput<'a, T> {
    /// Terms to highlight, already lower-cased and deduplicated.
    pub highlights: &'a [String],
    /// The deduplicated context tree.
    pub context_tree: T,
    /// The fresh, empty element to render into.
    pub mount: &'a Element,
    /// Scrolling state of the result list, to invalidate after layout changes.
    pub infinity_scroll: &'a Rc<InfinityScroll>,
}

/// Builds, collapses and renders context trees.
///
/// All three steps are synchronous. A renderer must leave the mount element usable by the
/// caller and return a disposer that releases whatever it set up.
pub trait ContextEngine {
    /// The tree produced by [`ContextEngine::build_tree`].
    type Tree;

    /// Builds the context tree for a file's matches.
    fn build_tree(&self, input: ContextTreeInput<'_>) -> Result<Self::Tree, BoxError>;

    /// Merges redundant branches of a tree.
    fn dedupe_tree(&self, tree: Self::Tree) -> Self::Tree;

    /// Renders a tree into the mount element.
    fn render_tree(&self, input: RenderInput<'_, Self::Tree>) -> Result<Disposer, BoxError>;
}
