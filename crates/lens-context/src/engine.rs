//! The markdown context engine plugged into the patcher.

use lens_config::RenderSettings;
use lens_patch::{BoxError, ContextEngine, ContextTreeInput, Disposer, RenderInput};

use crate::{
    dedupe::dedupe_context_tree,
    render::render_context_tree,
    tree::{ContextTree, build_context_tree},
};

/// Lays out matches against a markdown document's headings and blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkdownContextEngine {
    /// Lines shown around matches inside a block (0 shows whole blocks).
    context_lines: usize,
}

impl MarkdownContextEngine {
    /// Creates an engine with the given render settings.
    pub fn new(settings: &RenderSettings) -> Self {
        Self {
            context_lines: settings.context_lines,
        }
    }

    /// Returns the lines shown around matches.
    pub fn context_lines(&self) -> usize {
        self.context_lines
    }
}

impl ContextEngine for MarkdownContextEngine {
    type Tree = ContextTree;

    fn build_tree(&self, input: ContextTreeInput<'_>) -> Result<ContextTree, BoxError> {
        Ok(build_context_tree(input)?)
    }

    fn dedupe_tree(&self, tree: ContextTree) -> ContextTree {
        dedupe_context_tree(tree)
    }

    fn render_tree(&self, input: RenderInput<'_, ContextTree>) -> Result<Disposer, BoxError> {
        Ok(render_context_tree(input, self.context_lines)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_takes_context_lines_from_settings() {
        let engine = MarkdownContextEngine::new(&RenderSettings { context_lines: 3 });
        assert_eq!(engine.context_lines(), 3);
        assert_eq!(MarkdownContextEngine::default().context_lines(), 0);
    }
}
