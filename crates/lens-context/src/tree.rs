//! The context tree and how it is built from match positions.
//!
//! A context tree shows where in a document each match sits. Its first level holds the
//! outermost headings enclosing the matches (or the matched blocks themselves when no
//! heading precedes them). Each heading holds the headings nested below it that lead to a
//! match. The leaves are the top-level blocks (paragraphs, lists, code, ...) that contain
//! the matches. Siblings are kept in document order and shared ancestors are stored once.

use lens_document::{
    FileStat, HeadingCache, Position, Section, SectionKind, StructureCache, position_from_offsets,
    section_containing,
};
use lens_patch::ContextTreeInput;

use crate::error::ContextError;

/// What a context node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A heading on the path to a match.
    Heading {
        /// Heading level (1-6).
        level: u8,
    },
    /// A top-level block containing matches.
    Section(SectionKind),
    /// The lines of a match that no known block contains.
    Line,
}

/// One node of a context tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextNode {
    /// What the node stands for.
    pub kind: NodeKind,
    /// Where the node is in the document.
    pub position: Position,
    /// Heading text for headings, source text for blocks and lines.
    pub text: String,
    /// Matches located directly in this node, in document order.
    pub matches: Vec<Position>,
    /// Nested nodes, in document order.
    pub children: Vec<Self>,
}

impl ContextNode {
    /// Creates a heading node.
    fn heading(heading: &HeadingCache) -> Self {
        Self::new(
            NodeKind::Heading {
                level: heading.level,
            },
            heading.position,
            heading.heading.clone(),
        )
    }

    /// Creates a block node with the block's source text.
    fn section(section: &Section, content: &str) -> Self {
        Self::new(
            NodeKind::Section(section.kind),
            section.position,
            slice(content, &section.position).to_string(),
        )
    }

    /// Creates a node for the full lines a match spans.
    fn line(position: &Position, content: &str) -> Self {
        let start = content[..position.start.offset]
            .rfind('\n')
            .map_or(0, |idx| idx + 1);
        let end = content[position.end.offset..]
            .find('\n')
            .map_or(content.len(), |idx| position.end.offset + idx);
        let lines = position_from_offsets(content, start, end);
        Self::new(NodeKind::Line, lines, content[start..end].to_string())
    }

    /// Creates a node without matches or children.
    fn new(kind: NodeKind, position: Position, text: String) -> Self {
        Self {
            kind,
            position,
            text,
            matches: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Returns true for heading nodes.
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, NodeKind::Heading { .. })
    }

    /// Returns an iterator over this node and all descendants in pre-order.
    pub fn iter_preorder(&self) -> Preorder<'_> {
        Preorder { stack: vec![self] }
    }

    /// Returns the text to show for this node.
    ///
    /// With `context_lines` of 0, or for headings, the whole text is shown. Otherwise the
    /// text is cut down to the lines holding matches plus `context_lines` lines on each
    /// side, within the node.
    pub fn excerpt(&self, context_lines: usize) -> Excerpt<'_> {
        let whole = Excerpt {
            text: &self.text,
            cut_before: false,
            cut_after: false,
        };
        if context_lines == 0 || self.is_heading() || self.matches.is_empty() {
            return whole;
        }

        let first_line = self.position.start.line;
        let lines: Vec<&str> = self.text.split('\n').collect();
        let last_index = lines.len() - 1;
        let first_match = self
            .matches
            .iter()
            .map(|m| m.start.line.saturating_sub(first_line))
            .min()
            .unwrap_or(0);
        let last_match = self
            .matches
            .iter()
            .map(|m| m.end.line.saturating_sub(first_line))
            .max()
            .unwrap_or(last_index);

        let from = first_match.saturating_sub(context_lines);
        let to = last_match.saturating_add(context_lines).min(last_index);
        if from == 0 && to == last_index {
            return whole;
        }

        // Byte range of lines[from..=to] inside the text.
        let start: usize = lines[..from].iter().map(|l| l.len() + 1).sum();
        let len: usize = lines[from..=to].iter().map(|l| l.len()).sum::<usize>() + (to - from);
        Excerpt {
            text: &self.text[start..start + len],
            cut_before: from > 0,
            cut_after: to < last_index,
        }
    }
}

/// The part of a node's text that is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Excerpt<'a> {
    /// Text to show.
    pub text: &'a str,
    /// Lines above were left out.
    pub cut_before: bool,
    /// Lines below were left out.
    pub cut_after: bool,
}

/// Pre-order traversal of context nodes.
pub struct Preorder<'a> {
    /// Nodes still to visit, next on top.
    stack: Vec<&'a ContextNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ContextNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// The context of every match in one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextTree {
    /// Path of the file.
    pub file_path: String,
    /// File timestamps and size.
    pub stat: FileStat,
    /// Top-level nodes, in document order.
    pub children: Vec<ContextNode>,
}

impl ContextTree {
    /// Creates a tree without nodes.
    pub fn new(file_path: &str, stat: FileStat) -> Self {
        Self {
            file_path: file_path.to_string(),
            stat,
            children: Vec::new(),
        }
    }

    /// Returns an iterator over all nodes in pre-order.
    pub fn iter_preorder(&self) -> impl Iterator<Item = &ContextNode> {
        self.children.iter().flat_map(ContextNode::iter_preorder)
    }

    /// Returns the number of match positions held by the tree.
    pub fn match_count(&self) -> usize {
        self.iter_preorder().map(|n| n.matches.len()).sum()
    }

    /// Returns true if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Builds the context tree for a file's match positions.
///
/// Each position is filed under the chain of headings enclosing it, in the top-level
/// block containing its lines. A match on a heading line is attached to the heading
/// itself. A match outside every block gets a node of its own lines.
pub fn build_context_tree(input: ContextTreeInput<'_>) -> Result<ContextTree, ContextError> {
    let sections =
        input
            .structure
            .sections
            .as_deref()
            .ok_or_else(|| ContextError::MissingStructure {
                file_path: input.file_path.to_string(),
            })?;

    let mut tree = ContextTree::new(input.file_path, input.stat);
    for position in input.positions {
        check_bounds(input.file_contents, position, input.file_path)?;

        let chain = heading_chain(input.structure, position);
        let (leaf, ancestors) = leaf_for(position, &chain, sections, input.file_contents);

        let mut siblings = &mut tree.children;
        for heading in ancestors {
            siblings = &mut upsert(siblings, ContextNode::heading(heading)).children;
        }
        upsert(siblings, leaf).matches.push(*position);
    }
    Ok(tree)
}

/// Headings enclosing `position`, outermost first.
///
/// A heading closes every open heading of the same or a deeper level.
fn heading_chain<'a>(structure: &'a StructureCache, position: &Position) -> Vec<&'a HeadingCache> {
    let mut chain: Vec<&HeadingCache> = Vec::new();
    for heading in structure.headings_before(position) {
        while chain.last().is_some_and(|open| open.level >= heading.level) {
            chain.pop();
        }
        chain.push(heading);
    }
    chain
}

/// Picks the node a match is filed in, and the headings above that node.
fn leaf_for<'c, 'h>(
    position: &Position,
    chain: &'c [&'h HeadingCache],
    sections: &[Section],
    content: &str,
) -> (ContextNode, &'c [&'h HeadingCache]) {
    match section_containing(position, sections) {
        Some(section) if section.kind == SectionKind::Heading => match chain.split_last() {
            Some((heading, above)) if heading.position.start.line == section.position.start.line => {
                (ContextNode::heading(heading), above)
            }
            _ => (ContextNode::section(section, content), chain),
        },
        Some(section) => (ContextNode::section(section, content), chain),
        None => (ContextNode::line(position, content), chain),
    }
}

/// Returns the sibling at `node`'s position, inserting `node` there if there is none.
fn upsert(siblings: &mut Vec<ContextNode>, node: ContextNode) -> &mut ContextNode {
    let idx = match siblings.binary_search_by_key(&node.position, |n| n.position) {
        Ok(idx) => idx,
        Err(idx) => {
            siblings.insert(idx, node);
            idx
        }
    };
    &mut siblings[idx]
}

/// Rejects positions that do not address `content`.
fn check_bounds(content: &str, position: &Position, file_path: &str) -> Result<(), ContextError> {
    let (start, end) = (position.start.offset, position.end.offset);
    if start <= end
        && end <= content.len()
        && content.is_char_boundary(start)
        && content.is_char_boundary(end)
    {
        Ok(())
    } else {
        Err(ContextError::PositionOutOfBounds {
            file_path: file_path.to_string(),
            start,
            end,
            len: content.len(),
        })
    }
}

/// Text of `position` in `content`, or nothing if the structure is stale.
fn slice<'a>(content: &'a str, position: &Position) -> &'a str {
    content
        .get(position.start.offset..position.end.offset)
        .unwrap_or_default()
}
