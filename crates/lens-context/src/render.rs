//! Painting a context tree into an element.

use std::ops::Range;

use lens_host::Element;
use lens_patch::{Disposer, RenderInput};
use tracing::debug;

use crate::{
    error::ContextError,
    tree::{ContextNode, ContextTree, NodeKind},
};

/// Class names the renderer paints with.
pub mod classes {
    /// The tree container.
    pub const TREE: &str = "lens-tree";
    /// A heading on the path to a match.
    pub const HEADING: &str = "lens-heading";
    /// The text line of a heading.
    pub const HEADING_TITLE: &str = "lens-heading-title";
    /// Nodes nested under a heading.
    pub const HEADING_CHILDREN: &str = "lens-heading-children";
    /// A block containing matches.
    pub const SECTION: &str = "lens-section";
    /// Marker for text left out of an excerpt.
    pub const ELLIPSIS: &str = "lens-ellipsis";
    /// A highlighted search term.
    pub const MARK: &str = "lens-mark";
}

/// Attribute set on the mount once its disposer has run.
pub const DISPOSED_ATTR: &str = "data-lens-disposed";

/// Renders `input.context_tree` into `input.mount`.
///
/// Occurrences of the highlight terms are wrapped in `mark` elements, ignoring ASCII
/// case. Blocks are cut down to `context_lines` around their matches (0 shows them
/// whole). The list's layout is invalidated once the tree is in place. The returned
/// disposer empties the mount and flags it as disposed.
pub fn render_context_tree(
    input: RenderInput<'_, ContextTree>,
    context_lines: usize,
) -> Result<Disposer, ContextError> {
    let tree = input.context_tree;
    let mount = input.mount;
    if mount.child_count() > 0 {
        return Err(ContextError::MountNotEmpty {
            file_path: tree.file_path,
            children: mount.child_count(),
        });
    }

    let root = mount.create_child("div", classes::TREE);
    root.set_attr("data-path", &tree.file_path);
    root.set_attr("data-matches", &tree.match_count().to_string());
    for node in &tree.children {
        render_node(&root, node, input.highlights, context_lines);
    }
    input.infinity_scroll.invalidate();
    debug!(file = %tree.file_path, nodes = tree.iter_preorder().count(), "rendered context tree");

    let mount = mount.clone();
    Ok(Disposer::infallible(move || {
        mount.empty();
        mount.set_attr(DISPOSED_ATTR, "true");
    }))
}

/// Renders one node and its descendants under `parent`.
fn render_node(parent: &Element, node: &ContextNode, highlights: &[String], context_lines: usize) {
    match node.kind {
        NodeKind::Heading { level } => {
            let el = parent.create_child("div", classes::HEADING);
            el.set_attr("data-level", &level.to_string());
            let title = el.create_child("div", classes::HEADING_TITLE);
            append_marked(&title, &node.text, highlights);
            if !node.children.is_empty() {
                let children = el.create_child("div", classes::HEADING_CHILDREN);
                for child in &node.children {
                    render_node(&children, child, highlights, context_lines);
                }
            }
        }
        NodeKind::Section(_) | NodeKind::Line => {
            let el = parent.create_child("div", classes::SECTION);
            let kind = match node.kind {
                NodeKind::Section(kind) => kind.as_str(),
                _ => "line",
            };
            el.set_attr("data-kind", kind);
            el.set_attr("data-line", &(node.position.start.line + 1).to_string());

            let excerpt = node.excerpt(context_lines);
            if excerpt.cut_before {
                el.create_child("span", classes::ELLIPSIS).append_text("…");
            }
            append_marked(&el, excerpt.text, highlights);
            if excerpt.cut_after {
                el.create_child("span", classes::ELLIPSIS).append_text("…");
            }
        }
    }
}

/// Appends `text` to `el`, wrapping highlight occurrences in `mark` elements.
fn append_marked(el: &Element, text: &str, highlights: &[String]) {
    let mut cursor = 0;
    for range in mark_ranges(text, highlights) {
        if cursor < range.start {
            el.append_text(&text[cursor..range.start]);
        }
        el.create_child("mark", classes::MARK)
            .append_text(&text[range.clone()]);
        cursor = range.end;
    }
    if cursor < text.len() {
        el.append_text(&text[cursor..]);
    }
}

/// Byte ranges of `text` to mark, sorted and non-overlapping.
///
/// ASCII lower-casing keeps byte offsets aligned with `text`, so every range falls on
/// character boundaries.
fn mark_ranges(text: &str, highlights: &[String]) -> Vec<Range<usize>> {
    let haystack = text.to_ascii_lowercase();
    let haystack = haystack.as_str();
    let mut ranges: Vec<Range<usize>> = highlights
        .iter()
        .filter(|h| !h.is_empty())
        .flat_map(|h| {
            haystack
                .match_indices(h.as_str())
                .map(|(idx, m)| idx..idx + m.len())
        })
        .collect();
    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use lens_document::{FileStat, build_structure, position_from_offsets};
    use lens_host::InfinityScroll;
    use lens_patch::ContextTreeInput;

    use super::*;
    use crate::{dedupe::dedupe_context_tree, tree::build_context_tree};

    fn tree_for(content: &str, needle: &str) -> ContextTree {
        let structure = build_structure(content);
        let positions: Vec<_> = content
            .to_ascii_lowercase()
            .match_indices(needle)
            .map(|(i, m)| position_from_offsets(content, i, i + m.len()))
            .collect();
        let tree = build_context_tree(ContextTreeInput {
            positions: &positions,
            file_contents: content,
            stat: FileStat::default(),
            file_path: "notes.md",
            structure: &structure,
        })
        .unwrap();
        dedupe_context_tree(tree)
    }

    fn render(tree: ContextTree, highlights: &[&str], context_lines: usize) -> (Element, Disposer) {
        let mount = Element::div();
        let scroll = Rc::new(InfinityScroll::default());
        let highlights: Vec<String> = highlights.iter().map(|h| h.to_string()).collect();
        let disposer = render_context_tree(
            RenderInput {
                highlights: &highlights,
                context_tree: tree,
                mount: &mount,
                infinity_scroll: &scroll,
            },
            context_lines,
        )
        .unwrap();
        assert_eq!(scroll.invalidation_count(), 1);
        (mount, disposer)
    }

    #[test]
    fn test_mark_ranges_merge_overlaps() {
        let highlights = vec!["rus".to_string(), "rust".to_string(), "st".to_string()];
        assert_eq!(mark_ranges("Rust and rust", &highlights), vec![0..4, 9..13]);
        assert!(mark_ranges("nothing", &highlights).is_empty());
        assert!(mark_ranges("anything", &[String::new()]).is_empty());
    }

    #[test]
    fn test_append_marked_keeps_text() {
        let el = Element::div();
        append_marked(&el, "Learn Rust, love rust.", &["rust".to_string()]);
        assert_eq!(el.text_content(), "Learn Rust, love rust.");
        let marks = el.query_selector_all(classes::MARK);
        let marked: Vec<String> = marks.iter().map(Element::text_content).collect();
        assert_eq!(marked, vec!["Rust", "rust"]);
        assert!(marks.iter().all(|m| m.tag() == "mark"));
    }

    #[test]
    fn test_renders_heading_chain_and_sections() {
        let content = "# Guide\n\n## Setup\n\nInstall rust first.\n";
        let (mount, _disposer) = render(tree_for(content, "rust"), &["rust"], 0);

        let root = mount.query_selector(classes::TREE).unwrap();
        assert_eq!(root.attr("data-path").as_deref(), Some("notes.md"));
        assert_eq!(root.attr("data-matches").as_deref(), Some("1"));

        let headings = mount.query_selector_all(classes::HEADING);
        let levels: Vec<_> = headings.iter().filter_map(|h| h.attr("data-level")).collect();
        assert_eq!(levels, vec!["1", "2"]);

        let section = mount.query_selector(classes::SECTION).unwrap();
        assert_eq!(section.attr("data-kind").as_deref(), Some("paragraph"));
        assert_eq!(section.attr("data-line").as_deref(), Some("5"));
        assert_eq!(section.text_content(), "Install rust first.");
        assert!(headings[1].contains(&section));
    }

    #[test]
    fn test_excerpt_marked_as_cut() {
        let content = "one\ntwo\nthree rust\nfour\nfive\n";
        let (mount, _disposer) = render(tree_for(content, "rust"), &["rust"], 1);
        let section = mount.query_selector(classes::SECTION).unwrap();
        assert_eq!(section.query_selector_all(classes::ELLIPSIS).len(), 2);
        assert_eq!(section.text_content(), "…two\nthree rust\nfour…");
    }

    #[test]
    fn test_disposer_empties_mount() {
        let content = "rust\n";
        let (mount, disposer) = render(tree_for(content, "rust"), &["rust"], 0);
        assert_eq!(mount.child_count(), 1);

        disposer.dispose().unwrap();
        assert_eq!(mount.child_count(), 0);
        assert_eq!(mount.attr(DISPOSED_ATTR).as_deref(), Some("true"));
    }

    #[test]
    fn test_occupied_mount_rejected() {
        let mount = Element::div();
        mount.append_text("already here");
        let scroll = Rc::new(InfinityScroll::default());
        let err = render_context_tree(
            RenderInput {
                highlights: &[],
                context_tree: tree_for("rust\n", "rust"),
                mount: &mount,
                infinity_scroll: &scroll,
            },
            0,
        )
        .unwrap_err();
        assert!(matches!(err, ContextError::MountNotEmpty { children: 1, .. }));
        assert_eq!(scroll.invalidation_count(), 0);
    }
}
