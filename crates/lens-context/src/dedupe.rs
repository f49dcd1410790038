//! Collapsing redundant branches of a context tree.

use std::mem;

use crate::tree::{ContextNode, ContextTree};

/// Merges redundant branches of a tree.
///
/// - siblings at the same position become one node holding the matches and children of
///   all of them
/// - a match position recorded twice in one node is kept once
/// - headings left with neither matches nor descendants are dropped
///
/// Siblings come out in document order.
pub fn dedupe_context_tree(mut tree: ContextTree) -> ContextTree {
    tree.children = dedupe_nodes(mem::take(&mut tree.children));
    tree
}

/// Dedupes one level of siblings, then each merged node's children.
fn dedupe_nodes(nodes: Vec<ContextNode>) -> Vec<ContextNode> {
    let mut merged: Vec<ContextNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match merged.iter_mut().find(|m| m.position == node.position) {
            Some(existing) => {
                existing.matches.extend(node.matches);
                existing.children.extend(node.children);
            }
            None => merged.push(node),
        }
    }

    for node in &mut merged {
        node.matches.sort_unstable();
        node.matches.dedup();
        node.children = dedupe_nodes(mem::take(&mut node.children));
    }
    merged.retain(|n| !(n.is_heading() && n.matches.is_empty() && n.children.is_empty()));
    merged.sort_by_key(|n| n.position);
    merged
}
