//! A minimal element tree.
//!
//! Elements are shared handles: cloning an [`Element`] clones the handle, not the node, so
//! two handles compare equal under [`Element::ptr_eq`] exactly when they refer to the same
//! node. Nodes know their parent weakly; a detached subtree is freed once the last handle
//! to it goes away.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

/// Tag used for text nodes.
const TEXT_TAG: &str = "#text";

/// Storage behind an element handle.
struct Node {
    /// Tag name (`div`, `span`, ... or `#text`).
    tag: String,
    /// Class list in insertion order.
    classes: RefCell<Vec<String>>,
    /// Attributes.
    attrs: RefCell<BTreeMap<String, String>>,
    /// Text of a text node. Always empty for other nodes.
    text: RefCell<String>,
    /// Child nodes in order.
    children: RefCell<Vec<Element>>,
    /// The node this one is attached to.
    parent: RefCell<Weak<Node>>,
}

/// A handle to a node in the element tree.
#[derive(Clone)]
pub struct Element(Rc<Node>);

impl Element {
    /// Creates a detached element with the given tag.
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(Node {
            tag: tag.to_string(),
            classes: RefCell::default(),
            attrs: RefCell::default(),
            text: RefCell::default(),
            children: RefCell::default(),
            parent: RefCell::default(),
        }))
    }

    /// Creates a detached `div`.
    pub fn div() -> Self {
        Self::new("div")
    }

    /// Creates a detached text node.
    pub fn text(text: &str) -> Self {
        let node = Self::new(TEXT_TAG);
        node.0.text.replace(text.to_string());
        node
    }

    /// Adds a class and returns the element, for building trees inline.
    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Returns true for text nodes.
    pub fn is_text(&self) -> bool {
        self.0.tag == TEXT_TAG
    }

    /// Adds a class if not already present.
    pub fn add_class(&self, class: &str) {
        let mut classes = self.0.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    /// Returns true if the element has the class.
    pub fn has_class(&self, class: &str) -> bool {
        self.0.classes.borrow().iter().any(|c| c == class)
    }

    /// Returns a copy of the class list.
    pub fn classes(&self) -> Vec<String> {
        self.0.classes.borrow().clone()
    }

    /// Sets an attribute.
    pub fn set_attr(&self, name: &str, value: &str) {
        self.0
            .attrs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    /// Returns an attribute value.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.0.attrs.borrow().get(name).cloned()
    }

    /// Returns true if both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Returns the parent element, if attached.
    pub fn parent(&self) -> Option<Self> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    /// Returns handles to the children in order.
    pub fn children(&self) -> Vec<Self> {
        self.0.children.borrow().clone()
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Returns true if `other` is this element or one of its descendants.
    pub fn contains(&self, other: &Self) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node.ptr_eq(self) {
                return true;
            }
            current = node.parent();
        }
        false
    }

    /// Appends `child` as the last child, detaching it from its previous parent first.
    ///
    /// Appending an element to itself or to one of its own descendants is ignored.
    pub fn append_child(&self, child: &Self) {
        if child.contains(self) {
            return;
        }
        child.detach();
        child.0.parent.replace(Rc::downgrade(&self.0));
        self.0.children.borrow_mut().push(child.clone());
    }

    /// Appends a text node.
    pub fn append_text(&self, text: &str) {
        self.append_child(&Self::text(text));
    }

    /// Creates a child element with a class, appends it and returns it.
    pub fn create_child(&self, tag: &str, class: &str) -> Self {
        let child = Self::new(tag).with_class(class);
        self.append_child(&child);
        child
    }

    /// Removes this element from its parent. No-op when detached.
    pub fn detach(&self) {
        let parent = self.0.parent.replace(Weak::new());
        if let Some(parent) = parent.upgrade() {
            parent
                .children
                .borrow_mut()
                .retain(|c| !Rc::ptr_eq(&c.0, &self.0));
        }
    }

    /// Removes all children. The element itself keeps its identity and attributes.
    pub fn empty(&self) {
        let children = self.0.children.take();
        for child in children {
            child.0.parent.replace(Weak::new());
        }
    }

    /// Replaces the children with a single text node.
    pub fn set_text(&self, text: &str) {
        self.empty();
        self.append_text(text);
    }

    /// Returns the concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Appends text content in document order.
    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.0.text.borrow());
        for child in self.0.children.borrow().iter() {
            child.collect_text(out);
        }
    }

    /// Returns the first descendant (pre-order, excluding self) with the class.
    pub fn query_selector(&self, class: &str) -> Option<Self> {
        self.descendants().into_iter().find(|e| e.has_class(class))
    }

    /// Returns all descendants (pre-order, excluding self) with the class.
    pub fn query_selector_all(&self, class: &str) -> Vec<Self> {
        self.descendants()
            .into_iter()
            .filter(|e| e.has_class(class))
            .collect()
    }

    /// Returns all descendants in pre-order, excluding self.
    pub fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }
        out
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_text() {
            return write!(f, "{:?}", self.0.text.borrow());
        }
        write!(f, "<{}", self.0.tag)?;
        let classes = self.0.classes.borrow();
        if !classes.is_empty() {
            write!(f, " class=\"{}\"", classes.join(" "))?;
        }
        write!(f, ">")?;
        f.debug_list().entries(self.0.children.borrow().iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_moves_between_parents() {
        let a = Element::div();
        let b = Element::div();
        let child = Element::new("span");

        a.append_child(&child);
        b.append_child(&child);

        assert_eq!(a.child_count(), 0);
        assert_eq!(b.child_count(), 1);
        assert!(child.parent().unwrap().ptr_eq(&b));
    }

    #[test]
    fn test_empty_keeps_identity_and_detaches_children() {
        let root = Element::div().with_class("root");
        let child = root.create_child("span", "child");
        let handle = root.clone();

        root.empty();

        assert!(handle.ptr_eq(&root));
        assert!(handle.has_class("root"));
        assert_eq!(root.child_count(), 0);
        assert!(child.parent().is_none());
    }

    #[test]
    fn test_query_selector_finds_nested() {
        let root = Element::div();
        let inner = root.create_child("div", "inner");
        let button = inner.create_child("button", "action");
        let second = root.create_child("button", "action");

        assert!(root.query_selector("action").unwrap().ptr_eq(&button));
        let all = root.query_selector_all("action");
        assert_eq!(all.len(), 2);
        assert!(all[1].ptr_eq(&second));
        assert!(root.query_selector("missing").is_none());
    }

    #[test]
    fn test_query_selector_excludes_self() {
        let root = Element::div().with_class("x");
        assert!(root.query_selector("x").is_none());
    }

    #[test]
    fn test_text_content_in_order() {
        let root = Element::div();
        root.append_text("a ");
        root.create_child("mark", "hl").append_text("b");
        root.append_text(" c");
        assert_eq!(root.text_content(), "a b c");

        root.set_text("replaced");
        assert_eq!(root.text_content(), "replaced");
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn test_append_into_descendant_is_ignored() {
        let root = Element::div();
        let child = root.create_child("div", "c");
        child.append_child(&root);
        assert!(root.parent().is_none());
        assert_eq!(child.child_count(), 0);
    }

    #[test]
    fn test_detached_moved_node_is_removed_from_old_subtree() {
        let root = Element::div();
        let wrapper = root.create_child("div", "wrapper");
        let button = wrapper.create_child("button", "b");
        root.empty();

        let target = Element::div();
        target.append_child(&button);
        assert_eq!(wrapper.child_count(), 0);
        assert!(button.parent().unwrap().ptr_eq(&target));
    }
}
