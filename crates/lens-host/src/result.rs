//! Search result sets, result items and match children.
//!
//! The structure mirrors a live search pane: a [`ResultSet`] holds one [`ResultItem`] per
//! matching file, and each item holds [`MatchChild`]ren, one per group of nearby matches.
//! Adding results, emptying a set and rendering an item's matches all go through the
//! kind's shared prototype, so they can be wrapped.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use lens_document::{FileStat, SectionKind, StructureCache, position_from_offsets, section_containing};

use crate::{classes, dom::Element, hook::Hook};

/// A file shown in the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Vault-relative path.
    pub path: String,
    /// Lower-case extension without the dot.
    pub extension: String,
    /// File metadata.
    pub stat: FileStat,
}

impl FileInfo {
    /// Returns the file name without directories or extension.
    pub fn basename(&self) -> &str {
        let name = self.path.rsplit('/').next().unwrap_or(&self.path);
        name.rsplit_once('.').map_or(name, |(stem, _)| stem)
    }
}

/// One located occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    /// Byte offset where the occurrence starts in the child's content.
    pub start: usize,
    /// Byte offset where it ends (exclusive).
    pub end: usize,
    /// Property key, present only for front matter matches.
    pub key: Option<String>,
}

impl RawMatch {
    /// A match in the document body.
    pub fn body(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            key: None,
        }
    }

    /// A match in the value of a property.
    pub fn property(key: &str, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            key: Some(key.to_string()),
        }
    }
}

/// A group of matches that will be rendered as one child.
#[derive(Debug, Clone)]
pub struct MatchGroup {
    /// Text the match offsets refer to: the whole file for body matches, the property
    /// value for property matches.
    pub content: Rc<str>,
    /// Matches in this group, in order.
    pub matches: Vec<RawMatch>,
}

/// Arguments for adding a result to a set.
#[derive(Debug, Clone)]
pub struct NewResult {
    /// The matching file.
    pub file: FileInfo,
    /// Structural metadata of the file, when the host has any.
    pub structure: Option<Rc<StructureCache>>,
    /// Match groups in display order.
    pub groups: Vec<MatchGroup>,
}

/// Host-provided affordances rendered next to each match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchActions {
    /// Render the "link" action used by unlinked mentions.
    pub replace: bool,
    /// Render hover-revealed action buttons up front.
    pub hover: bool,
}

/// Virtualised scrolling state of a result list.
#[derive(Debug, Default)]
pub struct InfinityScroll {
    /// Number of layout invalidations requested.
    invalidations: Cell<usize>,
}

impl InfinityScroll {
    /// Requests a layout pass (item heights changed).
    pub fn invalidate(&self) {
        self.invalidations.set(self.invalidations.get() + 1);
    }

    /// Returns how many layout passes were requested.
    pub fn invalidation_count(&self) -> usize {
        self.invalidations.get()
    }
}

/// One rendered group of matches within a result item.
pub struct MatchChild {
    /// Text the match offsets refer to.
    content: Rc<str>,
    /// Located matches; the first one drives classification.
    matches: Vec<RawMatch>,
    /// Structural metadata of the owning file.
    cache: Option<Rc<StructureCache>>,
    /// The element the child renders into. Stable for the child's lifetime.
    el: Element,
    /// Set once the native snippet has been rendered.
    rendered: Cell<bool>,
    /// Affordances to render alongside the snippet.
    actions: MatchActions,
}

impl MatchChild {
    /// Creates a child with a fresh match element.
    pub fn new(
        content: Rc<str>,
        matches: Vec<RawMatch>,
        cache: Option<Rc<StructureCache>>,
        actions: MatchActions,
    ) -> Self {
        Self {
            content,
            matches,
            cache,
            el: Element::div().with_class(classes::MATCH),
            rendered: Cell::new(false),
            actions,
        }
    }

    /// Returns the text the offsets refer to.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the matches.
    pub fn matches(&self) -> &[RawMatch] {
        &self.matches
    }

    /// Returns the structural metadata, if the host has it.
    pub fn cache(&self) -> Option<&StructureCache> {
        self.cache.as_deref()
    }

    /// Returns the match element.
    pub fn el(&self) -> &Element {
        &self.el
    }

    /// Simulates the pointer entering the match: the host adds its hover action lazily,
    /// looking the element up by identity.
    pub fn hover(&self) {
        if self.el.query_selector(classes::HOVER_BUTTON).is_none() {
            self.el
                .create_child("button", classes::HOVER_BUTTON)
                .append_text("copy");
        }
    }

    /// Renders the native snippet once. Later calls leave the element alone, whatever it
    /// contains by then.
    fn render_native(&self) {
        if self.rendered.replace(true) {
            return;
        }

        if let Some(first) = self.matches.first()
            && let Some(key) = &first.key
        {
            self.el.append_text(&format!("{key}: "));
            self.append_marked(0, self.content.len());
        } else if let Some(first) = self.matches.first() {
            let (start, end) = line_bounds(&self.content, first.start, self.last_end());
            if let Some(lang) = self.code_language(first) {
                self.el.add_class(classes::CODE_MATCH);
                self.el.set_attr("data-lang", &lang);
            }
            self.append_marked(start, end);
        }

        if self.actions.replace {
            self.el
                .create_child("button", classes::REPLACE_BUTTON)
                .append_text("link");
        }
        if self.actions.hover {
            self.hover();
        }
    }

    /// End offset of the last match in the group.
    fn last_end(&self) -> usize {
        self.matches.iter().map(|m| m.end).max().unwrap_or(0)
    }

    /// Appends `content[start..end]` with every match wrapped in a matched-text span.
    fn append_marked(&self, start: usize, end: usize) {
        let mut cursor = start;
        for m in &self.matches {
            let (ms, me) = (m.start.clamp(cursor, end), m.end.clamp(cursor, end));
            if ms >= me || !self.content.is_char_boundary(ms) || !self.content.is_char_boundary(me)
            {
                continue;
            }
            if ms > cursor {
                self.el.append_text(&self.content[cursor..ms]);
            }
            self.el
                .create_child("span", classes::MATCHED_TEXT)
                .append_text(&self.content[ms..me]);
            cursor = me;
        }
        if cursor < end && self.content.is_char_boundary(cursor) && self.content.is_char_boundary(end)
        {
            self.el.append_text(&self.content[cursor..end]);
        }
    }

    /// Returns the fence language when the match sits in a code block.
    fn code_language(&self, first: &RawMatch) -> Option<String> {
        let sections = self.cache.as_ref()?.sections.as_ref()?;
        let position = position_from_offsets(&self.content, first.start, first.end);
        let section = section_containing(&position, sections)?;
        if section.kind != SectionKind::Code {
            return None;
        }
        let fence = self.content[section.position.start.offset..]
            .lines()
            .next()
            .unwrap_or_default();
        let lang = fence.trim_start_matches(['`', '~']).trim();
        Some(if lang.is_empty() { "txt" } else { lang }.to_string())
    }
}

impl fmt::Debug for MatchChild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchChild")
            .field("matches", &self.matches)
            .field("has_cache", &self.cache.is_some())
            .finish()
    }
}

/// Expands `[start, end)` to whole lines, clamped to valid char boundaries.
fn line_bounds(content: &str, start: usize, end: usize) -> (usize, usize) {
    let start = start.min(content.len());
    let end = end.clamp(start, content.len());
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);
    let line_end = content[end..].find('\n').map_or(content.len(), |i| end + i);
    (line_start, line_end)
}

/// Shared behaviour of every result item.
pub struct ResultItemPrototype {
    /// Renders the item's match children into its element. Returns how many were rendered.
    pub render_content_matches: Hook<Rc<ResultItem>, (), usize>,
}

impl ResultItemPrototype {
    /// Creates the prototype with its native behaviour.
    pub fn new() -> Self {
        Self {
            render_content_matches: Hook::new("renderContentMatches", |item: &Rc<ResultItem>, ()| {
                item.render_native()
            }),
        }
    }
}

impl Default for ResultItemPrototype {
    fn default() -> Self {
        Self::new()
    }
}

/// One matching file within a result set.
pub struct ResultItem {
    /// Shared behaviour of the kind.
    proto: Rc<ResultItemPrototype>,
    /// The matching file.
    file: FileInfo,
    /// The set this item belongs to.
    parent: Weak<ResultSet>,
    /// Match children in render order.
    children: RefCell<Vec<Rc<MatchChild>>>,
    /// The item's element.
    el: Element,
    /// Container for the match elements.
    matches_el: Element,
}

impl ResultItem {
    /// Creates an item for a new result.
    fn new(
        proto: Rc<ResultItemPrototype>,
        parent: Weak<ResultSet>,
        result: NewResult,
        actions: MatchActions,
    ) -> Self {
        let el = Element::div().with_class(classes::FILE);
        el.create_child("div", classes::FILE_TITLE)
            .append_text(&result.file.path);
        let matches_el = el.create_child("div", classes::FILE_MATCHES);

        let children = result
            .groups
            .into_iter()
            .map(|g| {
                Rc::new(MatchChild::new(
                    g.content,
                    g.matches,
                    result.structure.clone(),
                    actions,
                ))
            })
            .collect();

        Self {
            proto,
            file: result.file,
            parent,
            children: RefCell::new(children),
            el,
            matches_el,
        }
    }

    /// Returns the shared prototype of result items.
    pub fn prototype(&self) -> &Rc<ResultItemPrototype> {
        &self.proto
    }

    /// Returns the matching file.
    pub fn file(&self) -> &FileInfo {
        &self.file
    }

    /// Returns the owning result set, if it is still alive.
    pub fn parent(&self) -> Option<Rc<ResultSet>> {
        self.parent.upgrade()
    }

    /// Returns the current match children.
    pub fn children(&self) -> Vec<Rc<MatchChild>> {
        self.children.borrow().clone()
    }

    /// Replaces the match children.
    pub fn set_children(&self, children: Vec<Rc<MatchChild>>) {
        self.children.replace(children);
    }

    /// Returns the item's element.
    pub fn el(&self) -> &Element {
        &self.el
    }

    /// Renders the match children through the prototype.
    pub fn render_content_matches(self: &Rc<Self>) -> usize {
        self.proto.render_content_matches.call(self, ())
    }

    /// Native rendering: every child renders its snippet once, then the match container
    /// is rebuilt from the current child list.
    fn render_native(&self) -> usize {
        let children = self.children();
        self.matches_el.empty();
        for child in &children {
            child.render_native();
            self.matches_el.append_child(child.el());
        }
        children.len()
    }
}

impl fmt::Debug for ResultItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultItem")
            .field("file", &self.file.path)
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

/// Shared behaviour of every result set.
pub struct ResultSetPrototype {
    /// Adds a result and returns the new item.
    pub add_result: Hook<Rc<ResultSet>, NewResult, Rc<ResultItem>>,
    /// Removes every result.
    pub empty_results: Hook<Rc<ResultSet>, (), ()>,
}

impl ResultSetPrototype {
    /// Creates the prototype with its native behaviour.
    pub fn new() -> Self {
        Self {
            add_result: Hook::new("addResult", |set: &Rc<ResultSet>, result: NewResult| {
                set.add_native(result)
            }),
            empty_results: Hook::new("emptyResults", |set: &Rc<ResultSet>, ()| {
                set.empty_native();
            }),
        }
    }
}

impl Default for ResultSetPrototype {
    fn default() -> Self {
        Self::new()
    }
}

/// The result list of one search or backlinks view.
pub struct ResultSet {
    /// Shared behaviour of result sets.
    proto: Rc<ResultSetPrototype>,
    /// Shared behaviour of the items this set creates.
    item_proto: Rc<ResultItemPrototype>,
    /// The list element.
    el: Element,
    /// Items in insertion order.
    items: RefCell<Vec<Rc<ResultItem>>>,
    /// Virtualised scrolling state.
    infinity_scroll: Rc<InfinityScroll>,
    /// Affordances rendered on each match.
    actions: MatchActions,
}

impl ResultSet {
    /// Creates an empty result set.
    pub fn new(
        proto: Rc<ResultSetPrototype>,
        item_proto: Rc<ResultItemPrototype>,
        actions: MatchActions,
    ) -> Self {
        Self {
            proto,
            item_proto,
            el: Element::div().with_class(classes::RESULTS),
            items: RefCell::default(),
            infinity_scroll: Rc::new(InfinityScroll::default()),
            actions,
        }
    }

    /// Returns the shared prototype of result sets.
    pub fn prototype(&self) -> &Rc<ResultSetPrototype> {
        &self.proto
    }

    /// Returns the list element.
    pub fn el(&self) -> &Element {
        &self.el
    }

    /// Returns the items currently in the set.
    pub fn items(&self) -> Vec<Rc<ResultItem>> {
        self.items.borrow().clone()
    }

    /// Returns the scrolling state.
    pub fn infinity_scroll(&self) -> &Rc<InfinityScroll> {
        &self.infinity_scroll
    }

    /// Adds a result through the prototype.
    pub fn add_result(self: &Rc<Self>, result: NewResult) -> Rc<ResultItem> {
        self.proto.add_result.call(self, result)
    }

    /// Empties the set through the prototype.
    pub fn empty_results(self: &Rc<Self>) {
        self.proto.empty_results.call(self, ());
    }

    /// Native add: creates the item and appends it to the list.
    fn add_native(self: &Rc<Self>, result: NewResult) -> Rc<ResultItem> {
        let item = Rc::new(ResultItem::new(
            Rc::clone(&self.item_proto),
            Rc::downgrade(self),
            result,
            self.actions,
        ));
        self.el.append_child(item.el());
        self.items.borrow_mut().push(Rc::clone(&item));
        item
    }

    /// Native empty: drops every item and clears the list element.
    fn empty_native(&self) {
        self.items.borrow_mut().clear();
        self.el.empty();
        self.infinity_scroll.invalidate();
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("items", &self.items.borrow().len())
            .field("actions", &self.actions)
            .finish()
    }
}
