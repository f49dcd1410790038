//! Components and the views built from them.
//!
//! Every component shares one [`ComponentPrototype`]; attaching a child goes through its
//! `add_child` slot. A search view is a component with a search query whose results
//! child carries a `dom`; a backlinks view attaches a child carrying a `backlink_dom`.

use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
};

use tracing::debug;

use crate::{hook::Hook, result::ResultSet, vault::Vault};

/// Shared behaviour of every component.
pub struct ComponentPrototype {
    /// Attaches a child component and returns it.
    pub add_child: Hook<Rc<Component>, Rc<Component>, Rc<Component>>,
}

impl ComponentPrototype {
    /// Creates the prototype with its native behaviour.
    pub fn new() -> Self {
        Self {
            add_child: Hook::new("addChild", |parent: &Rc<Component>, child: Rc<Component>| {
                parent.children.borrow_mut().push(Rc::clone(&child));
                child
            }),
        }
    }
}

impl Default for ComponentPrototype {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the host's component tree.
pub struct Component {
    /// Shared behaviour of components.
    proto: Rc<ComponentPrototype>,
    /// The current query. Only search views have one.
    search_query: Option<RefCell<String>>,
    /// Result list of a search view's results child.
    dom: Option<Rc<ResultSet>>,
    /// Result list of a backlinks view's child.
    backlink_dom: Option<Rc<ResultSet>>,
    /// Attached children.
    children: RefCell<Vec<Rc<Component>>>,
}

impl Component {
    /// Creates a plain component.
    pub fn plain(proto: Rc<ComponentPrototype>) -> Self {
        Self {
            proto,
            search_query: None,
            dom: None,
            backlink_dom: None,
            children: RefCell::default(),
        }
    }

    /// Creates a search view component (it has a query but no results yet).
    pub fn search_view(proto: Rc<ComponentPrototype>) -> Self {
        Self {
            search_query: Some(RefCell::default()),
            ..Self::plain(proto)
        }
    }

    /// Creates a component holding a search view's result list.
    pub fn with_dom(proto: Rc<ComponentPrototype>, dom: Rc<ResultSet>) -> Self {
        Self {
            dom: Some(dom),
            ..Self::plain(proto)
        }
    }

    /// Creates a component holding a backlinks view's result list.
    pub fn with_backlink_dom(proto: Rc<ComponentPrototype>, dom: Rc<ResultSet>) -> Self {
        Self {
            backlink_dom: Some(dom),
            ..Self::plain(proto)
        }
    }

    /// Returns the shared prototype of components.
    pub fn prototype(&self) -> &Rc<ComponentPrototype> {
        &self.proto
    }

    /// Returns true for search views.
    pub fn is_search_view(&self) -> bool {
        self.search_query.is_some()
    }

    /// Returns the current query of a search view.
    pub fn search_query(&self) -> Option<String> {
        self.search_query.as_ref().map(|q| q.borrow().clone())
    }

    /// Returns the search result list this component holds.
    pub fn dom(&self) -> Option<&Rc<ResultSet>> {
        self.dom.as_ref()
    }

    /// Returns the backlinks result list this component holds.
    pub fn backlink_dom(&self) -> Option<&Rc<ResultSet>> {
        self.backlink_dom.as_ref()
    }

    /// Returns the attached children.
    pub fn children(&self) -> Vec<Rc<Self>> {
        self.children.borrow().clone()
    }

    /// Attaches a child through the prototype.
    pub fn add_child(self: &Rc<Self>, child: Rc<Self>) -> Rc<Self> {
        self.proto.add_child.call(self, child)
    }

    /// Returns the first result list held by this component or its children.
    pub fn result_set(&self) -> Option<Rc<ResultSet>> {
        if let Some(dom) = self.dom.as_ref().or(self.backlink_dom.as_ref()) {
            return Some(Rc::clone(dom));
        }
        self.children.borrow().iter().find_map(|c| c.result_set())
    }

    /// Runs a query against the vault and renders the results.
    ///
    /// The previous results are emptied first. Every hit is added to the result list and
    /// rendered. If rendering invalidated the list layout, every item is rendered once
    /// more, as a virtualised list does on its next layout pass. Returns the number of
    /// items; zero when the component holds no result list.
    pub fn run_search(&self, vault: &Vault, query: &str) -> usize {
        if let Some(q) = &self.search_query {
            q.replace(query.to_string());
        }
        let Some(results) = self.result_set() else {
            return 0;
        };

        results.empty_results();
        let layout = results.infinity_scroll().invalidation_count();
        let hits = vault.search(query);
        debug!(query, hits = hits.len(), "rendering search results");
        for hit in hits {
            let item = results.add_result(hit);
            item.render_content_matches();
        }

        if results.infinity_scroll().invalidation_count() != layout {
            debug!("layout invalidated, rendering again");
            for item in results.items() {
                item.render_content_matches();
            }
        }
        results.items().len()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("search_view", &self.is_search_view())
            .field("has_dom", &self.dom.is_some())
            .field("has_backlink_dom", &self.backlink_dom.is_some())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}
