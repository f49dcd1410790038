//! The host application: shared prototypes and view factories.

use std::rc::Rc;

use crate::{
    result::{MatchActions, ResultItemPrototype, ResultSet, ResultSetPrototype},
    view::{Component, ComponentPrototype},
};

/// The running host.
///
/// Owns one prototype per kind. Every component, result set and result item the host
/// creates shares its kind's prototype, so wrapping a prototype slot affects all of them,
/// including the ones that already exist.
#[derive(Default)]
pub struct Host {
    /// Prototype of all components.
    component: Rc<ComponentPrototype>,
    /// Prototype of all result sets.
    result_set: Rc<ResultSetPrototype>,
    /// Prototype of all result items.
    result_item: Rc<ResultItemPrototype>,
}

impl Host {
    /// Creates a host with native behaviour everywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prototype shared by all components.
    pub fn component_prototype(&self) -> &Rc<ComponentPrototype> {
        &self.component
    }

    /// Creates a detached plain component.
    pub fn component(&self) -> Rc<Component> {
        Rc::new(Component::plain(Rc::clone(&self.component)))
    }

    /// Creates an empty result set.
    pub fn result_set(&self, actions: MatchActions) -> Rc<ResultSet> {
        Rc::new(ResultSet::new(
            Rc::clone(&self.result_set),
            Rc::clone(&self.result_item),
            actions,
        ))
    }

    /// Opens a search view: the view is created, then its results child is attached.
    pub fn open_search_view(&self) -> Rc<Component> {
        let view = Rc::new(Component::search_view(Rc::clone(&self.component)));
        let results = Rc::new(Component::with_dom(
            Rc::clone(&self.component),
            self.result_set(MatchActions::default()),
        ));
        view.add_child(results);
        view
    }

    /// Opens a backlinks view listing unlinked mentions, which carry link actions.
    pub fn open_backlinks_view(&self) -> Rc<Component> {
        let view = self.component();
        let mentions = Rc::new(Component::with_backlink_dom(
            Rc::clone(&self.component),
            self.result_set(MatchActions {
                replace: true,
                hover: true,
            }),
        ));
        view.add_child(mentions);
        view
    }
}
