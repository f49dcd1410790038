//! The augmentation orchestrator.
//!
//! A [`Patcher`] wraps three host extension points, each of which only becomes reachable
//! through the previous one:
//!
//! 1. the component prototype's `add_child`: the first time a search view (or a
//!    backlinks child) is attached, the result list prototype is wrapped;
//! 2. the result list's `add_result` and `empty_results`: new lists are tracked for
//!    disposal, emptied lists release their mounts, and the first added item gets its
//!    prototype wrapped;
//! 3. the item's `render_content_matches`: after the host has rendered, each item is
//!    augmented at most once.
//!
//! Every step runs the host's own behaviour and returns its result unchanged. Failures
//! are reported and never propagate into the host.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use lens_config::{Config, Settings};
use lens_document::Position;
use lens_host::{
    Component, ComponentPrototype, Element, MatchChild, Notifier, ResultItem, ResultItemPrototype,
    ResultSet, ResultSetPrototype, Uninstaller,
};
use tracing::{debug, warn};

use crate::{
    classify::{DeferReason, ItemPlan, classify, plan_item},
    disposer::DisposerRegistry,
    dom::{ActionClasses, mount_preserving_actions},
    engine::{ContextEngine, ContextTreeInput, RenderInput},
    error::{BoxError, PatchError},
    highlight::{dedupe_highlights, extract_highlight},
    matches::Match,
    report::ErrorReporter,
    tracker::{ExtensionPoint, IdentitySet, PatchFlags},
};

/// Class of the element every context view is rendered into.
pub const MOUNT_CLASS: &str = "lens-context-mount";

/// Failure context for wrapping errors.
const INSTALL_CONTEXT: &str = "Error while patching host internals";

/// What happened to a rendered item, counted for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchStats {
    /// Items that got a context view.
    pub mounted: usize,
    /// Items whose children were trimmed but whose match element was left to the host
    /// (file-name-only hits, skipped file types).
    pub skipped: usize,
    /// Items left entirely to the host.
    pub deferred: usize,
    /// Items whose augmentation failed.
    pub failed: usize,
}

/// How one item's augmentation ended.
enum Outcome {
    /// A context view was mounted.
    Mounted,
    /// The mount step declined the match element.
    Skipped,
    /// The item was left to the host.
    Deferred(DeferReason),
}

/// Intercepts host result rendering and mounts context views.
///
/// Create one with [`Patcher::new`], then call [`Patcher::patch_component`] with the
/// host's component prototype.
pub struct Patcher<E: ContextEngine> {
    /// Builds, collapses and renders trees.
    engine: E,
    /// General settings.
    settings: Settings,
    /// Host actions kept across a mount.
    actions: ActionClasses,
    /// Extension point kinds already claimed.
    flags: PatchFlags,
    /// Items already seen by the render wrapper.
    augmented_items: IdentitySet<ResultItem>,
    /// Match children already considered for a mount.
    mounted_matches: IdentitySet<MatchChild>,
    /// Disposers per result list.
    disposers: DisposerRegistry,
    /// Where failures go.
    reporter: ErrorReporter,
    /// Installed wrappers, removed on unload.
    uninstallers: RefCell<Vec<Uninstaller>>,
    /// Outcome counters.
    stats: Cell<PatchStats>,
    /// Handle to this patcher for the wrappers.
    this: Weak<Self>,
}

impl<E: ContextEngine + 'static> Patcher<E> {
    /// Creates a patcher. Nothing is wrapped until [`Patcher::patch_component`].
    pub fn new(engine: E, config: &Config, notifier: Rc<dyn Notifier>) -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            engine,
            settings: config.settings.clone(),
            actions: ActionClasses::from(&config.dom),
            flags: PatchFlags::default(),
            augmented_items: IdentitySet::new(),
            mounted_matches: IdentitySet::new(),
            disposers: DisposerRegistry::new(),
            reporter: ErrorReporter::new(notifier, config.settings.notice_timeout()),
            uninstallers: RefCell::default(),
            stats: Cell::default(),
            this: this.clone(),
        })
    }

    /// Wraps the component prototype's `add_child`.
    ///
    /// Does nothing when augmentation is disabled or the prototype was already wrapped by
    /// this patcher.
    pub fn patch_component(&self, proto: &ComponentPrototype) {
        if !self.settings.enabled {
            debug!("augmentation disabled, leaving host untouched");
            return;
        }
        if !self.flags.mark_patched(ExtensionPoint::ContainerAttach) {
            return;
        }

        let patcher = self.this.clone();
        let uninstaller = proto.add_child.around(move |old| {
            Rc::new(move |this: &Rc<Component>, child: Rc<Component>| {
                if let Some(patcher) = patcher.upgrade() {
                    patcher.on_add_child(this, &child);
                }
                old(this, child)
            })
        });
        self.keep(uninstaller);
        debug!(point = %ExtensionPoint::ContainerAttach, "wrapped");
    }

    /// Returns the disposer registry.
    pub fn disposers(&self) -> &DisposerRegistry {
        &self.disposers
    }

    /// Returns the error reporter.
    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Returns true once `point` has been claimed.
    pub fn is_patched(&self, point: ExtensionPoint) -> bool {
        self.flags.is_patched(point)
    }

    /// Returns the outcome counters.
    pub fn stats(&self) -> PatchStats {
        self.stats.get()
    }

    /// Removes every wrapper and releases every mount still pending.
    ///
    /// Disposal failures are logged and returned. Items rendered afterwards are left to
    /// the host.
    pub fn unload(&self) -> Vec<PatchError> {
        let uninstallers = self.uninstallers.take();
        for uninstaller in uninstallers.into_iter().rev() {
            debug!(method = uninstaller.name(), "unwrapping");
            uninstaller.uninstall();
        }

        let errors = self.disposers.dispose_all();
        for err in &errors {
            warn!(error = %err, "disposer failed during unload");
        }
        errors
    }

    /// Holds on to an installed wrapper.
    fn keep(&self, uninstaller: Uninstaller) {
        self.uninstallers.borrow_mut().push(uninstaller);
    }

    /// Counts one outcome.
    fn count(&self, update: impl FnOnce(&mut PatchStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    /// Runs before the host attaches `child` to `parent`.
    fn on_add_child(&self, parent: &Rc<Component>, child: &Rc<Component>) {
        let holds_results = parent.is_search_view() || child.backlink_dom().is_some();
        if !holds_results || !self.flags.mark_patched(ExtensionPoint::ResultAdd) {
            return;
        }

        match child.dom().or_else(|| child.backlink_dom()) {
            Some(set) => self.patch_result_set(set.prototype()),
            None => self.reporter.report(
                &PatchError::Installation {
                    point: ExtensionPoint::ResultAdd,
                    reason: String::from("the attached child holds no result list"),
                },
                INSTALL_CONTEXT,
            ),
        }
    }

    /// Wraps `add_result` and `empty_results` of every result list.
    fn patch_result_set(&self, proto: &ResultSetPrototype) {
        let patcher = self.this.clone();
        let add = proto.add_result.around(move |old| {
            Rc::new(move |set: &Rc<ResultSet>, result| {
                let patcher = patcher.upgrade();
                if let Some(patcher) = &patcher {
                    patcher.disposers.on_result_set_created(set);
                }
                let item = old(set, result);
                if let Some(patcher) = &patcher {
                    patcher.on_result_added(&item);
                }
                item
            })
        });

        let patcher = self.this.clone();
        let empty = proto.empty_results.around(move |old| {
            Rc::new(move |set: &Rc<ResultSet>, ()| {
                if let Some(patcher) = patcher.upgrade() {
                    patcher.on_result_set_emptied(set);
                }
                old(set, ());
            })
        });

        self.keep(add);
        self.keep(empty);
        debug!(point = %ExtensionPoint::ResultAdd, "wrapped");
    }

    /// Runs after the host added `item`.
    fn on_result_added(&self, item: &Rc<ResultItem>) {
        if self.flags.mark_patched(ExtensionPoint::ItemRender) {
            self.patch_result_item(item.prototype());
        }
    }

    /// Runs before the host empties `set`.
    fn on_result_set_emptied(&self, set: &Rc<ResultSet>) {
        for err in self.disposers.on_result_set_emptied(set) {
            self.reporter.report(&err, "Failed to release a context view");
        }
    }

    /// Wraps `render_content_matches` of every result item.
    fn patch_result_item(&self, proto: &ResultItemPrototype) {
        let patcher = self.this.clone();
        let render = proto.render_content_matches.around(move |old| {
            Rc::new(move |item: &Rc<ResultItem>, ()| {
                let rendered = old(item, ());
                if let Some(patcher) = patcher.upgrade() {
                    patcher.on_render(item);
                }
                rendered
            })
        });
        self.keep(render);
        debug!(point = %ExtensionPoint::ItemRender, "wrapped");
    }

    /// Runs after the host rendered `item`.
    fn on_render(&self, item: &Rc<ResultItem>) {
        if self.augmented_items.contains(item) {
            return;
        }
        let children = item.children();
        if children.is_empty() {
            return;
        }
        self.augmented_items.insert(item);

        match self.augment(item, &children) {
            Ok(Outcome::Mounted) => self.count(|s| s.mounted += 1),
            Ok(Outcome::Skipped) => self.count(|s| s.skipped += 1),
            Ok(Outcome::Deferred(reason)) => {
                debug!(file = %item.file().path, ?reason, "left to the host");
                self.count(|s| s.deferred += 1);
            }
            Err(err) => {
                self.count(|s| s.failed += 1);
                let context = format!(
                    "Failed to mount context tree for file path: {}",
                    item.file().path
                );
                self.reporter.report(&err, &context);
            }
        }
    }

    /// Classifies the item's children and mounts a context view over the eligible ones.
    fn augment(
        &self,
        item: &Rc<ResultItem>,
        children: &[Rc<MatchChild>],
    ) -> Result<Outcome, PatchError> {
        // Each child is parsed once; the parsed match rides along with it through the plan.
        let classified = children
            .iter()
            .map(|child| {
                let parsed = Match::from_child(child)?;
                let kind = classify(&parsed);
                Ok(((child, parsed), kind))
            })
            .collect::<Result<Vec<_>, PatchError>>()?;

        let (eligible, code) = match plan_item(classified) {
            ItemPlan::Defer(reason) => return Ok(Outcome::Deferred(reason)),
            ItemPlan::Augment { eligible, code } => (eligible, code),
        };
        let Some(first) = eligible.first().map(|(child, _)| Rc::clone(child)) else {
            return Ok(Outcome::Deferred(DeferReason::AllCode));
        };

        let positions: Vec<Position> = eligible.iter().map(|(_, m)| m.position()).collect();
        let highlights = dedupe_highlights(eligible.iter().map(|(_, m)| extract_highlight(m)));

        let set = item.parent().ok_or_else(|| PatchError::Augmentation {
            file_path: item.file().path.clone(),
            source: "the item no longer belongs to a result list".into(),
        })?;

        let mounted = self.mount_context_tree(item, &first, &set, &positions, &highlights)?;

        let mut survivors = Vec::with_capacity(code.len() + 1);
        survivors.push(first);
        survivors.extend(code.into_iter().map(|(child, _)| Rc::clone(child)));
        item.set_children(survivors);

        Ok(if mounted {
            Outcome::Mounted
        } else {
            Outcome::Skipped
        })
    }

    /// Renders a context view into `target`'s element. Returns false when the element is
    /// left to the host.
    fn mount_context_tree(
        &self,
        item: &ResultItem,
        target: &Rc<MatchChild>,
        set: &Rc<ResultSet>,
        positions: &[Position],
        highlights: &[String],
    ) -> Result<bool, PatchError> {
        if !self.mounted_matches.insert(target) {
            return Ok(false);
        }

        let file = item.file();
        if self.settings.skips_extension(&file.extension) {
            debug!(file = %file.path, "file type is never augmented");
            return Ok(false);
        }
        let Some(structure) = target.cache().filter(|c| c.sections.is_some()) else {
            return Ok(false);
        };
        if target.content().is_empty() {
            return Ok(false);
        }

        let augmentation = |source: BoxError| PatchError::Augmentation {
            file_path: file.path.clone(),
            source,
        };

        let tree = self
            .engine
            .build_tree(ContextTreeInput {
                positions,
                file_contents: target.content(),
                stat: file.stat,
                file_path: &file.path,
                structure,
            })
            .map_err(augmentation)?;
        let tree = self.engine.dedupe_tree(tree);

        let mount = Element::div().with_class(MOUNT_CLASS);
        let disposer = self
            .engine
            .render_tree(RenderInput {
                highlights,
                context_tree: tree,
                mount: &mount,
                infinity_scroll: set.infinity_scroll(),
            })
            .map_err(augmentation)?;
        self.disposers.register(set, disposer);

        mount_preserving_actions(target.el(), &mount, &self.actions);
        debug!(file = %file.path, highlights = highlights.len(), "mounted context view");
        Ok(true)
    }
}
