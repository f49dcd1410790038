//! Disposal of mounted fragments, scoped to the result set that shows them.
//!
//! Every mount produces a [`Disposer`]. The registry files it under the owning result
//! set and runs the whole batch when that set is emptied. Result sets are held weakly: a
//! set the host throws away without emptying takes its pending disposers with it, and
//! they are dropped without running.

use std::{cell::RefCell, fmt, mem, rc::Rc};

use lens_host::ResultSet;
use tracing::debug;

use crate::{
    error::{BoxError, PatchError},
    tracker::WeakMap,
};

/// Releases one mounted fragment. Runs at most once.
pub struct Disposer {
    /// The release action.
    run: Box<dyn FnOnce() -> Result<(), BoxError>>,
}

impl Disposer {
    /// Wraps a fallible release action.
    pub fn new(run: impl FnOnce() -> Result<(), BoxError> + 'static) -> Self {
        Self { run: Box::new(run) }
    }

    /// Wraps a release action that cannot fail.
    pub fn infallible(run: impl FnOnce() + 'static) -> Self {
        Self::new(move || {
            run();
            Ok(())
        })
    }

    /// Runs the release action, consuming the disposer.
    pub fn dispose(self) -> Result<(), BoxError> {
        (self.run)()
    }
}

impl fmt::Debug for Disposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Disposer")
    }
}

/// Pending disposers per live result set.
#[derive(Debug, Default)]
pub struct DisposerRegistry {
    /// Disposers in registration order, per result set.
    pending: RefCell<WeakMap<ResultSet, Vec<Disposer>>>,
}

impl DisposerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts tracking `set`. Tracking a set twice keeps its pending disposers.
    pub fn on_result_set_created(&self, set: &Rc<ResultSet>) {
        self.pending.borrow_mut().get_or_default(set);
    }

    /// Files `disposer` under `set`, tracking the set if needed.
    pub fn register(&self, set: &Rc<ResultSet>, disposer: Disposer) {
        self.pending.borrow_mut().get_or_default(set).push(disposer);
    }

    /// Runs every pending disposer of `set` in registration order.
    ///
    /// The batch always runs to the end; failures are collected and returned. A second
    /// call with nothing registered in between runs nothing.
    pub fn on_result_set_emptied(&self, set: &Rc<ResultSet>) -> Vec<PatchError> {
        // Taken out first: a disposer may call back into the registry.
        let batch = self
            .pending
            .borrow_mut()
            .get_mut(set)
            .map(mem::take)
            .unwrap_or_default();

        if !batch.is_empty() {
            debug!(count = batch.len(), "running disposers for emptied result set");
        }
        run_batch(batch)
    }

    /// Number of live result sets being tracked.
    pub fn tracked_sets(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of disposers waiting on `set`.
    pub fn pending(&self, set: &Rc<ResultSet>) -> usize {
        self.pending.borrow().get(set).map_or(0, Vec::len)
    }

    /// Runs the pending disposers of every live set.
    pub fn dispose_all(&self) -> Vec<PatchError> {
        let sets: Vec<Rc<ResultSet>> = self.pending.borrow().iter().map(|(set, _)| set).collect();
        sets.iter()
            .flat_map(|set| self.on_result_set_emptied(set))
            .collect()
    }
}

/// Runs a batch to the end, turning failures into [`PatchError::Disposal`].
fn run_batch(batch: Vec<Disposer>) -> Vec<PatchError> {
    batch
        .into_iter()
        .enumerate()
        .filter_map(|(index, disposer)| {
            disposer
                .dispose()
                .err()
                .map(|source| PatchError::Disposal { index, source })
        })
        .collect()
}
