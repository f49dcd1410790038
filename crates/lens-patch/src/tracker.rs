//! Idempotency bookkeeping.
//!
//! Two kinds of "already done" state guard the patcher against repeated and re-entrant
//! host callbacks: a flag per [`ExtensionPoint`] kind, and identity sets over host
//! instances. Identity maps hold only [`Weak`] references, so tracking an instance never
//! keeps it alive. Because a held `Weak` keeps the allocation itself reserved, a tracked
//! address can never be handed to a new instance while its entry exists.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

/// The host extension points the patcher wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionPoint {
    /// A component attaching a child (where result lists first appear).
    ContainerAttach,
    /// A result list adding or emptying results. Both are wrapped together.
    ResultAdd,
    /// A result item rendering its match children.
    ItemRender,
}

impl ExtensionPoint {
    /// All extension points, outermost first.
    pub const ALL: [Self; 3] = [Self::ContainerAttach, Self::ResultAdd, Self::ItemRender];

    /// Slot of this kind in [`PatchFlags`].
    fn index(self) -> usize {
        match self {
            Self::ContainerAttach => 0,
            Self::ResultAdd => 1,
            Self::ItemRender => 2,
        }
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContainerAttach => "container attach",
            Self::ResultAdd => "result add",
            Self::ItemRender => "item render",
        })
    }
}

/// One "tried to patch" flag per extension point kind.
///
/// A flag is set when patching is first attempted, whether or not the attempt succeeds,
/// so a kind is never wrapped twice.
#[derive(Debug, Default)]
pub struct PatchFlags {
    /// Indexed by [`ExtensionPoint::index`].
    tried: [Cell<bool>; 3],
}

impl PatchFlags {
    /// Claims `point`. Returns true only for the first claim.
    pub fn mark_patched(&self, point: ExtensionPoint) -> bool {
        !self.tried[point.index()].replace(true)
    }

    /// Returns true once `point` has been claimed.
    pub fn is_patched(&self, point: ExtensionPoint) -> bool {
        self.tried[point.index()].get()
    }
}

/// Entry count below which dead entries are never swept.
const MIN_PRUNE_AT: usize = 16;

/// A map keyed by the identity of an `Rc` allocation.
///
/// Dead entries are swept when the map has doubled since the last sweep, so inserts stay
/// amortised O(1).
pub struct WeakMap<K, V> {
    /// Keyed by allocation address.
    entries: HashMap<usize, (Weak<K>, V)>,
    /// Entry count that triggers the next sweep.
    prune_at: usize,
}

impl<K, V> WeakMap<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            prune_at: MIN_PRUNE_AT,
        }
    }

    /// Address of the allocation behind `rc`.
    fn key(rc: &Rc<K>) -> usize {
        Rc::as_ptr(rc).cast::<()>() as usize
    }

    /// Returns the value for `key`, if its entry is live.
    pub fn get(&self, key: &Rc<K>) -> Option<&V> {
        self.entries
            .get(&Self::key(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value for `key`, if its entry is live.
    pub fn get_mut(&mut self, key: &Rc<K>) -> Option<&mut V> {
        self.entries
            .get_mut(&Self::key(key))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, v)| v)
    }

    /// Returns the value for `key`, inserting `V::default()` first if needed.
    pub fn get_or_default(&mut self, key: &Rc<K>) -> &mut V
    where
        V: Default,
    {
        self.maybe_prune();
        &mut self
            .entries
            .entry(Self::key(key))
            .or_insert_with(|| (Rc::downgrade(key), V::default()))
            .1
    }

    /// Inserts or replaces the value for `key`.
    pub fn insert(&mut self, key: &Rc<K>, value: V) -> Option<V> {
        self.maybe_prune();
        self.entries
            .insert(Self::key(key), (Rc::downgrade(key), value))
            .map(|(_, v)| v)
    }

    /// Returns true if `key` has a live entry.
    pub fn contains_key(&self, key: &Rc<K>) -> bool {
        self.get(key).is_some()
    }

    /// Iterates live entries.
    pub fn iter(&self) -> impl Iterator<Item = (Rc<K>, &V)> {
        self.entries
            .values()
            .filter_map(|(weak, v)| weak.upgrade().map(|k| (k, v)))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    /// Returns true if no entry is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops entries whose key has been dropped, along with their values.
    pub fn prune(&mut self) {
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        self.prune_at = (self.entries.len() * 2).max(MIN_PRUNE_AT);
    }

    /// Sweeps dead entries once the map has grown to the threshold.
    fn maybe_prune(&mut self) {
        if self.entries.len() >= self.prune_at {
            self.prune();
        }
    }
}

impl<K, V> Default for WeakMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for WeakMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakMap").field("live", &self.len()).finish()
    }
}

/// A set of instances keyed by identity. There is no removal.
pub struct IdentitySet<K> {
    /// Members, with no payload.
    map: RefCell<WeakMap<K, ()>>,
}

impl<K> IdentitySet<K> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            map: RefCell::new(WeakMap::new()),
        }
    }

    /// Returns true if `key` is in the set.
    pub fn contains(&self, key: &Rc<K>) -> bool {
        self.map.borrow().contains_key(key)
    }

    /// Adds `key`. Returns true if it was not present.
    pub fn insert(&self, key: &Rc<K>) -> bool {
        let mut map = self.map.borrow_mut();
        if map.contains_key(key) {
            return false;
        }
        map.insert(key, ());
        true
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    /// Returns true if no member is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K> Default for IdentitySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> fmt::Debug for IdentitySet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentitySet").field("live", &self.len()).finish()
    }
}
