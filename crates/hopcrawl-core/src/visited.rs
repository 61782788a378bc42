//! Concurrent visited sets.
//!
//! The visited set is the only structure mutated by more than one worker.
//! Every mutation goes through [`VisitedSet::try_insert`], which tests and
//! inserts in one atomic step: among any number of racing callers for the
//! same id, exactly one gets `true`.

use dashmap::DashSet;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::config::VisitedSetKind;
use crate::NodeId;

/// Atomic check-and-insert set of node ids.
pub trait VisitedSet: Send + Sync {
    /// Inserts `node` if absent. Returns `true` iff this call inserted it.
    fn try_insert(&self, node: &str) -> bool;

    /// Returns whether `node` has been inserted.
    fn contains(&self, node: &str) -> bool;

    /// Number of ids inserted so far.
    fn len(&self) -> usize;

    /// Returns `true` if nothing has been inserted.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visited set guarded by a single mutex.
#[derive(Debug, Default)]
pub struct LockedVisitedSet {
    inner: Mutex<FxHashSet<NodeId>>,
}

impl LockedVisitedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitedSet for LockedVisitedSet {
    fn try_insert(&self, node: &str) -> bool {
        let mut guard = self.inner.lock();
        if guard.contains(node) {
            return false;
        }
        guard.insert(node.to_owned())
    }

    fn contains(&self, node: &str) -> bool {
        self.inner.lock().contains(node)
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}

/// Visited set sharded over several locks.
///
/// An id always hashes to the same shard, so the per-shard insert is the
/// whole critical section.
#[derive(Debug)]
pub struct ShardedVisitedSet {
    inner: DashSet<NodeId, FxBuildHasher>,
}

impl ShardedVisitedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: DashSet::with_hasher(FxBuildHasher),
        }
    }
}

impl Default for ShardedVisitedSet {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitedSet for ShardedVisitedSet {
    fn try_insert(&self, node: &str) -> bool {
        if self.inner.contains(node) {
            return false;
        }
        self.inner.insert(node.to_owned())
    }

    fn contains(&self, node: &str) -> bool {
        self.inner.contains(node)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Creates an empty visited set of the requested kind.
#[must_use]
pub fn new_visited_set(kind: VisitedSetKind) -> Box<dyn VisitedSet> {
    match kind {
        VisitedSetKind::Locked => Box::new(LockedVisitedSet::new()),
        VisitedSetKind::Sharded => Box::new(ShardedVisitedSet::new()),
    }
}
