//! Level-synchronized breadth-first traversal over a [`NeighborSource`].
//!
//! [`ParallelBfsEngine`] expands each level with concurrent workers and
//! waits for all of them before touching the next level.
//! [`SequentialBfsEngine`] runs the same traversal from a single FIFO queue
//! and is the oracle the parallel engine is checked against.
//!
//! [`NeighborSource`]: crate::client::NeighborSource

mod frontier;
mod parallel;
mod sequential;
mod worker;


pub use frontier::{chunk_ranges, partition, worker_count};
pub use parallel::ParallelBfsEngine;
pub use sequential::SequentialBfsEngine;
pub use worker::{expand_node, process_chunk, ChunkResult};

use std::iter;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use rustc_hash::FxHashSet;

use crate::error::Result;
use crate::NodeId;

/// Common contract of the traversal engines.
#[async_trait]
pub trait BfsEngine: Send + Sync {
    /// Short engine name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Discovers every node reachable from `start` within `depth` hops.
    ///
    /// The result always has `depth + 1` levels; levels past the point where
    /// the graph ran out are empty.
    async fn traverse(&self, start: &str, depth: u32) -> Result<(TraversalResult, TraversalStats)>;
}

/// Nodes discovered at each depth.
///
/// Level 0 is the start node. Levels are pairwise disjoint and immutable
/// once appended. Only explored levels are stored; the empty levels between
/// the point where the graph ran out and the requested depth are implied,
/// so nothing here grows with an unexplored depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalResult {
    levels: Vec<Arc<[NodeId]>>,
    num_levels: usize,
}

impl TraversalResult {
    /// Creates a result holding only level 0.
    #[must_use]
    pub fn new(start: impl Into<NodeId>) -> Self {
        Self {
            levels: vec![Arc::from(vec![start.into()])],
            num_levels: 1,
        }
    }

    pub(crate) fn push_level(&mut self, level: Arc<[NodeId]>) {
        self.levels.push(level);
        self.num_levels = self.num_levels.max(self.levels.len());
    }

    /// Extends the result to `depth + 1` levels without storing the empty
    /// ones.
    pub(crate) fn pad_to_depth(&mut self, depth: u32) {
        while self.levels.len() > 1 && self.levels.last().is_some_and(|l| l.is_empty()) {
            self.levels.pop();
        }
        let wanted = usize::try_from(depth).map_or(usize::MAX, |d| d.saturating_add(1));
        self.num_levels = self.num_levels.max(wanted);
    }

    /// The start node.
    #[must_use]
    pub fn start_node(&self) -> &str {
        &self.levels[0][0]
    }

    /// Number of levels, including level 0.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    /// Number of levels that hold at least one node.
    #[must_use]
    pub fn explored_levels(&self) -> usize {
        self.levels.len()
    }

    /// Nodes discovered at depth `depth`.
    #[must_use]
    pub fn level(&self, depth: usize) -> Option<&[NodeId]> {
        match self.levels.get(depth) {
            Some(level) => Some(level.as_ref()),
            None if depth < self.num_levels => Some(&[]),
            None => None,
        }
    }

    /// Iterates over the levels in depth order.
    pub fn levels(&self) -> impl Iterator<Item = &[NodeId]> {
        let trailing = self.num_levels - self.levels.len();
        self.levels
            .iter()
            .map(AsRef::as_ref)
            .chain(iter::repeat(&[][..]).take(trailing))
    }

    /// Total number of nodes over all levels.
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.levels.iter().map(|level| level.len()).sum()
    }

    /// Depth at which `node` was discovered.
    #[must_use]
    pub fn depth_of(&self, node: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|level| level.iter().any(|n| n == node))
    }

    /// Per-level membership, ignoring order within a level.
    pub fn level_sets(&self) -> impl Iterator<Item = FxHashSet<&str>> {
        self.levels()
            .map(|level| level.iter().map(String::as_str).collect())
    }

    /// Returns `true` if both results have the same nodes at every depth.
    #[must_use]
    pub fn same_membership(&self, other: &Self) -> bool {
        let explored = self.explored_levels().max(other.explored_levels());
        self.num_levels == other.num_levels
            && self
                .level_sets()
                .zip(other.level_sets())
                .take(explored)
                .all(|(a, b)| a == b)
    }

    /// Consumes the result into owned levels.
    pub fn into_levels(self) -> impl Iterator<Item = Vec<NodeId>> {
        let trailing = self.num_levels - self.levels.len();
        self.levels
            .into_iter()
            .map(|level| level.to_vec())
            .chain(iter::repeat_with(Vec::new).take(trailing))
    }
}

/// Counters collected during a traversal.
#[derive(Debug, Default)]
pub struct TraversalStats {
    /// Neighbor queries issued.
    pub queries: AtomicUsize,
    /// Queries that failed and contributed nothing.
    pub failed_queries: AtomicUsize,
    /// Neighbor ids returned over all successful queries.
    pub neighbors_seen: AtomicUsize,
    /// Nodes inserted into the visited set, start node included.
    pub nodes_discovered: AtomicUsize,
}

impl TraversalStats {
    /// Creates new empty stats.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments queries issued (thread-safe).
    pub fn add_query(&self) {
        self.queries.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Increments failed queries (thread-safe).
    pub fn add_failed_query(&self) {
        self.failed_queries.fetch_add(1, AtomicOrdering::Relaxed);
    }

    /// Adds to neighbors seen (thread-safe).
    pub fn add_neighbors_seen(&self, count: usize) {
        self.neighbors_seen.fetch_add(count, AtomicOrdering::Relaxed);
    }

    /// Adds to nodes discovered (thread-safe).
    pub fn add_nodes_discovered(&self, count: usize) {
        self.nodes_discovered
            .fetch_add(count, AtomicOrdering::Relaxed);
    }

    /// Gets total queries issued.
    #[must_use]
    pub fn total_queries(&self) -> usize {
        self.queries.load(AtomicOrdering::Relaxed)
    }

    /// Gets total failed queries.
    #[must_use]
    pub fn total_failed_queries(&self) -> usize {
        self.failed_queries.load(AtomicOrdering::Relaxed)
    }

    /// Gets total neighbors seen.
    #[must_use]
    pub fn total_neighbors_seen(&self) -> usize {
        self.neighbors_seen.load(AtomicOrdering::Relaxed)
    }

    /// Gets total nodes discovered.
    #[must_use]
    pub fn total_nodes_discovered(&self) -> usize {
        self.nodes_discovered.load(AtomicOrdering::Relaxed)
    }
}

impl Clone for TraversalStats {
    fn clone(&self) -> Self {
        Self {
            queries: AtomicUsize::new(self.total_queries()),
            failed_queries: AtomicUsize::new(self.total_failed_queries()),
            neighbors_seen: AtomicUsize::new(self.total_neighbors_seen()),
            nodes_discovered: AtomicUsize::new(self.total_nodes_discovered()),
        }
    }
}
