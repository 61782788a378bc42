//! Level workers.
//!
//! A worker walks its chunk in order, one query at a time. Failed queries
//! are logged and count as zero neighbors; they never stop the chunk.
//! Workers share nothing but the visited set.

use tracing::{debug, warn};

use super::TraversalStats;
use crate::client::NeighborSource;
use crate::visited::VisitedSet;
use crate::NodeId;

/// Nodes a worker was first to discover during one level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkResult {
    /// Newly discovered node ids, in discovery order.
    pub discovered: Vec<NodeId>,
    /// Queries in this chunk that failed.
    pub failed: usize,
}

/// Expands one node: queries its neighbors and appends the ones this call
/// inserted into `visited` to `discovered`.
///
/// Returns `false` if the query failed.
pub async fn expand_node<S>(
    node: &str,
    visited: &dyn VisitedSet,
    source: &S,
    stats: &TraversalStats,
    discovered: &mut Vec<NodeId>,
) -> bool
where
    S: NeighborSource + ?Sized,
{
    stats.add_query();
    let neighbors = match source.fetch_neighbors(node).await {
        Ok(neighbors) => neighbors,
        Err(err) => {
            stats.add_failed_query();
            warn!(node, error = %err, "Neighbor query failed, treating node as a leaf");
            return false;
        }
    };

    stats.add_neighbors_seen(neighbors.len());
    let before = discovered.len();
    for neighbor in neighbors {
        if visited.try_insert(&neighbor) {
            discovered.push(neighbor);
        }
    }
    let added = discovered.len() - before;
    stats.add_nodes_discovered(added);
    debug!(node, added, "Node expanded");
    true
}

/// Processes one chunk of a frontier.
pub async fn process_chunk<S>(
    chunk: &[NodeId],
    visited: &dyn VisitedSet,
    source: &S,
    stats: &TraversalStats,
) -> ChunkResult
where
    S: NeighborSource + ?Sized,
{
    let mut result = ChunkResult::default();
    for node in chunk {
        if !expand_node(node, visited, source, stats, &mut result.discovered).await {
            result.failed += 1;
        }
    }
    result
}
