//! Neighbor sources: everything that can answer "what is adjacent to this
//! node?".
//!
//! [`HttpNeighborClient`] talks to the remote neighbor service.
//! [`StaticGraph`] answers from an in-memory adjacency map and is the
//! deterministic oracle used in tests.

mod http;
mod memory;


pub use http::{parse_neighbors, HttpNeighborClient, NeighborsResponse};
pub use memory::{StaticGraph, StaticGraphBuilder};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::NodeId;

/// Result of a single neighbor query.
pub type FetchResult = std::result::Result<Vec<NodeId>, FetchError>;

/// Resolves one node id to its adjacent node ids.
///
/// Implementations must be safe to call from several workers at once. The
/// engines hand each worker its own clone of the source, so a cheap `Clone`
/// that shares an internally synchronized pool is the expected shape.
#[async_trait]
pub trait NeighborSource: Send + Sync {
    /// Short name used in logs.
    fn source_type(&self) -> &'static str;

    /// Fetches the neighbors of `node`.
    ///
    /// A missing or non-list neighbor field is an empty list, not an error.
    async fn fetch_neighbors(&self, node: &str) -> FetchResult;
}
