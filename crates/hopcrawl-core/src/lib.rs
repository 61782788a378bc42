//! # hopcrawl core
//!
//! Breadth-first exploration of a graph that is only reachable through a
//! neighbor lookup service. Given a start node and a hop depth, the engines
//! return every node reachable within that depth, grouped by the level at
//! which it was first seen.
//!
//! ## Quick Start
//!
//! ```rust
//! use hopcrawl_core::{CrawlerConfig, ParallelBfsEngine, StaticGraph};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> hopcrawl_core::Result<()> {
//! let graph = StaticGraph::builder()
//!     .edges("A", ["B", "C", "D"])
//!     .edges("B", ["C", "E"])
//!     .build();
//!
//! let engine = ParallelBfsEngine::new(graph, CrawlerConfig::default());
//! let (result, stats) = engine.run("A", 2).await?;
//!
//! assert_eq!(result.num_levels(), 3);
//! assert_eq!(result.level(2), Some(&["E".to_string()][..]));
//! assert_eq!(stats.total_nodes_discovered(), 5);
//! # Ok(())
//! # }
//! ```
//!
//! Against the real service, use [`HttpNeighborClient`] as the source.

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::manual_assert
    )
)]

pub mod client;
pub mod config;
#[cfg(test)]
mod config_tests;
pub mod error;
pub mod traversal;
pub mod visited;

/// Opaque node identifier; compared byte for byte.
pub type NodeId = String;

pub use client::{HttpNeighborClient, NeighborSource, StaticGraph};
pub use config::{CrawlerConfig, VisitedSetKind};
pub use error::{Error, FetchError, Result};
pub use traversal::{
    BfsEngine, ParallelBfsEngine, SequentialBfsEngine, TraversalResult, TraversalStats,
};
pub use visited::{LockedVisitedSet, ShardedVisitedSet, VisitedSet};
