//! In-memory neighbor source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use super::{parse_neighbors, FetchResult, NeighborSource};
use crate::error::FetchError;
use crate::NodeId;

/// Body returned for nodes marked malformed: truncated JSON.
const MALFORMED_BODY: &[u8] = br#"{"node": "?", "neighbors": ["#;

/// Deterministic adjacency map implementing [`NeighborSource`].
///
/// Edges are directed and neighbor order is insertion order. Nodes can be
/// marked as malformed (answer with a parse error) or unavailable (answer
/// with a transport-class error). Every query is recorded in arrival
/// order. Clones share the graph and the query log.
#[derive(Debug, Clone)]
pub struct StaticGraph {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    adjacency: FxHashMap<NodeId, Vec<NodeId>>,
    malformed: FxHashSet<NodeId>,
    unavailable: FxHashSet<NodeId>,
    latency: Option<Duration>,
    query_log: Mutex<Vec<NodeId>>,
}

impl StaticGraph {
    /// Starts building a graph.
    #[must_use]
    pub fn builder() -> StaticGraphBuilder {
        StaticGraphBuilder::default()
    }

    /// Builds a graph from directed edges.
    #[must_use]
    pub fn from_edges<I, A, B>(edges: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<NodeId>,
        B: Into<NodeId>,
    {
        edges
            .into_iter()
            .fold(Self::builder(), |builder, (from, to)| builder.edge(from, to))
            .build()
    }

    /// Returns the stored neighbors of `node`, ignoring failure marks.
    #[must_use]
    pub fn neighbors(&self, node: &str) -> &[NodeId] {
        self.inner
            .adjacency
            .get(node)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Number of queries received for `node`.
    #[must_use]
    pub fn queries_for(&self, node: &str) -> usize {
        self.inner
            .query_log
            .lock()
            .iter()
            .filter(|queried| *queried == node)
            .count()
    }

    /// Total number of queries received.
    #[must_use]
    pub fn total_queries(&self) -> usize {
        self.inner.query_log.lock().len()
    }

    /// Queried node ids in arrival order.
    #[must_use]
    pub fn query_log(&self) -> Vec<NodeId> {
        self.inner.query_log.lock().clone()
    }
}

#[async_trait]
impl NeighborSource for StaticGraph {
    fn source_type(&self) -> &'static str {
        "static"
    }

    async fn fetch_neighbors(&self, node: &str) -> FetchResult {
        self.inner.query_log.lock().push(node.to_owned());

        if let Some(latency) = self.inner.latency {
            tokio::time::sleep(latency).await;
        }

        if self.inner.unavailable.contains(node) {
            return Err(FetchError::Unavailable {
                node: node.to_owned(),
                reason: "marked unavailable".to_string(),
            });
        }
        if self.inner.malformed.contains(node) {
            return parse_neighbors(node, MALFORMED_BODY).map(|parsed| parsed.neighbors);
        }

        Ok(self.neighbors(node).to_vec())
    }
}

/// Builder for [`StaticGraph`].
#[derive(Debug, Default)]
pub struct StaticGraphBuilder {
    adjacency: FxHashMap<NodeId, Vec<NodeId>>,
    malformed: FxHashSet<NodeId>,
    unavailable: FxHashSet<NodeId>,
    latency: Option<Duration>,
}

impl StaticGraphBuilder {
    /// Adds a directed edge `from -> to`.
    #[must_use]
    pub fn edge(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        self.adjacency
            .entry(from.into())
            .or_default()
            .push(to.into());
        self
    }

    /// Adds `from -> to` for every `to` in `targets`.
    #[must_use]
    pub fn edges<I, T>(self, from: impl Into<NodeId>, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<NodeId>,
    {
        let from = from.into();
        targets
            .into_iter()
            .fold(self, |builder, to| builder.edge(from.clone(), to))
    }

    /// Makes queries for `node` fail with a parse error.
    #[must_use]
    pub fn malformed(mut self, node: impl Into<NodeId>) -> Self {
        self.malformed.insert(node.into());
        self
    }

    /// Makes queries for `node` fail with a transport-class error.
    #[must_use]
    pub fn unavailable(mut self, node: impl Into<NodeId>) -> Self {
        self.unavailable.insert(node.into());
        self
    }

    /// Delays every answer by `latency`.
    #[must_use]
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Finishes the graph.
    #[must_use]
    pub fn build(self) -> StaticGraph {
        StaticGraph {
            inner: Arc::new(Inner {
                adjacency: self.adjacency,
                malformed: self.malformed,
                unavailable: self.unavailable,
                latency: self.latency,
                query_log: Mutex::new(Vec::new()),
            }),
        }
    }
}
