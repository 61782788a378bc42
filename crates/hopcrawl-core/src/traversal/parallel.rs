//! Parallel level-synchronized BFS.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::{debug, info};

use super::frontier::chunk_ranges;
use super::worker::process_chunk;
use super::{BfsEngine, TraversalResult, TraversalStats};
use crate::client::NeighborSource;
use crate::config::CrawlerConfig;
use crate::error::{Error, Result};
use crate::visited::{new_visited_set, VisitedSet};
use crate::NodeId;

/// Frontier-parallel BFS: each level is split into chunks expanded by
/// concurrent tokio tasks.
///
/// All tasks of a level are joined before the next level is partitioned,
/// so a level is complete before any node of the following level is
/// queried. Each task gets its own clone of the source.
#[derive(Debug, Clone)]
pub struct ParallelBfsEngine<S> {
    source: S,
    config: CrawlerConfig,
}

impl<S> ParallelBfsEngine<S>
where
    S: NeighborSource + Clone + 'static,
{
    /// Creates an engine over `source`.
    #[must_use]
    pub fn new(source: S, config: CrawlerConfig) -> Self {
        Self { source, config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Runs the traversal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Worker`] if a worker task panics or is cancelled.
    /// Failed neighbor queries are not errors.
    pub async fn run(&self, start: &str, depth: u32) -> Result<(TraversalResult, TraversalStats)> {
        let stats = Arc::new(TraversalStats::new());
        let visited: Arc<dyn VisitedSet> = Arc::from(new_visited_set(self.config.visited_set));
        visited.try_insert(start);
        stats.add_nodes_discovered(1);

        let mut result = TraversalResult::new(start);
        let mut frontier: Arc<[NodeId]> = Arc::from(vec![start.to_owned()]);

        for d in 0..depth {
            if frontier.is_empty() {
                debug!(depth = d, "Frontier exhausted");
                break;
            }
            let next = self.expand_level(d, &frontier, &visited, &stats).await?;
            if self.config.verbose {
                info!("Level {} found {} unique nodes", d + 1, next.len());
            }
            frontier = Arc::from(next);
            result.push_level(Arc::clone(&frontier));
        }
        result.pad_to_depth(depth);

        Ok((result, stats.as_ref().clone()))
    }

    /// Expands one level and returns the next frontier.
    async fn expand_level(
        &self,
        depth: u32,
        frontier: &Arc<[NodeId]>,
        visited: &Arc<dyn VisitedSet>,
        stats: &Arc<TraversalStats>,
    ) -> Result<Vec<NodeId>> {
        let ranges = chunk_ranges(frontier.len(), self.config.max_workers);
        let workers = ranges.len();
        if self.config.verbose {
            info!(
                "Level {}: Processing {} nodes with {} workers",
                depth,
                frontier.len(),
                workers
            );
        } else {
            debug!(
                depth,
                nodes = frontier.len(),
                workers,
                source = self.source.source_type(),
                "Expanding level"
            );
        }

        let mut tasks = JoinSet::new();
        for (worker, range) in ranges.into_iter().enumerate() {
            let frontier = Arc::clone(frontier);
            let visited = Arc::clone(visited);
            let stats = Arc::clone(stats);
            let source = self.source.clone();
            tasks.spawn(async move {
                let chunk = &frontier[range];
                let result = process_chunk(chunk, &*visited, &source, &stats).await;
                (worker, result)
            });
        }

        // Barrier: every worker of this level finishes before we return.
        let mut chunks = vec![Vec::new(); workers];
        while let Some(joined) = tasks.join_next().await {
            let (worker, chunk) = joined
                .map_err(|e| Error::Worker(format!("level {depth} worker did not finish: {e}")))?;
            if chunk.failed > 0 {
                debug!(depth, worker, failed = chunk.failed, "Worker had failed queries");
            }
            chunks[worker] = chunk.discovered;
        }

        Ok(chunks.into_iter().flatten().collect())
    }
}

#[async_trait]
impl<S> BfsEngine for ParallelBfsEngine<S>
where
    S: NeighborSource + Clone + 'static,
{
    fn name(&self) -> &'static str {
        "parallel"
    }

    async fn traverse(&self, start: &str, depth: u32) -> Result<(TraversalResult, TraversalStats)> {
        self.run(start, depth).await
    }
}
