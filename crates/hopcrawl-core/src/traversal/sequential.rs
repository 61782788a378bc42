//! Sequential BFS, the reference the parallel engine is checked against.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::worker::expand_node;
use super::{BfsEngine, TraversalResult, TraversalStats};
use crate::client::NeighborSource;
use crate::config::CrawlerConfig;
use crate::error::Result;
use crate::visited::new_visited_set;
use crate::NodeId;

/// Single-queue BFS with no concurrency.
///
/// Level boundaries come from the queue length recorded at the start of
/// each depth.
#[derive(Debug, Clone)]
pub struct SequentialBfsEngine<S> {
    source: S,
    config: CrawlerConfig,
}

impl<S> SequentialBfsEngine<S>
where
    S: NeighborSource,
{
    /// Creates an engine over `source`.
    #[must_use]
    pub fn new(source: S, config: CrawlerConfig) -> Self {
        Self { source, config }
    }

    /// Runs the traversal. Never fails; the `Result` matches [`BfsEngine`].
    pub async fn run(&self, start: &str, depth: u32) -> Result<(TraversalResult, TraversalStats)> {
        let stats = TraversalStats::new();
        let visited = new_visited_set(self.config.visited_set);
        visited.try_insert(start);
        stats.add_nodes_discovered(1);

        let mut result = TraversalResult::new(start);
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(start.to_owned());

        for d in 0..depth {
            if queue.is_empty() {
                debug!(depth = d, "Queue exhausted");
                break;
            }

            let level_size = queue.len();
            debug!(
                depth = d,
                nodes = level_size,
                source = self.source.source_type(),
                "Expanding level"
            );
            let mut level = Vec::new();
            for _ in 0..level_size {
                let Some(node) = queue.pop_front() else {
                    break;
                };
                let before = level.len();
                expand_node(&node, &*visited, &self.source, &stats, &mut level).await;
                queue.extend(level[before..].iter().cloned());
            }

            if self.config.verbose {
                info!("Level {} found {} unique nodes", d + 1, level.len());
            }
            result.push_level(Arc::from(level));
        }
        result.pad_to_depth(depth);

        Ok((result, stats))
    }
}

#[async_trait]
impl<S> BfsEngine for SequentialBfsEngine<S>
where
    S: NeighborSource,
{
    fn name(&self) -> &'static str {
        "sequential"
    }

    async fn traverse(&self, start: &str, depth: u32) -> Result<(TraversalResult, TraversalStats)> {
        self.run(start, depth).await
    }
}
