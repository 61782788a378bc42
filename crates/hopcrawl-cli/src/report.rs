//! Plain-text traversal report written to stdout.

use std::io::{self, Write};
use std::time::Duration;

use hopcrawl_core::{TraversalResult, TraversalStats};

/// Writes every level as a header line followed by one `- id` line per node.
///
/// Streams straight to `out`; a deep crawl can have far more (empty) levels
/// than fit in memory as one string.
pub fn write_levels<W: Write>(out: &mut W, result: &TraversalResult) -> io::Result<()> {
    for (depth, level) in result.levels().enumerate() {
        writeln!(out, "Level {depth} ({} nodes):", level.len())?;
        for node in level {
            writeln!(out, "- {node}")?;
        }
    }
    Ok(())
}

/// Renders the elapsed time line for one engine.
#[must_use]
pub fn render_timing(engine: &str, elapsed: Duration) -> String {
    format!("Time for {engine} crawl: {}s", elapsed.as_secs_f64())
}

/// One-line summary of the query counters.
#[must_use]
pub fn render_stats(stats: &TraversalStats) -> String {
    format!(
        "{} queries ({} failed), {} neighbors seen, {} nodes discovered",
        stats.total_queries(),
        stats.total_failed_queries(),
        stats.total_neighbors_seen(),
        stats.total_nodes_discovered()
    )
}
