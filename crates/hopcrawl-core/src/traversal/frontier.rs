//! Frontier partitioning.
//!
//! A frontier of `n` nodes is split into `w = min(n, max_workers)`
//! contiguous chunks. The first `n % w` chunks get one extra node, so chunk
//! sizes differ by at most one and concatenating the chunks in order gives
//! back the frontier.

use std::ops::Range;

/// Number of workers for a frontier of `len` nodes.
///
/// Zero only for an empty frontier. A `max_workers` of zero is treated as
/// one.
#[must_use]
pub fn worker_count(len: usize, max_workers: usize) -> usize {
    len.min(max_workers.max(1))
}

/// Index ranges of the chunks for a frontier of `len` nodes.
#[must_use]
pub fn chunk_ranges(len: usize, max_workers: usize) -> Vec<Range<usize>> {
    let workers = worker_count(len, max_workers);
    if workers == 0 {
        return Vec::new();
    }

    let base = len / workers;
    let remainder = len % workers;
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let end = start + base + usize::from(i < remainder);
        ranges.push(start..end);
        start = end;
    }
    debug_assert_eq!(start, len);
    ranges
}

/// Splits `frontier` into at most `max_workers` near-equal contiguous chunks.
#[must_use]
pub fn partition<T>(frontier: &[T], max_workers: usize) -> Vec<&[T]> {
    chunk_ranges(frontier.len(), max_workers)
        .into_iter()
        .map(|range| &frontier[range])
        .collect()
}
