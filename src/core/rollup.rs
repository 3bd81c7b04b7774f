//! Rollup of summaries into coarser windows.
//!
//! A rollup groups consecutive summaries into non-overlapping groups of a
//! fixed size. Extrema are taken over the children's extrema, and averages are
//! the unweighted mean of the children's averages, so a child built from
//! fewer samples carries the same weight as a full one.

use crate::core::summary::WindowSummary;
use crate::core::windowing::aggregate_windows;
use std::num::NonZeroUsize;
use tracing::info;

/// Segments per hourly rollup (four 15-minute segments).
pub const HOURLY_GROUP_SIZE: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(n) => n,
    None => unreachable!(),
};

/// Roll `summaries` up into groups of `group_size`.
///
/// Output order follows input order. A trailing group shorter than
/// `group_size` is dropped.
pub fn rollup(summaries: &[WindowSummary], group_size: NonZeroUsize) -> Vec<WindowSummary> {
    let rolled = aggregate_windows(summaries, group_size);
    info!(
        input = summaries.len(),
        output = rolled.len(),
        dropped = summaries.len() % group_size.get(),
        group_size = group_size.get(),
        "rollup complete"
    );
    rolled
}

/// Roll segments up to hourly summaries.
pub fn rollup_hourly(segments: &[WindowSummary]) -> Vec<WindowSummary> {
    rollup(segments, HOURLY_GROUP_SIZE)
}
