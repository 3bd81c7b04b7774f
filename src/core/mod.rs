//! Core aggregation for vitals rollups.
//!
//! This module contains:
//! - Summary records shared by every rollup level
//! - Fixed-count windowing of samples into segments
//! - Rollup of segments into coarser windows
//! - Normalization of averages for output

pub mod normalize;
pub mod rollup;
pub mod summary;
pub mod windowing;

// Re-export commonly used types
pub use normalize::{normalize, round_half_even, AVERAGE_DECIMALS};
pub use rollup::{rollup, rollup_hourly, HOURLY_GROUP_SIZE};
pub use summary::{MetricSummary, WindowSummary};
pub use windowing::{
    aggregate_windows, IngestError, WindowAccumulator, WindowAggregator, WindowUnit,
    SEGMENT_WINDOW_SIZE,
};
