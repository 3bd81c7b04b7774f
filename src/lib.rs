//! Vitals Rollup - windowed summaries of physiological sensor readings.
//!
//! This library turns a per-second stream of heart rate, respiration rate and
//! activity readings for one subject into fixed 15-minute segment summaries,
//! and rolls those segments up into hourly summaries without touching the
//! raw samples again.
//!
//! # Guarantees
//!
//! - **Full windows only**: a window is emitted when exactly `window_size`
//!   units have arrived; a partial trailing window is dropped
//! - **Bounded state**: windowing keeps running sums and extrema, not samples
//! - **Ordered statistics**: `min <= avg <= max` for every metric at every level
//! - **Pure rollups**: rollup and normalization never mutate their input
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Vitals Rollup                           │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐             │
//! │  │   Source    │──▶│  Windowing  │──▶│   Rollup    │             │
//! │  │ (1 Hz feed) │   │ (900 ticks) │   │ (4 segments)│             │
//! │  └─────────────┘   └─────────────┘   └─────────────┘             │
//! │                           │                 │                    │
//! │                           ▼                 ▼                    │
//! │                    ┌─────────────────────────────┐               │
//! │                    │  Normalize ──▶ Export       │               │
//! │                    └─────────────────────────────┘               │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use vitals_rollup::core::{normalize, rollup, WindowAggregator};
//! use vitals_rollup::source::Sample;
//!
//! let mut aggregator = WindowAggregator::new(NonZeroUsize::new(4).unwrap());
//! let mut segments = Vec::new();
//! for (t, hr) in [40, 50, 60, 70, 80, 90, 100, 110].into_iter().enumerate() {
//!     let sample = Sample::new(1, t as i64, hr, 12, 0);
//!     if let Some(segment) = aggregator.ingest(sample).unwrap() {
//!         segments.push(segment);
//!     }
//! }
//!
//! let hourly = normalize(&rollup(&segments, NonZeroUsize::new(2).unwrap()));
//! assert_eq!(hourly[0].avg_hr, 75.0);
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod pipeline;
pub mod report;
pub mod source;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, OutputFiles};
pub use crate::core::{
    normalize, rollup, IngestError, WindowAccumulator, WindowAggregator, WindowSummary,
};
pub use export::{write_run, ExportError, RunPaths};
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
pub use report::RunReport;
pub use source::{Sample, SampleSource, SimulatedSource, SimulationConfig, VecSource};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
