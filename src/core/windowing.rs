//! Fixed-count windowing over samples and summaries.
//!
//! [`WindowAccumulator`] is the single grouping algorithm used at every
//! level: it folds units into running per-metric statistics and emits a
//! [`WindowSummary`] the moment exactly `size` units have been pushed. Raw
//! samples and lower-level summaries both implement [`WindowUnit`], so the
//! segment stage and the rollup stage differ only in the unit type and the
//! group size.

use crate::core::summary::{MetricSummary, WindowSummary};
use crate::source::types::{Metric, Sample};
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::debug;

/// Canonical segment size: 15 minutes of one-per-second samples.
pub const SEGMENT_WINDOW_SIZE: NonZeroUsize = match NonZeroUsize::new(15 * 60) {
    Some(n) => n,
    None => unreachable!(),
};

/// An input unit that can be folded into a window.
pub trait WindowUnit {
    fn subject_id(&self) -> i64;
    /// First timestamp covered by this unit.
    fn start(&self) -> i64;
    /// Last timestamp covered by this unit.
    fn end(&self) -> i64;
    /// This unit's contribution for one metric. `avg` is summed and divided
    /// by the unit count; `min`/`max` are folded as extrema.
    fn contribution(&self, metric: Metric) -> MetricSummary;
}

impl WindowUnit for Sample {
    fn subject_id(&self) -> i64 {
        self.subject_id
    }

    fn start(&self) -> i64 {
        self.timestamp
    }

    fn end(&self) -> i64 {
        self.timestamp
    }

    fn contribution(&self, metric: Metric) -> MetricSummary {
        let value = self.value(metric);
        MetricSummary {
            avg: value as f64,
            max: value,
            min: value,
        }
    }
}

impl WindowUnit for WindowSummary {
    fn subject_id(&self) -> i64 {
        self.subject_id
    }

    fn start(&self) -> i64 {
        self.seg_start
    }

    fn end(&self) -> i64 {
        self.seg_end
    }

    fn contribution(&self, metric: Metric) -> MetricSummary {
        self.metric(metric)
    }
}

/// Running sum and extrema for one metric.
#[derive(Debug, Clone, Copy)]
struct RunningStats {
    sum: f64,
    max: i64,
    min: i64,
}

impl RunningStats {
    fn new(first: MetricSummary) -> Self {
        Self {
            sum: first.avg,
            max: first.max,
            min: first.min,
        }
    }

    fn push(&mut self, value: MetricSummary) {
        self.sum += value.avg;
        self.max = self.max.max(value.max);
        self.min = self.min.min(value.min);
    }

    fn finish(&self, count: usize) -> MetricSummary {
        MetricSummary {
            avg: self.sum / count as f64,
            max: self.max,
            min: self.min,
        }
    }
}

/// State of the window currently being filled.
#[derive(Debug, Clone)]
struct OpenWindow {
    subject_id: i64,
    seg_start: i64,
    seg_end: i64,
    count: usize,
    stats: [RunningStats; 3],
}

impl OpenWindow {
    fn new<U: WindowUnit>(unit: &U) -> Self {
        Self {
            subject_id: unit.subject_id(),
            seg_start: unit.start(),
            seg_end: unit.end(),
            count: 1,
            stats: Metric::ALL.map(|m| RunningStats::new(unit.contribution(m))),
        }
    }

    fn push<U: WindowUnit>(&mut self, unit: &U) {
        self.seg_end = unit.end();
        self.count += 1;
        for metric in Metric::ALL {
            self.stats[metric.index()].push(unit.contribution(metric));
        }
    }

    fn finish(self) -> WindowSummary {
        let count = self.count;
        WindowSummary::from_metrics(
            self.subject_id,
            self.seg_start,
            self.seg_end,
            self.stats.map(|s| s.finish(count)),
        )
    }
}

/// Groups consecutive units into non-overlapping windows of a fixed count.
///
/// State is O(1) regardless of window size. A window that never fills is
/// never emitted.
#[derive(Debug, Clone)]
pub struct WindowAccumulator {
    size: NonZeroUsize,
    open: Option<OpenWindow>,
}

impl WindowAccumulator {
    pub fn new(size: NonZeroUsize) -> Self {
        Self { size, open: None }
    }

    /// Number of units buffered in the current, not yet full, window.
    pub fn pending(&self) -> usize {
        self.open.as_ref().map_or(0, |w| w.count)
    }

    /// Fold one unit in; returns the completed summary when the window fills.
    pub fn push<U: WindowUnit>(&mut self, unit: &U) -> Option<WindowSummary> {
        match self.open.as_mut() {
            Some(window) => window.push(unit),
            None => self.open = Some(OpenWindow::new(unit)),
        }

        if self.pending() < self.size.get() {
            return None;
        }
        self.open.take().map(OpenWindow::finish)
    }

    /// Discard the partial window, returning how many units it held.
    pub fn discard_pending(&mut self) -> usize {
        self.open.take().map_or(0, |w| w.count)
    }
}

/// Group `units` into full windows of `size`, dropping any trailing remainder.
pub fn aggregate_windows<'a, U, I>(units: I, size: NonZeroUsize) -> Vec<WindowSummary>
where
    U: WindowUnit + 'a,
    I: IntoIterator<Item = &'a U>,
{
    let mut accumulator = WindowAccumulator::new(size);
    let summaries: Vec<WindowSummary> = units
        .into_iter()
        .filter_map(|unit| accumulator.push(unit))
        .collect();

    let dropped = accumulator.discard_pending();
    if dropped > 0 {
        debug!(dropped, size = size.get(), "dropping partial trailing window");
    }
    summaries
}

/// A sample that cannot be folded into the current window.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    #[error("timestamp went backwards: {current} after {previous}")]
    NonMonotonicTimestamp { previous: i64, current: i64 },

    #[error("sample for subject {found} in a stream for subject {expected}")]
    SubjectMismatch { expected: i64, found: i64 },
}

/// Turns a sample stream into segment summaries, one per full window.
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    accumulator: WindowAccumulator,
    subject_id: Option<i64>,
    last_timestamp: Option<i64>,
    samples_ingested: u64,
    windows_emitted: u64,
}

impl WindowAggregator {
    /// Create an aggregator emitting one summary per `window_size` samples.
    pub fn new(window_size: NonZeroUsize) -> Self {
        Self {
            accumulator: WindowAccumulator::new(window_size),
            subject_id: None,
            last_timestamp: None,
            samples_ingested: 0,
            windows_emitted: 0,
        }
    }

    /// Ingest one sample in arrival order.
    ///
    /// Returns the completed segment on the tick that fills the window and
    /// `None` otherwise. A rejected sample leaves the window untouched.
    pub fn ingest(&mut self, sample: Sample) -> Result<Option<WindowSummary>, IngestError> {
        self.validate(&sample)?;

        self.subject_id.get_or_insert(sample.subject_id);
        self.last_timestamp = Some(sample.timestamp);
        self.samples_ingested += 1;

        let summary = self.accumulator.push(&sample);
        if let Some(ref s) = summary {
            self.windows_emitted += 1;
            debug!(
                seg_start = s.seg_start,
                seg_end = s.seg_end,
                avg_hr = s.avg_hr,
                "segment window closed"
            );
        }
        Ok(summary)
    }

    fn validate(&self, sample: &Sample) -> Result<(), IngestError> {
        if let Some(expected) = self.subject_id {
            if sample.subject_id != expected {
                return Err(IngestError::SubjectMismatch {
                    expected,
                    found: sample.subject_id,
                });
            }
        }
        if let Some(previous) = self.last_timestamp {
            if sample.timestamp < previous {
                return Err(IngestError::NonMonotonicTimestamp {
                    previous,
                    current: sample.timestamp,
                });
            }
        }
        Ok(())
    }

    /// Samples buffered in the current partial window.
    pub fn pending(&self) -> usize {
        self.accumulator.pending()
    }

    pub fn samples_ingested(&self) -> u64 {
        self.samples_ingested
    }

    pub fn windows_emitted(&self) -> u64 {
        self.windows_emitted
    }
}
