//! End-to-end batch pipeline.
//!
//! Drives a [`SampleSource`] through segment windowing, hourly rollup and
//! normalization, in that order, on the calling thread.

use crate::config::Config;
use crate::core::{normalize, rollup, IngestError, WindowAggregator, WindowSummary};
use crate::report::RunReport;
use crate::source::{Sample, SampleSource};
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing::{debug, info};

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Raw samples in arrival order (empty when retention is disabled)
    pub samples: Vec<Sample>,
    /// Whether the run kept its raw samples
    pub samples_retained: bool,
    /// Normalized segment summaries
    pub segments: Vec<WindowSummary>,
    /// Normalized rollup summaries
    pub hourly: Vec<WindowSummary>,
    pub report: RunReport,
}

/// Errors that stop a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sample #{index} rejected: {source}")]
    Ingest {
        index: u64,
        #[source]
        source: IngestError,
    },
}

/// Segment-then-rollup aggregation pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    window_size: NonZeroUsize,
    group_size: NonZeroUsize,
    retain_samples: bool,
}

impl Pipeline {
    pub fn new(window_size: NonZeroUsize, group_size: NonZeroUsize) -> Self {
        Self {
            window_size,
            group_size,
            retain_samples: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.window_size, config.rollup_group_size)
    }

    /// Whether raw samples are kept in the output for persistence.
    pub fn retain_samples(mut self, retain: bool) -> Self {
        self.retain_samples = retain;
        self
    }

    /// Consume `source` and produce both summary levels.
    pub fn run<S: SampleSource>(&self, source: &mut S) -> Result<PipelineOutput, PipelineError> {
        let mut report = RunReport::begin(self.window_size.get(), self.group_size.get());
        let mut aggregator = WindowAggregator::new(self.window_size);
        let mut samples = Vec::new();
        let mut segments = Vec::new();

        if self.retain_samples {
            samples.reserve(source.remaining().unwrap_or(0));
        }

        for sample in source.iter() {
            let emitted = aggregator
                .ingest(sample)
                .map_err(|source| PipelineError::Ingest {
                    index: aggregator.samples_ingested(),
                    source,
                })?;

            report.record_sample(sample.subject_id, sample.timestamp);
            if self.retain_samples {
                samples.push(sample);
            }
            if let Some(segment) = emitted {
                segments.push(segment);
            }
        }

        let pending = aggregator.pending();
        if pending > 0 {
            debug!(pending, "dropping partial trailing segment");
        }

        let hourly = rollup(&segments, self.group_size);
        report.finish(pending, segments.len(), hourly.len());

        info!(
            run_id = %report.run_id,
            samples = report.samples_ingested,
            segments = report.segments_emitted,
            hourly = report.hourly_emitted,
            "pipeline run finished"
        );

        Ok(PipelineOutput {
            samples,
            samples_retained: self.retain_samples,
            segments: normalize(&segments),
            hourly: normalize(&hourly),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::VecSource;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_run_two_levels() {
        let samples: Vec<Sample> = [40, 50, 60, 70, 80, 90, 100, 110]
            .iter()
            .enumerate()
            .map(|(i, &hr)| Sample::new(1, i as i64, hr, 12, 50))
            .collect();
        let mut source = VecSource::new(samples);

        let output = Pipeline::new(size(4), size(2)).run(&mut source).unwrap();

        assert_eq!(output.samples.len(), 8);
        assert!(output.samples_retained);
        assert_eq!(output.segments.len(), 2);
        assert_eq!(output.hourly.len(), 1);
        assert_eq!(output.hourly[0].avg_hr, 75.0);
        assert_eq!(output.report.samples_dropped, 0);
        assert_eq!(output.report.segments_dropped, 0);
    }

    #[test]
    fn test_rejected_sample_reports_index() {
        let mut source = VecSource::new(vec![
            Sample::new(1, 5, 60, 12, 0),
            Sample::new(1, 6, 60, 12, 0),
            Sample::new(1, 4, 60, 12, 0),
        ]);

        let err = Pipeline::new(size(4), size(2)).run(&mut source).unwrap_err();
        match err {
            PipelineError::Ingest { index, source } => {
                assert_eq!(index, 2);
                assert!(matches!(source, IngestError::NonMonotonicTimestamp { .. }));
            }
        }
    }

    #[test]
    fn test_samples_not_retained() {
        let samples: Vec<Sample> = (0..10).map(|i| Sample::new(1, i, 60, 12, 0)).collect();
        let output = Pipeline::new(size(4), size(4))
            .retain_samples(false)
            .run(&mut VecSource::new(samples))
            .unwrap();

        assert!(output.samples.is_empty());
        assert!(!output.samples_retained);
        assert_eq!(output.segments.len(), 2);
        assert_eq!(output.report.samples_ingested, 10);
        assert_eq!(output.report.samples_dropped, 2);
        assert_eq!(output.report.segments_dropped, 2);
    }
}
