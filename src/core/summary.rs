//! Window summary records.
//!
//! The same record shape is used at every rollup level: 15-minute segments
//! built from samples and hourly rollups built from segments.

use crate::source::types::Metric;
use serde::{Deserialize, Serialize};

/// Average and extrema of one metric over a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub avg: f64,
    pub max: i64,
    pub min: i64,
}

impl MetricSummary {
    /// Whether `min <= avg <= max` holds.
    pub fn is_ordered(&self) -> bool {
        self.min as f64 <= self.avg && self.avg <= self.max as f64
    }
}

/// Summary statistics for one window, column order matching the exported CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    #[serde(rename = "user_id")]
    pub subject_id: i64,
    /// Timestamp of the first contributing sample
    pub seg_start: i64,
    /// Timestamp of the last contributing sample
    pub seg_end: i64,
    pub avg_hr: f64,
    pub max_hr: i64,
    pub min_hr: i64,
    pub avg_rr: f64,
    pub max_rr: i64,
    pub min_rr: i64,
    pub avg_activity: f64,
    pub max_activity: i64,
    pub min_activity: i64,
}

impl WindowSummary {
    /// Build a summary from per-metric statistics indexed by [`Metric::index`].
    pub fn from_metrics(
        subject_id: i64,
        seg_start: i64,
        seg_end: i64,
        metrics: [MetricSummary; 3],
    ) -> Self {
        let [hr, rr, activity] = metrics;
        Self {
            subject_id,
            seg_start,
            seg_end,
            avg_hr: hr.avg,
            max_hr: hr.max,
            min_hr: hr.min,
            avg_rr: rr.avg,
            max_rr: rr.max,
            min_rr: rr.min,
            avg_activity: activity.avg,
            max_activity: activity.max,
            min_activity: activity.min,
        }
    }

    /// Statistics for a single metric.
    pub fn metric(&self, metric: Metric) -> MetricSummary {
        match metric {
            Metric::HeartRate => MetricSummary {
                avg: self.avg_hr,
                max: self.max_hr,
                min: self.min_hr,
            },
            Metric::RespirationRate => MetricSummary {
                avg: self.avg_rr,
                max: self.max_rr,
                min: self.min_rr,
            },
            Metric::Activity => MetricSummary {
                avg: self.avg_activity,
                max: self.max_activity,
                min: self.min_activity,
            },
        }
    }

    /// Apply `f` to every averaged field.
    pub fn map_averages(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            avg_hr: f(self.avg_hr),
            avg_rr: f(self.avg_rr),
            avg_activity: f(self.avg_activity),
            ..self.clone()
        }
    }

    /// Whether `min <= avg <= max` holds for every metric.
    pub fn is_consistent(&self) -> bool {
        Metric::ALL.iter().all(|&m| self.metric(m).is_ordered())
    }

    /// Seconds between the first and last contributing timestamps.
    pub fn span_secs(&self) -> i64 {
        self.seg_end - self.seg_start
    }
}
