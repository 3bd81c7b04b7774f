//! Raw sensor sample types.
//!
//! A sample is one reading per tick for a single subject. Samples are
//! immutable once produced and arrive in non-decreasing timestamp order.

use serde::{Deserialize, Serialize};

/// The physiological metrics carried by every sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    HeartRate,
    RespirationRate,
    Activity,
}

impl Metric {
    /// All metrics, in column order.
    pub const ALL: [Metric; 3] = [Metric::HeartRate, Metric::RespirationRate, Metric::Activity];

    /// Position of this metric in per-metric arrays.
    pub fn index(self) -> usize {
        match self {
            Metric::HeartRate => 0,
            Metric::RespirationRate => 1,
            Metric::Activity => 2,
        }
    }
}

/// One sensor reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Subject the reading belongs to
    #[serde(rename = "user_id")]
    pub subject_id: i64,
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Beats per minute
    pub heart_rate: i64,
    /// Breaths per minute
    pub respiration_rate: i64,
    /// Activity level (0-100)
    pub activity: i64,
}

impl Sample {
    pub fn new(
        subject_id: i64,
        timestamp: i64,
        heart_rate: i64,
        respiration_rate: i64,
        activity: i64,
    ) -> Self {
        Self {
            subject_id,
            timestamp,
            heart_rate,
            respiration_rate,
            activity,
        }
    }

    /// Read a single metric.
    pub fn value(&self, metric: Metric) -> i64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::RespirationRate => self.respiration_rate,
            Metric::Activity => self.activity,
        }
    }
}
