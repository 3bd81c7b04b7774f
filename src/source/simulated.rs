//! Random per-second sensor feed.
//!
//! Readings are drawn uniformly from fixed physiological ranges. A seed can be
//! supplied so that runs are reproducible.

use crate::source::types::Sample;
use crate::source::SampleSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Heart rate range in beats per minute.
pub const HEART_RATE_RANGE: Range<i64> = 30..180;

/// Respiration rate range in breaths per minute.
pub const RESPIRATION_RATE_RANGE: Range<i64> = 8..40;

/// Activity level range.
pub const ACTIVITY_RANGE: Range<i64> = 0..100;

/// Parameters of a simulated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Subject the samples are attributed to
    pub subject_id: i64,
    /// Timestamp of the first sample (unix seconds)
    pub start_timestamp: i64,
    /// Seconds between consecutive samples
    pub tick_secs: i64,
    /// Number of samples to produce
    pub count: usize,
    /// Random seed for reproducibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            subject_id: 1,
            start_timestamp: 0,
            tick_secs: 1,
            count: 2 * 60 * 60,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject_id: i64) -> Self {
        self.subject_id = subject_id;
        self
    }

    pub fn with_start(mut self, timestamp: i64) -> Self {
        self.start_timestamp = timestamp;
        self
    }

    pub fn with_tick_secs(mut self, secs: i64) -> Self {
        self.tick_secs = secs;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the sample count from a duration in seconds.
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        let tick = self.tick_secs.max(1) as u64;
        self.count = (secs / tick) as usize;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// A sample source backed by a random number generator.
pub struct SimulatedSource {
    config: SimulationConfig,
    rng: StdRng,
    produced: usize,
}

impl SimulatedSource {
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng,
            produced: 0,
        }
    }

    /// Draw one reading for the given timestamp.
    fn sample_at(&mut self, timestamp: i64) -> Sample {
        Sample {
            subject_id: self.config.subject_id,
            timestamp,
            heart_rate: self.rng.gen_range(HEART_RATE_RANGE),
            respiration_rate: self.rng.gen_range(RESPIRATION_RATE_RANGE),
            activity: self.rng.gen_range(ACTIVITY_RANGE),
        }
    }
}

impl SampleSource for SimulatedSource {
    fn next_sample(&mut self) -> Option<Sample> {
        if self.produced >= self.config.count {
            return None;
        }
        let timestamp =
            self.config.start_timestamp + self.produced as i64 * self.config.tick_secs;
        self.produced += 1;
        Some(self.sample_at(timestamp))
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.config.count - self.produced)
    }
}
