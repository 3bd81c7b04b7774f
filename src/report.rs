//! Run statistics.
//!
//! A [`RunReport`] records what a pipeline run consumed, emitted and dropped,
//! so partial trailing windows are visible rather than silently lost.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Statistics for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Unique identifier for this run
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Subject of the first ingested sample
    pub subject_id: Option<i64>,
    /// Samples per segment window
    pub window_size: usize,
    /// Segments per rollup window
    pub group_size: usize,
    /// Timestamp of the first ingested sample
    pub first_timestamp: Option<i64>,
    /// Timestamp of the last ingested sample
    pub last_timestamp: Option<i64>,
    pub samples_ingested: u64,
    /// Samples left in the trailing partial window
    pub samples_dropped: u64,
    pub segments_emitted: u64,
    /// Segments left in the trailing partial group
    pub segments_dropped: u64,
    pub hourly_emitted: u64,
}

impl RunReport {
    /// Start a report for a run with the given window and group sizes.
    pub fn begin(window_size: usize, group_size: usize) -> Self {
        let now = Utc::now();
        Self {
            run_id: Uuid::new_v4(),
            started_at: now,
            finished_at: now,
            subject_id: None,
            window_size,
            group_size,
            first_timestamp: None,
            last_timestamp: None,
            samples_ingested: 0,
            samples_dropped: 0,
            segments_emitted: 0,
            segments_dropped: 0,
            hourly_emitted: 0,
        }
    }

    /// Record an accepted sample.
    pub fn record_sample(&mut self, subject_id: i64, timestamp: i64) {
        self.subject_id.get_or_insert(subject_id);
        self.first_timestamp.get_or_insert(timestamp);
        self.last_timestamp = Some(timestamp);
        self.samples_ingested += 1;
    }

    /// Close the report with the final stage counts.
    pub fn finish(&mut self, samples_dropped: usize, segments: usize, hourly: usize) {
        self.samples_dropped = samples_dropped as u64;
        self.segments_emitted = segments as u64;
        self.segments_dropped = (segments % self.group_size.max(1)) as u64;
        self.hourly_emitted = hourly as u64;
        self.finished_at = Utc::now();
    }

    /// Wall-clock run time in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let subject = self
            .subject_id
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        format!(
            "Run {}:\n\
             - Subject: {}\n\
             - Samples ingested: {}\n\
             - Samples dropped (partial window): {}\n\
             - Segments emitted: {} (window: {} samples)\n\
             - Segments dropped (partial group): {}\n\
             - Hourly rollups emitted: {} (group: {} segments)\n\
             - Run time: {} ms",
            self.run_id,
            subject,
            self.samples_ingested,
            self.samples_dropped,
            self.segments_emitted,
            self.window_size,
            self.segments_dropped,
            self.hourly_emitted,
            self.group_size,
            self.elapsed_ms()
        )
    }
}
