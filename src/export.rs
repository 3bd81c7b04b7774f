//! Persistence of run outputs.
//!
//! Raw samples are written as a pretty JSON array of records, summaries as
//! CSV with one row per window, and the run report as pretty JSON.

use crate::config::OutputFiles;
use crate::core::WindowSummary;
use crate::pipeline::PipelineOutput;
use crate::report::RunReport;
use crate::source::Sample;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// CSV header for summary files.
pub const SUMMARY_COLUMNS: [&str; 12] = [
    "user_id",
    "seg_start",
    "seg_end",
    "avg_hr",
    "max_hr",
    "min_hr",
    "avg_rr",
    "max_rr",
    "min_rr",
    "avg_activity",
    "max_activity",
    "min_activity",
];

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unexpected CSV header in {path:?}: {found}")]
    Header { path: PathBuf, found: String },
}

/// Paths of the files written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    pub raw_samples: Option<PathBuf>,
    pub segments: PathBuf,
    pub hourly: PathBuf,
    pub report: PathBuf,
}

fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Write raw samples as a JSON array.
pub fn write_samples_json(path: &Path, samples: &[Sample]) -> Result<(), ExportError> {
    write_json_pretty(path, samples)
}

/// Read raw samples written by [`write_samples_json`].
pub fn read_samples_json(path: &Path) -> Result<Vec<Sample>, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write summaries as CSV. The header is written even when there are no rows.
pub fn write_summaries_csv(path: &Path, summaries: &[WindowSummary]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(SUMMARY_COLUMNS)?;
    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read summaries written by [`write_summaries_csv`].
pub fn read_summaries_csv(path: &Path) -> Result<Vec<WindowSummary>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?;
    if !headers.iter().eq(SUMMARY_COLUMNS) {
        return Err(ExportError::Header {
            path: path.to_path_buf(),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut summaries = Vec::new();
    for record in reader.deserialize() {
        summaries.push(record?);
    }
    Ok(summaries)
}

/// Write the run report as JSON.
pub fn write_report(path: &Path, report: &RunReport) -> Result<(), ExportError> {
    write_json_pretty(path, report)
}

/// Read a report written by [`write_report`].
pub fn read_report(path: &Path) -> Result<RunReport, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write every output of a run into `dir`.
///
/// The raw sample file is skipped when the run did not retain samples.
pub fn write_run(
    dir: &Path,
    files: &OutputFiles,
    output: &PipelineOutput,
) -> Result<RunPaths, ExportError> {
    std::fs::create_dir_all(dir)?;

    let raw_samples = if output.samples_retained {
        let path = dir.join(&files.raw_samples);
        write_samples_json(&path, &output.samples)?;
        Some(path)
    } else {
        None
    };

    let paths = RunPaths {
        raw_samples,
        segments: dir.join(&files.segments),
        hourly: dir.join(&files.hourly),
        report: dir.join(&files.report),
    };

    write_summaries_csv(&paths.segments, &output.segments)?;
    write_summaries_csv(&paths.hourly, &output.hourly)?;
    write_report(&paths.report, &output.report)?;

    info!(dir = %dir.display(), run_id = %output.report.run_id, "run outputs written");
    Ok(paths)
}
