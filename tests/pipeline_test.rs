//! Integration tests for the sample-to-rollup pipeline and its outputs

use std::num::NonZeroUsize;
use vitals_rollup::core::normalize;
use vitals_rollup::export::{read_report, read_samples_json, read_summaries_csv, write_run};
use vitals_rollup::{
    OutputFiles, Pipeline, Sample, SimulatedSource, SimulationConfig, VecSource, WindowSummary,
};

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn heart_rate_feed(values: &[i64]) -> VecSource {
    VecSource::new(
        values
            .iter()
            .enumerate()
            .map(|(t, &hr)| Sample::new(1, t as i64, hr, 16, 20))
            .collect(),
    )
}

fn two_hour_run(seed: u64) -> (i64, vitals_rollup::PipelineOutput) {
    let start = 1_700_000_000;
    let config = SimulationConfig::new()
        .with_start(start)
        .with_duration_secs(2 * 60 * 60)
        .with_seed(seed);
    let mut source = SimulatedSource::new(config);
    let output = Pipeline::new(size(900), size(4)).run(&mut source).unwrap();
    (start, output)
}

#[test]
fn test_small_window_scenario() {
    let mut source = heart_rate_feed(&[40, 50, 60, 70, 80, 90, 100, 110]);
    let output = Pipeline::new(size(4), size(2)).run(&mut source).unwrap();

    let hr: Vec<(i64, i64, f64, i64, i64)> = output
        .segments
        .iter()
        .map(|s| (s.seg_start, s.seg_end, s.avg_hr, s.max_hr, s.min_hr))
        .collect();
    assert_eq!(hr, vec![(0, 3, 55.0, 70, 40), (4, 7, 95.0, 110, 80)]);

    assert_eq!(output.hourly.len(), 1);
    let h = &output.hourly[0];
    assert_eq!((h.seg_start, h.seg_end, h.avg_hr, h.max_hr, h.min_hr), (0, 7, 75.0, 110, 40));
}

#[test]
fn test_partial_windows_dropped() {
    let output = Pipeline::new(size(4), size(2))
        .run(&mut heart_rate_feed(&[60, 61, 62, 63, 64]))
        .unwrap();
    assert_eq!(output.segments.len(), 1);
    assert_eq!(output.segments[0].seg_end, 3);
    assert_eq!(output.report.samples_dropped, 1);
    assert!(output.hourly.is_empty());
    assert_eq!(output.report.segments_dropped, 1);

    let output = Pipeline::new(size(4), size(2))
        .run(&mut heart_rate_feed(&[60, 61, 62]))
        .unwrap();
    assert!(output.segments.is_empty());
    assert!(output.hourly.is_empty());
    assert_eq!(output.report.samples_dropped, 3);
}

#[test]
fn test_two_hour_simulation_alignment() {
    let (start, output) = two_hour_run(2024);

    assert_eq!(output.samples.len(), 7200);
    assert_eq!(output.segments.len(), 8);
    assert_eq!(output.hourly.len(), 2);

    for (i, segment) in output.segments.iter().enumerate() {
        let offset = i as i64 * 900;
        assert_eq!(segment.seg_start, start + offset);
        assert_eq!(segment.seg_end, start + offset + 899);
        assert_eq!(segment.subject_id, 1);
    }

    for (i, hour) in output.hourly.iter().enumerate() {
        let children = &output.segments[i * 4..i * 4 + 4];
        assert_eq!(hour.seg_start, children[0].seg_start);
        assert_eq!(hour.seg_end, children[3].seg_end);
        assert_eq!(hour.max_hr, children.iter().map(|c| c.max_hr).max().unwrap());
        assert_eq!(hour.min_rr, children.iter().map(|c| c.min_rr).min().unwrap());
        assert_eq!(
            hour.max_activity,
            children.iter().map(|c| c.max_activity).max().unwrap()
        );

        let mean_of_rounded = children.iter().map(|c| c.avg_hr).sum::<f64>() / 4.0;
        assert!((hour.avg_hr - mean_of_rounded).abs() < 0.011);
    }
}

#[test]
fn test_every_level_is_ordered() {
    let (_, output) = two_hour_run(7);
    assert!(output.segments.iter().all(WindowSummary::is_consistent));
    assert!(output.hourly.iter().all(WindowSummary::is_consistent));
}

#[test]
fn test_outputs_already_normalized() {
    let (_, output) = two_hour_run(11);
    assert_eq!(normalize(&output.segments), output.segments);
    assert_eq!(normalize(&output.hourly), output.hourly);
}

#[test]
fn test_segment_average_matches_raw_samples() {
    let (_, output) = two_hour_run(3);
    let first: Vec<&Sample> = output.samples.iter().take(900).collect();
    let mean = first.iter().map(|s| s.heart_rate as f64).sum::<f64>() / 900.0;

    assert!((output.segments[0].avg_hr - mean).abs() <= 0.005 + 1e-9);
    assert_eq!(
        output.segments[0].max_hr,
        first.iter().map(|s| s.heart_rate).max().unwrap()
    );
}

#[test]
fn test_write_run_files() {
    let dir = tempfile::tempdir().unwrap();
    let (_, output) = two_hour_run(5);
    let files = OutputFiles::default();

    let paths = write_run(dir.path(), &files, &output).unwrap();

    let raw = paths.raw_samples.expect("raw samples written");
    assert_eq!(read_samples_json(&raw).unwrap().len(), 7200);
    assert_eq!(read_summaries_csv(&paths.segments).unwrap(), output.segments);
    assert_eq!(read_summaries_csv(&paths.hourly).unwrap(), output.hourly);
    assert_eq!(read_report(&paths.report).unwrap(), output.report);
}

#[test]
fn test_write_run_without_raw_samples() {
    let dir = tempfile::tempdir().unwrap();
    let config = SimulationConfig::new().with_count(1800).with_seed(1);
    let output = Pipeline::new(size(900), size(4))
        .retain_samples(false)
        .run(&mut SimulatedSource::new(config))
        .unwrap();

    let paths = write_run(dir.path(), &OutputFiles::default(), &output).unwrap();
    assert!(paths.raw_samples.is_none());
    assert!(!dir.path().join("second_wise_sensor_data.json").exists());
    assert_eq!(read_summaries_csv(&paths.segments).unwrap().len(), 2);
    assert!(read_summaries_csv(&paths.hourly).unwrap().is_empty());
}

#[test]
fn test_write_run_empty_input_without_raw_samples() {
    let dir = tempfile::tempdir().unwrap();
    let output = Pipeline::new(size(4), size(2))
        .retain_samples(false)
        .run(&mut VecSource::new(Vec::new()))
        .unwrap();

    let paths = write_run(dir.path(), &OutputFiles::default(), &output).unwrap();
    assert!(paths.raw_samples.is_none());
    assert!(!dir.path().join("second_wise_sensor_data.json").exists());
    assert!(read_summaries_csv(&paths.segments).unwrap().is_empty());
    assert_eq!(read_report(&paths.report).unwrap().samples_ingested, 0);
}

#[test]
fn test_write_run_empty_input_keeps_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = Pipeline::new(size(4), size(2))
        .run(&mut VecSource::new(Vec::new()))
        .unwrap();

    let paths = write_run(dir.path(), &OutputFiles::default(), &output).unwrap();
    let raw = paths.raw_samples.expect("raw samples written");
    assert!(read_samples_json(&raw).unwrap().is_empty());
}
