//! Vitals simulator CLI
//!
//! Simulates a per-second sensor feed and writes 15-minute and hourly rollups.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vitals_rollup::{
    config::Config,
    export::{read_report, read_summaries_csv, write_run},
    Pipeline, SimulatedSource, SimulationConfig, VERSION,
};

#[derive(Parser)]
#[command(name = "vitals-sim")]
#[command(version = VERSION)]
#[command(about = "Windowed rollups of simulated physiological sensor data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a feed and write segment and hourly statistics
    Run {
        /// Simulated duration in hours
        #[arg(long)]
        hours: Option<f64>,

        /// Samples per segment window
        #[arg(long)]
        window: Option<NonZeroUsize>,

        /// Segments per rollup window
        #[arg(long)]
        group: Option<NonZeroUsize>,

        /// Random seed for a reproducible feed
        #[arg(long)]
        seed: Option<u64>,

        /// Subject identifier stamped on every sample
        #[arg(long)]
        subject: Option<i64>,

        /// Output directory
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Skip writing the raw sample file
        #[arg(long)]
        no_raw: bool,
    },

    /// Show the most recent run in an output directory
    Status {
        /// Output directory
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show configuration
    Config,

    /// Write the default configuration file
    InitConfig,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            hours,
            window,
            group,
            seed,
            subject,
            output,
            no_raw,
        } => cmd_run(RunArgs {
            hours,
            window,
            group,
            seed,
            subject,
            output,
            no_raw,
        }),
        Commands::Status { output } => cmd_status(output),
        Commands::Config => cmd_config(),
        Commands::InitConfig => cmd_init_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vitals_rollup=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

struct RunArgs {
    hours: Option<f64>,
    window: Option<NonZeroUsize>,
    group: Option<NonZeroUsize>,
    seed: Option<u64>,
    subject: Option<i64>,
    output: Option<PathBuf>,
    no_raw: bool,
}

/// Convert an `--hours` value into a run duration.
fn duration_from_hours(hours: f64) -> Result<Duration> {
    anyhow::ensure!(
        hours.is_finite() && hours >= 0.0,
        "--hours must be a non-negative number"
    );
    Duration::try_from_secs_f64(hours * 3600.0)
        .with_context(|| format!("--hours {hours} is out of range"))
}

/// Apply CLI overrides on top of the stored configuration.
fn resolve_config(args: &RunArgs) -> Result<Config> {
    let mut config = Config::load().context("loading configuration")?;

    if let Some(hours) = args.hours {
        config.duration = duration_from_hours(hours)?;
    }
    if let Some(window) = args.window {
        config.window_size = window;
    }
    if let Some(group) = args.group {
        config.rollup_group_size = group;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(subject) = args.subject {
        config.subject_id = subject;
    }
    if let Some(ref output) = args.output {
        config.output_dir = output.clone();
    }

    config.validate()?;
    Ok(config)
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    config
        .ensure_directories()
        .with_context(|| format!("creating {:?}", config.output_dir))?;

    let start = Utc::now().timestamp();
    let mut simulation = SimulationConfig::new()
        .with_subject(config.subject_id)
        .with_start(start)
        .with_tick_secs(config.tick_secs)
        .with_count(config.sample_count());
    if let Some(seed) = config.seed {
        simulation = simulation.with_seed(seed);
    }

    println!("Vitals Simulator v{VERSION}");
    println!();
    println!("  Subject: {}", config.subject_id);
    println!("  Samples: {}", simulation.count);
    println!("  Segment window: {} samples", config.window_size);
    println!("  Rollup group: {} segments", config.rollup_group_size);
    println!("  Output: {:?}", config.output_dir);
    println!();

    let mut source = SimulatedSource::new(simulation);
    let output = Pipeline::from_config(&config)
        .retain_samples(!args.no_raw)
        .run(&mut source)?;

    for segment in &output.segments {
        println!(
            "[{} - {}] hr {:.2} ({}-{}), rr {:.2} ({}-{}), activity {:.2} ({}-{})",
            format_ts(segment.seg_start),
            format_ts(segment.seg_end),
            segment.avg_hr,
            segment.min_hr,
            segment.max_hr,
            segment.avg_rr,
            segment.min_rr,
            segment.max_rr,
            segment.avg_activity,
            segment.min_activity,
            segment.max_activity,
        );
    }

    let paths = write_run(&config.output_dir, &config.files, &output)
        .with_context(|| format!("writing outputs to {:?}", config.output_dir))?;

    println!();
    if let Some(ref raw) = paths.raw_samples {
        println!("Raw samples: {raw:?}");
    }
    println!("Segment stats: {:?}", paths.segments);
    println!("Hourly stats: {:?}", paths.hourly);
    println!();
    println!("{}", output.report.summary());
    Ok(())
}

fn cmd_status(output: Option<PathBuf>) -> Result<()> {
    let config = Config::load().context("loading configuration")?;
    let dir = output.unwrap_or(config.output_dir.clone());

    println!("Vitals Rollup Status");
    println!("====================");
    println!();
    println!("Output directory: {dir:?}");

    let report_path = dir.join(&config.files.report);
    if !report_path.exists() {
        println!("No previous run found.");
        println!("Run 'vitals-sim run' to simulate a feed.");
        return Ok(());
    }

    let report = read_report(&report_path)?;
    println!();
    println!("{}", report.summary());
    println!();

    print_summary_file("Segments", &dir.join(&config.files.segments));
    print_summary_file("Hourly", &dir.join(&config.files.hourly));
    Ok(())
}

fn print_summary_file(label: &str, path: &Path) {
    match read_summaries_csv(path) {
        Ok(rows) => match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => println!(
                "  {label}: {} rows, {} to {}",
                rows.len(),
                format_ts(first.seg_start),
                format_ts(last.seg_end)
            ),
            _ => println!("  {label}: no rows"),
        },
        Err(e) => eprintln!("  {label}: could not read {path:?}: {e}"),
    }
}

fn cmd_config() -> Result<()> {
    let config = Config::load().context("loading configuration")?;

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_init_config() -> Result<()> {
    let path = Config::config_path();
    Config::default()
        .save()
        .with_context(|| format!("writing {path:?}"))?;
    println!("Wrote default configuration to {path:?}");
    Ok(())
}

fn format_ts(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
