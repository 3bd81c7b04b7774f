//! Configuration for vitals-rollup runs.

use crate::core::{HOURLY_GROUP_SIZE, SEGMENT_WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Subject the simulated samples belong to
    pub subject_id: i64,

    /// Samples per segment window
    pub window_size: NonZeroUsize,

    /// Segments per rollup window
    pub rollup_group_size: NonZeroUsize,

    /// Simulated duration
    #[serde(with = "duration_serde")]
    pub duration: Duration,

    /// Seconds between samples
    pub tick_secs: i64,

    /// Random seed for the simulated feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Directory run outputs are written to
    pub output_dir: PathBuf,

    /// Output file names inside `output_dir`
    #[serde(default)]
    pub files: OutputFiles,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitals-rollup");

        Self {
            subject_id: 1,
            window_size: SEGMENT_WINDOW_SIZE,
            rollup_group_size: HOURLY_GROUP_SIZE,
            duration: Duration::from_secs(2 * 60 * 60),
            tick_secs: 1,
            seed: None,
            output_dir: data_dir.join("runs"),
            files: OutputFiles::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vitals-rollup")
            .join("config.json")
    }

    /// Ensure the output directory exists.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Check values serde cannot rule out on its own. Zero window and group
    /// sizes never get this far: `NonZeroUsize` fails to deserialize.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_secs <= 0 {
            return Err(ConfigError::Invalid(format!(
                "tick_secs must be positive, got {}",
                self.tick_secs
            )));
        }
        self.files.ensure_distinct()
    }

    /// Number of samples the configured duration produces.
    pub fn sample_count(&self) -> usize {
        (self.duration.as_secs() / self.tick_secs.max(1) as u64) as usize
    }
}

/// Names of the files written for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFiles {
    pub raw_samples: String,
    pub segments: String,
    pub hourly: String,
    pub report: String,
}

impl OutputFiles {
    /// Reject configurations where two outputs would overwrite each other.
    pub fn ensure_distinct(&self) -> Result<(), ConfigError> {
        let names = [
            ("raw_samples", &self.raw_samples),
            ("segments", &self.segments),
            ("hourly", &self.hourly),
            ("report", &self.report),
        ];
        for (i, (first, a)) in names.iter().enumerate() {
            for (second, b) in &names[i + 1..] {
                if a == b {
                    return Err(ConfigError::Invalid(format!(
                        "{first} and {second} outputs both use {a:?}"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            raw_samples: "second_wise_sensor_data.json".to_string(),
            segments: "15_min_stats.csv".to_string(),
            hourly: "hourly_stats.csv".to_string(),
            report: "run_report.json".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Serde support for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window_size.get(), 900);
        assert_eq!(config.rollup_group_size.get(), 4);
        assert_eq!(config.duration, Duration::from_secs(7200));
        assert_eq!(config.sample_count(), 7200);
        assert_eq!(config.files.segments, "15_min_stats.csv");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.window_size = NonZeroUsize::new(60).unwrap();
        config.seed = Some(11);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_zero_window_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut json = serde_json::to_value(Config::default()).unwrap();
        json["window_size"] = serde_json::json!(0);
        std::fs::write(&path, json.to_string()).unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_shared_output_names_rejected() {
        let mut config = Config::default();
        config.files.report = config.files.raw_samples.clone();
        match config.validate() {
            Err(ConfigError::Invalid(msg)) => {
                assert!(msg.contains("raw_samples") && msg.contains("report"));
            }
            other => panic!("expected Invalid, got {other:?}"),
        }

        let mut config = Config::default();
        config.files.hourly = config.files.segments.clone();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_shared_output_names_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.files.segments = config.files.report.clone();
        config.save_to(&path).unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_non_positive_tick_rejected() {
        let config = Config {
            tick_secs: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
