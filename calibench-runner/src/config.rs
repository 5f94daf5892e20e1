//! Configuration loading from calibench.toml
//!
//! Suite defaults can be specified in a `calibench.toml` file in the project root.
//! The configuration is automatically discovered by walking up from the current directory.

use calibench_core::{BenchOptions, NANOS_PER_SEC};
use calibench_report::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name searched for by [`CalibenchConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "calibench.toml";

/// Calibench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalibenchConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default time budget applied to every benchmark of a suite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Minimum span of one cycle (e.g., "50ms"); derived from the clock
    /// resolution when unset
    #[serde(default)]
    pub min_time: Option<String>,
    /// Sampling budget per repetition (e.g., "500ms")
    #[serde(default = "default_max_time")]
    pub max_time: String,
    /// Budget multiplier
    #[serde(default)]
    pub repetitions: Option<u32>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            min_time: None,
            max_time: default_max_time(),
            repetitions: None,
        }
    }
}

fn default_max_time() -> String {
    "500ms".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "human" or "json"
    #[serde(default = "default_format")]
    pub format: String,
    /// Emit debug-level calibration logs
    #[serde(default)]
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            verbose: false,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl CalibenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let dir = std::env::current_dir().ok()?;
        Self::discover_from(&dir)
    }

    /// Walk up from `start` looking for [`CONFIG_FILE_NAME`]
    pub fn discover_from(start: &Path) -> Option<Self> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!("Ignoring {}: {:#}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Validated benchmark options described by `[runner]`
    pub fn bench_options(&self) -> anyhow::Result<BenchOptions> {
        let mut options = BenchOptions::default();
        if let Some(min_time) = &self.runner.min_time {
            options.min_time = Self::parse_duration(min_time)? as f64 / NANOS_PER_SEC;
        }
        options.max_time = Self::parse_duration(&self.runner.max_time)? as f64 / NANOS_PER_SEC;
        options.repetitions = self.runner.repetitions;

        options.validate()?;
        Ok(options)
    }

    /// Output format described by `[output]`
    pub fn output_format(&self) -> anyhow::Result<OutputFormat> {
        self.output
            .format
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# Calibench Configuration
# https://github.com/ml-rust/calibench

[runner]
# Minimum span of one cycle; derived from the clock resolution when unset
# min_time = "50ms"
# Sampling budget per benchmark
max_time = "500ms"
# Budget multiplier (uncomment to enable)
# repetitions = 3

[output]
# Output format: human or json
format = "human"
# Emit debug-level calibration logs
verbose = false
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m") to nanoseconds.
    ///
    /// A bare number is read as seconds.
    pub fn parse_duration(s: &str) -> anyhow::Result<u64> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be non-negative: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok((value * multiplier as f64) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibench_core::default_min_time;

    #[test]
    fn test_default_config() {
        let config = CalibenchConfig::default();
        assert_eq!(config.runner.max_time, "500ms");
        assert_eq!(config.runner.min_time, None);
        assert_eq!(config.output.format, "human");
        assert!(!config.output.verbose);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(CalibenchConfig::parse_duration("3s").unwrap(), 3_000_000_000);
        assert_eq!(CalibenchConfig::parse_duration("500ms").unwrap(), 500_000_000);
        assert_eq!(CalibenchConfig::parse_duration("100us").unwrap(), 100_000);
        assert_eq!(CalibenchConfig::parse_duration("100µs").unwrap(), 100_000);
        assert_eq!(CalibenchConfig::parse_duration("1000ns").unwrap(), 1000);
        assert_eq!(CalibenchConfig::parse_duration("2m").unwrap(), 120_000_000_000);
        assert_eq!(CalibenchConfig::parse_duration("1.5s").unwrap(), 1_500_000_000);
        assert_eq!(CalibenchConfig::parse_duration("2").unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(CalibenchConfig::parse_duration("").is_err());
        assert!(CalibenchConfig::parse_duration("fast").is_err());
        assert!(CalibenchConfig::parse_duration("3h").is_err());
        assert!(CalibenchConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [runner]
            min_time = "10ms"
            repetitions = 2

            [output]
            format = "json"
        "#;

        let config: CalibenchConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.runner.min_time.as_deref(), Some("10ms"));
        assert_eq!(config.runner.repetitions, Some(2));
        assert_eq!(config.output_format().unwrap(), OutputFormat::Json);
        // Defaults should still apply
        assert_eq!(config.runner.max_time, "500ms");

        let options = config.bench_options().unwrap();
        assert!((options.min_time - 0.01).abs() < 1e-12);
        assert!((options.max_time - 0.5).abs() < 1e-12);
        assert_eq!(options.budget_ns(), 1_000_000_000);
    }

    #[test]
    fn test_default_toml_parses() {
        let default_toml = CalibenchConfig::default_toml();
        let config: CalibenchConfig = toml::from_str(&default_toml).unwrap();
        assert_eq!(config.runner.max_time, "500ms");

        let options = config.bench_options().unwrap();
        assert_eq!(options.min_time, default_min_time());
        assert_eq!(config.output_format().unwrap(), OutputFormat::Human);
    }

    #[test]
    fn test_invalid_options_rejected() {
        let mut config = CalibenchConfig::default();
        config.runner.repetitions = Some(0);
        assert!(config.bench_options().is_err());

        let mut config = CalibenchConfig::default();
        config.output.format = "csv".to_string();
        assert!(config.output_format().is_err());
    }

    #[test]
    fn test_discover_walks_up() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[output]\nverbose = true\n",
        )
        .unwrap();
        let nested = root.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let config = CalibenchConfig::discover_from(&nested).unwrap();
        assert!(config.output.verbose);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CalibenchConfig::load(dir.path().join(CONFIG_FILE_NAME)).is_err());
    }
}
