//! Logging configuration
//!
//! Embedded as the `[logging]` table of a run config:
//!
//! ```toml
//! [logging]
//! level = "info"
//! directives = ["csmarl_simulation::scheduler=trace"]
//! console = "plain"
//!
//! [logging.trace_file]
//! directory = "runs/42"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level for every target without a directive; `RUST_LOG` replaces the
    /// whole filter
    pub level: String,
    /// Extra filter directives such as `csmarl_simulation::traffic=debug`
    pub directives: Vec<String>,
    pub console: ConsoleFormat,
    /// JSONL file receiving every event, TX traces included
    pub trace_file: Option<TraceFileConfig>,
    /// Add source file and line to each event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directives: Vec::new(),
            console: ConsoleFormat::Pretty,
            trace_file: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Debug level with source locations on a pretty console
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            include_location: true,
            ..Default::default()
        }
    }

    /// Silent console, every event written to `<log_dir>/csmarl.log`
    pub fn batch(log_dir: PathBuf) -> Self {
        Self {
            console: ConsoleFormat::Off,
            trace_file: Some(TraceFileConfig {
                directory: log_dir,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Warnings only, no colors
    pub fn testing() -> Self {
        Self {
            level: "warn".to_string(),
            console: ConsoleFormat::Plain,
            ..Default::default()
        }
    }

    /// Level and directives joined into one filter string
    pub fn filter_directives(&self) -> String {
        std::iter::once(self.level.as_str())
            .chain(self.directives.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// How events are printed to stderr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleFormat {
    /// Colored, multi-field human output
    #[default]
    Pretty,
    /// Compact single-line output without colors
    Plain,
    /// One JSON object per line
    Json,
    Off,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceFileConfig {
    pub directory: PathBuf,
    /// File name stem; `Never` rotation writes `<prefix>.log`
    pub prefix: String,
    pub rotation: RotationStrategy,
}

impl Default for TraceFileConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            prefix: "csmarl".to_string(),
            rotation: RotationStrategy::Never,
        }
    }
}

/// File rotation for long batch campaigns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    /// One file per run, truncated at start
    #[default]
    Never,
    Hourly,
    Daily,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.console, ConsoleFormat::Pretty);
        assert!(config.trace_file.is_none());

        let config = LogConfig::development();
        assert_eq!(config.level, "debug");
        assert!(config.include_location);

        let config = LogConfig::batch(PathBuf::from("/tmp/csmarl-logs"));
        assert_eq!(config.console, ConsoleFormat::Off);
        let file = config.trace_file.unwrap();
        assert_eq!(file.directory, PathBuf::from("/tmp/csmarl-logs"));
        assert_eq!(file.rotation, RotationStrategy::Never);
    }

    #[test]
    fn test_filter_directives() {
        let mut config = LogConfig::testing();
        assert_eq!(config.filter_directives(), "warn");

        config.directives.push("csmarl_simulation::traffic=debug".into());
        assert_eq!(
            config.filter_directives(),
            "warn,csmarl_simulation::traffic=debug"
        );
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: LogConfig = toml::from_str(
            r#"
            level = "trace"
            console = "json"

            [trace_file]
            directory = "out"
            rotation = "hourly"
            "#,
        )
        .unwrap();
        assert_eq!(config.level, "trace");
        assert_eq!(config.console, ConsoleFormat::Json);
        assert!(config.directives.is_empty());
        let file = config.trace_file.unwrap();
        assert_eq!(file.prefix, "csmarl");
        assert_eq!(file.rotation, RotationStrategy::Hourly);
    }
}
