//! Structured logging for the csmarl simulator
//!
//! Console output is for people; the optional trace file is JSONL so the
//! `TraceDelay TX` records of a run can be post-processed line by line.
//!
//! # Quick Start
//!
//! ```ignore
//! use csmarl_logging::{LogConfig, SubscriberBuilder};
//!
//! // Pretty console output at info level
//! SubscriberBuilder::new().init();
//!
//! // Quiet console plus a trace file; keep the guard alive until exit
//! let _guard = SubscriberBuilder::new()
//!     .with_config(LogConfig::batch("runs/7".into()))
//!     .init();
//! ```

pub mod config;

pub use config::{ConsoleFormat, LogConfig, RotationStrategy, TraceFileConfig};

use std::fs::{self, File};

use thiserror::Error;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the global subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("Failed to create trace file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Builder for the global tracing subscriber
#[derive(Debug, Default)]
pub struct SubscriberBuilder {
    config: LogConfig,
}

impl SubscriberBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    /// Add a filter directive such as `csmarl_simulation::scheduler=trace`
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.config.directives.push(directive.into());
        self
    }

    pub fn with_console(mut self, format: ConsoleFormat) -> Self {
        self.config.console = format;
        self
    }

    pub fn with_trace_file(mut self, file: TraceFileConfig) -> Self {
        self.config.trace_file = Some(file);
        self
    }

    /// Install the subscriber globally
    ///
    /// # Panics
    ///
    /// Panics if a global subscriber is already set or the trace file cannot
    /// be created.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => panic!("failed to initialize logging: {e}"),
        }
    }

    /// Install the subscriber globally
    ///
    /// Returns the trace file's flush guard when a trace file is configured;
    /// dropping it flushes pending records.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(self.config.filter_directives())?,
        };
        let location = self.config.include_location;

        let pretty = (self.config.console == ConsoleFormat::Pretty).then(|| {
            fmt::layer()
                .with_target(true)
                .with_file(location)
                .with_line_number(location)
        });
        let plain = (self.config.console == ConsoleFormat::Plain).then(|| {
            fmt::layer()
                .compact()
                .with_ansi(false)
                .with_file(location)
                .with_line_number(location)
        });
        let json = (self.config.console == ConsoleFormat::Json).then(|| {
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_file(location)
                .with_line_number(location)
        });

        let (trace_file, guard) = match &self.config.trace_file {
            Some(file) => {
                let (writer, guard) = trace_writer(file)?;
                let layer = fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_file(location)
                    .with_line_number(location)
                    .with_writer(writer);
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default()
            .with(filter)
            .with(pretty)
            .with(plain)
            .with(json)
            .with(trace_file)
            .try_init()?;

        tracing::debug!(filter = %self.config.filter_directives(), "logging initialized");
        Ok(guard)
    }
}

/// Non-blocking writer for the trace file; `Never` truncates a single file,
/// the rolling strategies append
fn trace_writer(file: &TraceFileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&file.directory)?;
    let rotation = match file.rotation {
        RotationStrategy::Never => {
            let path = file.directory.join(format!("{}.log", file.prefix));
            return Ok(tracing_appender::non_blocking(File::create(path)?));
        }
        RotationStrategy::Hourly => Rotation::HOURLY,
        RotationStrategy::Daily => Rotation::DAILY,
    };
    let appender = RollingFileAppender::new(rotation, &file.directory, &file.prefix);
    Ok(tracing_appender::non_blocking(appender))
}

/// Pretty console at info level
pub fn init_default() {
    SubscriberBuilder::new().init();
}

/// Debug level with source locations
pub fn init_development() {
    SubscriberBuilder::new()
        .with_config(LogConfig::development())
        .init();
}

/// Warnings only; repeated calls are ignored
pub fn init_testing() {
    let _ = SubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}
