//! Configuration management for citydash
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags override whatever is loaded
//! here.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::DiagonalPolicy;
use crate::error::{Error, Result};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transform behaviour
    pub analysis: AnalysisConfig,

    /// JSON output settings
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Transform settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fill for correlation diagonal cells the input leaves unset
    pub diagonal: DiagonalPolicy,

    /// Relative tolerance when checking server aggregates against local ones
    pub aggregate_tolerance: f64,
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON
    pub pretty: bool,

    /// Decimals for formatted labels (tooltips)
    pub decimals: usize,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            diagonal: DiagonalPolicy::Zero,
            aggregate_tolerance: 1e-6,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            decimals: 4,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let diagonal = std::env::var("CITYDASH_DIAGONAL")
            .ok()
            .and_then(|v| DiagonalPolicy::parse(&v))
            .unwrap_or(defaults.analysis.diagonal);

        let aggregate_tolerance = std::env::var("CITYDASH_AGGREGATE_TOLERANCE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults.analysis.aggregate_tolerance);

        let pretty = std::env::var("CITYDASH_PRETTY")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(defaults.output.pretty);

        let decimals = std::env::var("CITYDASH_DECIMALS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.output.decimals);

        let level = std::env::var("CITYDASH_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let format = std::env::var("CITYDASH_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            analysis: AnalysisConfig {
                diagonal,
                aggregate_tolerance,
            },
            output: OutputConfig { pretty, decimals },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::with_source(format!("Failed to read config file: {}", path.display()), e)
        })?;

        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config file");

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let tolerance = self.analysis.aggregate_tolerance;
        if tolerance.is_nan() || tolerance <= 0.0 {
            return Err(Error::config("aggregate_tolerance must be positive"));
        }

        if self.output.decimals > 10 {
            return Err(Error::config("decimals must be at most 10"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::config(format!(
                "log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config("log format must be 'text' or 'json'"));
        }

        Ok(())
    }
}
