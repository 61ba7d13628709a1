//! Search configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags.
//!
//! ```toml
//! profile = "prod"
//! region = "ap-northeast-1"
//!
//! [query]
//! window_secs = 60
//! limit = 10000
//! message_field = "@message"
//! max_in_flight = 1
//!
//! [poll]
//! strategy = "exponential"
//! interval_secs = 1
//! max_interval_secs = 30
//! multiplier = 2.0
//! jitter = true
//! ```

use std::path::Path;
use std::time::Duration;

use logsweep_core::{
    BackoffPolicy, DEFAULT_MAX_WINDOW_SECS, DEFAULT_MESSAGE_FIELD, DEFAULT_RESULT_LIMIT,
    DriverConfig,
};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::CliError;

/// Largest result limit CloudWatch Logs Insights accepts.
pub const MAX_RESULT_LIMIT: u32 = 10_000;

/// Query submission settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Widest window submitted as one query, in seconds.
    pub window_secs: i64,
    /// Maximum records returned per window.
    pub limit: u32,
    /// Field extracted from every result row.
    pub message_field: String,
    /// Number of windows queried concurrently.
    pub max_in_flight: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            window_secs: DEFAULT_MAX_WINDOW_SECS,
            limit: DEFAULT_RESULT_LIMIT,
            message_field: DEFAULT_MESSAGE_FIELD.to_string(),
            max_in_flight: 1,
        }
    }
}

/// Poll delay strategy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PollStrategy {
    /// Constant delay.
    #[default]
    Fixed,
    /// Geometrically growing delay.
    Exponential,
}

/// Status polling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PollConfig {
    /// Delay strategy.
    pub strategy: PollStrategy,
    /// Delay between polls (initial delay for exponential).
    pub interval_secs: u64,
    /// Cap on the exponential delay.
    pub max_interval_secs: u64,
    /// Exponential growth factor.
    pub multiplier: f64,
    /// Randomize exponential delays.
    pub jitter: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            strategy: PollStrategy::Fixed,
            interval_secs: 5,
            max_interval_secs: 30,
            multiplier: 2.0,
            jitter: false,
        }
    }
}

impl PollConfig {
    /// The backoff policy this configuration describes.
    #[must_use]
    pub fn backoff(&self) -> BackoffPolicy {
        match self.strategy {
            PollStrategy::Fixed => BackoffPolicy::fixed(Duration::from_secs(self.interval_secs)),
            PollStrategy::Exponential => BackoffPolicy::Exponential {
                initial: Duration::from_secs(self.interval_secs),
                max: Duration::from_secs(self.max_interval_secs),
                multiplier: self.multiplier,
                jitter: self.jitter,
            },
        }
    }
}

/// Complete configuration for one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    /// AWS shared-config profile.
    pub profile: Option<String>,
    /// AWS region override.
    pub region: Option<String>,
    /// Abort the search after this many seconds.
    pub timeout_secs: Option<u64>,
    /// Query settings.
    pub query: QueryConfig,
    /// Polling settings.
    pub poll: PollConfig,
}

impl SweepConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CliError::Config(format!(
                "failed to read config file '{}': {e}",
                path.as_ref().display()
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, CliError> {
        let config: Self =
            toml::from_str(content).map_err(|e| CliError::Config(format!("invalid TOML: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Builds the effective configuration for a command line.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or the merged values
    /// are invalid.
    pub fn resolve(cli: &Cli) -> Result<Self, CliError> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let merged = base.with_overrides(cli);
        merged.validate()?;
        Ok(merged)
    }

    /// Applies command-line flags on top of this configuration.
    #[must_use]
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(profile) = &cli.profile {
            self.profile = Some(profile.clone());
        }
        if let Some(region) = &cli.region {
            self.region = Some(region.clone());
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = Some(timeout);
        }
        if let Some(window) = cli.window_secs {
            self.query.window_secs = window;
        }
        if let Some(limit) = cli.limit {
            self.query.limit = limit;
        }
        if let Some(max_in_flight) = cli.max_in_flight {
            self.query.max_in_flight = max_in_flight;
        }
        if let Some(interval) = cli.poll_interval_secs {
            self.poll.interval_secs = interval;
        }
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<(), CliError> {
        if self.query.window_secs <= 0 {
            return Err(CliError::Config(
                "query.window_secs must be greater than 0".to_string(),
            ));
        }

        if self.query.limit == 0 || self.query.limit > MAX_RESULT_LIMIT {
            return Err(CliError::Config(format!(
                "query.limit must be between 1 and {MAX_RESULT_LIMIT}"
            )));
        }

        if self.query.message_field.trim().is_empty() {
            return Err(CliError::Config(
                "query.message_field cannot be empty".to_string(),
            ));
        }

        if self.query.max_in_flight == 0 {
            return Err(CliError::Config(
                "query.max_in_flight must be greater than 0".to_string(),
            ));
        }

        if self.poll.interval_secs == 0 {
            return Err(CliError::Config(
                "poll.interval_secs must be greater than 0".to_string(),
            ));
        }

        if self.poll.strategy == PollStrategy::Exponential {
            if self.poll.max_interval_secs < self.poll.interval_secs {
                return Err(CliError::Config(
                    "poll.max_interval_secs must be at least poll.interval_secs".to_string(),
                ));
            }
            if !self.poll.multiplier.is_finite() || self.poll.multiplier < 1.0 {
                return Err(CliError::Config(
                    "poll.multiplier must be a finite number >= 1.0".to_string(),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(CliError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Driver settings derived from this configuration.
    #[must_use]
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig::default()
            .with_max_window_secs(self.query.window_secs)
            .with_result_limit(self.query.limit)
            .with_message_field(self.query.message_field.clone())
            .with_backoff(self.poll.backoff())
            .with_max_in_flight(self.query.max_in_flight)
    }

    /// Overall deadline, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
