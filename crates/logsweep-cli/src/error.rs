//! CLI error types.

use logsweep_core::QueryError;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A start or end time could not be interpreted.
    #[error("invalid time '{input}': {reason}")]
    Time {
        /// The string supplied by the user.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The sweep failed.
    #[error(transparent)]
    Query(#[from] QueryError),

    /// Output formatting error.
    #[error("format error: {0}")]
    Format(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Query(QueryError::Cancelled) => 130,
            Self::Config(_) | Self::Time { .. } => 2,
            _ => 1,
        }
    }
}
