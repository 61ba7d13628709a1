//! Error types for the query driver.

use thiserror::Error;

use crate::types::{QueryStatus, QueryWindow};

/// Boxed error returned by a query-service transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while sweeping a time range.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested range ends before it starts.
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Range start in epoch seconds.
        start: i64,
        /// Range end in epoch seconds.
        end: i64,
    },

    /// The maximum window width is not positive.
    #[error("invalid window width: {0} seconds")]
    InvalidWindowWidth(i64),

    /// The backend refused to start a query job.
    #[error("query submission rejected for window {window}: {message}")]
    Submit {
        /// Window whose job was rejected.
        window: QueryWindow,
        /// Backend-provided reason.
        message: String,
    },

    /// A query job reached an unsuccessful terminal status.
    #[error("query for window {window} ended with status {status}")]
    QueryFailed {
        /// Window whose job failed.
        window: QueryWindow,
        /// Terminal status reported by the backend.
        status: QueryStatus,
    },

    /// The caller cancelled the run.
    #[error("query run cancelled")]
    Cancelled,

    /// The transport failed; the underlying error is passed through.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}

impl QueryError {
    /// Returns true if the error was caused by caller cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = QueryError::InvalidRange { start: 10, end: 5 };
        assert_eq!(err.to_string(), "invalid range: end 5 is before start 10");

        let err = QueryError::InvalidWindowWidth(0);
        assert_eq!(err.to_string(), "invalid window width: 0 seconds");

        let err = QueryError::Cancelled;
        assert_eq!(err.to_string(), "query run cancelled");
    }

    #[test]
    fn error_display_includes_window() {
        let err = QueryError::QueryFailed {
            window: QueryWindow::new(60, 120),
            status: QueryStatus::Cancelled,
        };
        assert_eq!(
            err.to_string(),
            "query for window [60, 120) ended with status Cancelled"
        );

        let err = QueryError::Submit {
            window: QueryWindow::new(0, 60),
            message: "log group does not exist".to_string(),
        };
        assert!(err.to_string().contains("[0, 60)"));
        assert!(err.to_string().contains("log group does not exist"));
    }

    #[test]
    fn transport_error_keeps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out");
        let err = QueryError::Transport(Box::new(io_err));
        assert!(err.to_string().contains("connect timed out"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn is_cancelled_only_for_cancelled() {
        assert!(QueryError::Cancelled.is_cancelled());
        assert!(!QueryError::InvalidWindowWidth(-1).is_cancelled());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QueryError>();
    }
}
