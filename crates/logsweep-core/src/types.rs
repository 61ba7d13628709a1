//! Core types for windowed log queries.
//!
//! This module defines:
//! - [`TimeRange`] — The half-open range a run sweeps
//! - [`QueryWindow`] — One backend-legal sub-range
//! - [`JobId`] / [`QueryStatus`] — Backend job handle and its state machine
//! - [`LogRecord`] — One matched entry as returned by the backend
//! - [`WindowOutcome`] — Extracted messages for one window

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Field that carries the raw log line in query results.
pub const DEFAULT_MESSAGE_FIELD: &str = "@message";

/// Half-open time range `[start, end)` in epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start of the range (inclusive)
    pub start: i64,
    /// End of the range (exclusive)
    pub end: i64,
}

impl TimeRange {
    /// Creates a range, rejecting one that ends before it starts.
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if end < start {
            return Err(QueryError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Width of the range in seconds.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range covers no time at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A single sub-range submitted as one backend job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryWindow {
    /// Start of the window (inclusive), epoch seconds
    pub start: i64,
    /// End of the window (exclusive), epoch seconds
    pub end: i64,
}

impl QueryWindow {
    /// Creates a window without validation.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Width of the window in seconds.
    #[must_use]
    pub const fn width(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

impl fmt::Display for QueryWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Opaque identifier of a backend query job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl JobId {
    /// Creates a job id from any string-like token.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backend status of a query job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryStatus {
    /// Accepted, waiting to run.
    Scheduled,
    /// Currently executing.
    Running,
    /// Finished; results are available.
    Complete,
    /// Finished unsuccessfully.
    Failed,
    /// Cancelled on the backend side.
    Cancelled,
    /// Exceeded the backend's execution limit.
    Timeout,
    /// Any status this crate does not recognize.
    Unknown(String),
}

impl QueryStatus {
    /// Returns true while the job is still making progress.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Scheduled | Self::Running)
    }

    /// Returns true once the backend will report no further transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// Returns true only for a successful terminal status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Maps a backend status string to a status.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            "Timeout" => Self::Timeout,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the backend name of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Timeout => "Timeout",
            Self::Unknown(name) => name,
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(field, value)` pair of a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultField {
    /// Field name, e.g. `@message`
    pub field: String,
    /// Field value as rendered by the backend
    pub value: String,
}

/// A matched entry: an ordered list of fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Fields in backend order
    pub fields: Vec<ResultField>,
}

impl LogRecord {
    /// Creates a record from `(field, value)` pairs.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(field, value)| ResultField {
                    field: field.into(),
                    value: value.into(),
                })
                .collect(),
        }
    }

    /// Returns the value of the first field named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == name)
            .map(|f| f.value.as_str())
    }
}

/// Scan statistics the backend reports for a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryStatistics {
    /// Number of log events that matched the query
    pub records_matched: f64,
    /// Number of log events scanned
    pub records_scanned: f64,
    /// Bytes scanned
    pub bytes_scanned: f64,
}

/// Parameters for submitting one query job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Text pattern to filter messages by
    pub filter: String,
    /// Log source the query runs against
    pub source: String,
    /// Window the job covers
    pub window: QueryWindow,
    /// Maximum number of records to return
    pub limit: u32,
}

/// One answer to a status poll.
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Current job status
    pub status: QueryStatus,
    /// Returned records; only meaningful when `status` is `Complete`
    pub records: Vec<LogRecord>,
    /// Scan statistics, if the backend reported them
    pub statistics: Option<QueryStatistics>,
}

impl PollResponse {
    /// A response carrying only a status.
    #[must_use]
    pub const fn status(status: QueryStatus) -> Self {
        Self {
            status,
            records: Vec::new(),
            statistics: None,
        }
    }

    /// A completed response with records.
    #[must_use]
    pub const fn complete(records: Vec<LogRecord>) -> Self {
        Self {
            status: QueryStatus::Complete,
            records,
            statistics: None,
        }
    }
}

/// Extracted messages for one completed window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowOutcome {
    /// Position of the window in the planned sequence
    pub window_index: usize,
    /// The window that was queried
    pub window: QueryWindow,
    /// Number of records the backend returned
    pub match_count: usize,
    /// Message field values, in backend order
    pub messages: Vec<String>,
    /// Scan statistics reported with the final poll
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<QueryStatistics>,
    /// True if `match_count` reached the submission limit
    pub truncated: bool,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Windows that completed and were emitted
    pub windows: usize,
    /// Sum of per-window match counts
    pub matches: usize,
    /// Sum of extracted messages
    pub messages: usize,
}

impl RunSummary {
    /// Folds one window outcome into the totals.
    pub fn record(&mut self, outcome: &WindowOutcome) {
        self.windows += 1;
        self.matches += outcome.match_count;
        self.messages += outcome.messages.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn time_range_rejects_end_before_start() {
        let err = TimeRange::new(100, 99);
        assert!(matches!(
            err,
            Err(QueryError::InvalidRange { start: 100, end: 99 })
        ));
    }

    #[test]
    fn time_range_accepts_empty() {
        let range = TimeRange::new(5, 5);
        assert!(range.is_ok());
        if let Ok(range) = range {
            assert!(range.is_empty());
            assert_eq!(range.width(), 0);
        }
    }

    #[test]
    fn window_display_is_half_open() {
        assert_eq!(QueryWindow::new(0, 60).to_string(), "[0, 60)");
    }

    #[test_case("Scheduled", QueryStatus::Scheduled ; "scheduled")]
    #[test_case("Running", QueryStatus::Running ; "running")]
    #[test_case("Complete", QueryStatus::Complete ; "complete")]
    #[test_case("Failed", QueryStatus::Failed ; "failed")]
    #[test_case("Cancelled", QueryStatus::Cancelled ; "cancelled")]
    #[test_case("Timeout", QueryStatus::Timeout ; "timeout")]
    #[test_case("Exploded", QueryStatus::Unknown("Exploded".to_string()) ; "unknown")]
    fn status_from_name(name: &str, expected: QueryStatus) {
        let status = QueryStatus::from_name(name);
        assert_eq!(status, expected);
        assert_eq!(status.as_str(), name);
    }

    #[test_case(QueryStatus::Scheduled, true, false ; "scheduled keeps polling")]
    #[test_case(QueryStatus::Running, true, false ; "running keeps polling")]
    #[test_case(QueryStatus::Complete, false, true ; "complete succeeds")]
    #[test_case(QueryStatus::Failed, false, false ; "failed is terminal")]
    #[test_case(QueryStatus::Cancelled, false, false ; "cancelled is terminal")]
    #[test_case(QueryStatus::Timeout, false, false ; "timeout is terminal")]
    #[test_case(QueryStatus::Unknown("X".into()), false, false ; "unknown is terminal")]
    fn status_classification(status: QueryStatus, pending: bool, success: bool) {
        assert_eq!(status.is_pending(), pending);
        assert_eq!(status.is_terminal(), !pending);
        assert_eq!(status.is_success(), success);
    }

    #[test]
    fn record_get_returns_first_match() {
        let record = LogRecord::from_pairs([
            ("@timestamp", "2024-01-01 00:00:00.000"),
            ("@message", "first"),
            ("@message", "second"),
        ]);
        assert_eq!(record.get("@message"), Some("first"));
        assert_eq!(record.get("@logStream"), None);
    }

    #[test]
    fn outcome_serializes_without_missing_statistics() {
        let outcome = WindowOutcome {
            window_index: 1,
            window: QueryWindow::new(60, 120),
            match_count: 2,
            messages: vec!["err: timeout".to_string()],
            statistics: None,
            truncated: false,
        };
        let json = serde_json::to_value(&outcome).unwrap_or_default();
        assert_eq!(json["window_index"], 1);
        assert_eq!(json["window"]["start"], 60);
        assert_eq!(json["messages"][0], "err: timeout");
        assert!(json.get("statistics").is_none());
    }

    #[test]
    fn summary_accumulates() {
        let mut summary = RunSummary::default();
        summary.record(&WindowOutcome {
            window_index: 0,
            window: QueryWindow::new(0, 60),
            match_count: 3,
            messages: vec!["a".into(), "b".into()],
            statistics: None,
            truncated: false,
        });
        assert_eq!(
            summary,
            RunSummary {
                windows: 1,
                matches: 3,
                messages: 2
            }
        );
    }
}
