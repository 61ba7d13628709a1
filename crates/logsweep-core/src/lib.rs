//! # logsweep-core
//!
//! Windowed asynchronous log query driver.
//!
//! Log-query backends such as CloudWatch Logs Insights only accept bounded
//! time windows per job and answer through submit / poll rather than a single
//! call. This crate sweeps an arbitrary range by planning fixed-width windows
//! and driving one job per window to completion.
//!
//! - [`WindowPlanner`] — Splits a [`TimeRange`] into contiguous [`QueryWindow`]s
//! - [`QueryDriver`] — Submits, polls and extracts each window in order
//! - [`LogQueryClient`] — The query-service capability the driver consumes
//! - [`BackoffPolicy`] — Delay between polls of a pending job
//! - [`ReorderBuffer`] — Releases pipelined completions in window order
//! - [`OutcomeStream`] — Incremental delivery of [`WindowOutcome`]s
//!
//! ## Example
//!
//! ```rust
//! use logsweep_core::{QueryWindow, TimeRange, WindowPlanner};
//!
//! let range = TimeRange::new(0, 130)?;
//! let planner = WindowPlanner::new(range, 60)?;
//! let windows: Vec<_> = planner.windows().collect();
//! assert_eq!(
//!     windows,
//!     vec![
//!         QueryWindow::new(0, 60),
//!         QueryWindow::new(60, 120),
//!         QueryWindow::new(120, 130),
//!     ]
//! );
//! # Ok::<(), logsweep_core::QueryError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backoff;
pub mod client;
pub mod driver;
pub mod error;
pub mod reorder;
pub mod stream;
pub mod types;
pub mod window;

#[cfg(test)]
mod testing;

// Re-export main types
pub use backoff::{BackoffPolicy, DEFAULT_POLL_INTERVAL};
pub use client::{ClientError, LogQueryClient};
pub use driver::{DEFAULT_RESULT_LIMIT, DriverConfig, QueryDriver, SweepRequest, extract_messages};
pub use error::{BoxError, QueryError, Result};
pub use reorder::ReorderBuffer;
pub use stream::OutcomeStream;
pub use types::{
    DEFAULT_MESSAGE_FIELD, JobId, LogRecord, PollResponse, QueryStatistics, QueryStatus,
    QueryWindow, ResultField, RunSummary, SubmitRequest, TimeRange, WindowOutcome,
};
pub use window::{DEFAULT_MAX_WINDOW_SECS, WindowPlanner, Windows};
