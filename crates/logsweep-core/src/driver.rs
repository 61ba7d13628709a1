//! The windowed query driver.
//!
//! [`QueryDriver`] walks the windows of a [`WindowPlanner`] and, for each one,
//! submits a job, polls it until it reaches a terminal status and extracts the
//! message field of every returned record. Outcomes are handed to the caller
//! in window order as soon as they are available.
//!
//! ```text
//!  submit ──► poll ──► Scheduled/Running ──► sleep(backoff) ──► poll ...
//!                 ├──► Complete ──► extract ──► next window
//!                 └──► Failed/Cancelled/Timeout/other ──► QueryFailed (run aborts)
//! ```
//!
//! Every suspension point (submit, poll, backoff sleep) also waits on the
//! caller's [`CancellationToken`]. A cancelled run abandons the current job
//! without asking the backend to stop it.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::backoff::BackoffPolicy;
use crate::client::{ClientError, LogQueryClient};
use crate::error::{QueryError, Result};
use crate::reorder::ReorderBuffer;
use crate::stream::OutcomeStream;
use crate::types::{
    DEFAULT_MESSAGE_FIELD, JobId, LogRecord, PollResponse, QueryWindow, RunSummary, SubmitRequest,
    TimeRange, WindowOutcome,
};
use crate::window::{DEFAULT_MAX_WINDOW_SECS, WindowPlanner};

/// Maximum number of records the backend returns per job.
pub const DEFAULT_RESULT_LIMIT: u32 = 10_000;

/// Tuning for a [`QueryDriver`].
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Widest window submitted as a single job, in seconds.
    pub max_window_secs: i64,
    /// Result limit sent with every submission.
    pub result_limit: u32,
    /// Name of the field holding the log line.
    pub message_field: String,
    /// Delay policy between polls of a pending job.
    pub backoff: BackoffPolicy,
    /// Number of windows allowed to have a job outstanding at once.
    pub max_in_flight: usize,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_window_secs: DEFAULT_MAX_WINDOW_SECS,
            result_limit: DEFAULT_RESULT_LIMIT,
            message_field: DEFAULT_MESSAGE_FIELD.to_string(),
            backoff: BackoffPolicy::default(),
            max_in_flight: 1,
        }
    }
}

impl DriverConfig {
    /// Sets the maximum window width.
    #[must_use]
    pub const fn with_max_window_secs(mut self, secs: i64) -> Self {
        self.max_window_secs = secs;
        self
    }

    /// Sets the per-job result limit.
    #[must_use]
    pub const fn with_result_limit(mut self, limit: u32) -> Self {
        self.result_limit = limit;
        self
    }

    /// Sets the message field name.
    #[must_use]
    pub fn with_message_field(mut self, field: impl Into<String>) -> Self {
        self.message_field = field.into();
        self
    }

    /// Sets the poll backoff policy.
    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets how many windows may be queried concurrently.
    #[must_use]
    pub const fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }
}

/// What to search for and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepRequest {
    /// Text pattern records must match
    pub filter: String,
    /// Log source identifier (e.g. a log group name)
    pub source: String,
    /// Range to sweep
    pub range: TimeRange,
}

impl SweepRequest {
    /// Creates a sweep request.
    #[must_use]
    pub fn new(filter: impl Into<String>, source: impl Into<String>, range: TimeRange) -> Self {
        Self {
            filter: filter.into(),
            source: source.into(),
            range,
        }
    }
}

/// Drives query jobs window by window over a [`LogQueryClient`].
#[derive(Debug)]
pub struct QueryDriver<C> {
    client: C,
    config: DriverConfig,
}

impl<C: LogQueryClient> QueryDriver<C> {
    /// Creates a driver with the default configuration.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_config(client, DriverConfig::default())
    }

    /// Creates a driver with the given configuration.
    #[must_use]
    pub const fn with_config(client: C, config: DriverConfig) -> Self {
        Self { client, config }
    }

    /// Sweeps the requested range, calling `on_window` once per window in
    /// window order.
    ///
    /// Outcomes passed to `on_window` before an error stay valid; the run as
    /// a whole still fails.
    ///
    /// # Errors
    ///
    /// Returns the first planner, submission, job, transport or cancellation
    /// error. No further windows are submitted after an error.
    pub async fn run<F>(
        &self,
        request: &SweepRequest,
        cancel: &CancellationToken,
        mut on_window: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(WindowOutcome),
    {
        let planner = WindowPlanner::new(request.range, self.config.max_window_secs)?;
        info!(
            source = %request.source,
            range = %request.range,
            windows = planner.window_count(),
            max_in_flight = self.config.max_in_flight,
            "starting sweep"
        );

        let mut summary = RunSummary::default();
        if self.config.max_in_flight <= 1 {
            for (index, window) in planner.windows().enumerate() {
                if cancel.is_cancelled() {
                    return Err(QueryError::Cancelled);
                }
                let outcome = self.query_window(request, index, window, cancel).await?;
                summary.record(&outcome);
                on_window(outcome);
            }
        } else {
            self.run_pipelined(request, &planner, cancel, &mut summary, &mut on_window)
                .await?;
        }

        info!(
            windows = summary.windows,
            matches = summary.matches,
            messages = summary.messages,
            "sweep complete"
        );
        Ok(summary)
    }

    /// Keeps up to `max_in_flight` windows outstanding and releases their
    /// outcomes through a [`ReorderBuffer`].
    async fn run_pipelined<F>(
        &self,
        request: &SweepRequest,
        planner: &WindowPlanner,
        cancel: &CancellationToken,
        summary: &mut RunSummary,
        on_window: &mut F,
    ) -> Result<()>
    where
        F: FnMut(WindowOutcome),
    {
        let mut windows = planner.windows().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut buffer = ReorderBuffer::new();

        loop {
            while in_flight.len() < self.config.max_in_flight {
                let Some((index, window)) = windows.next() else {
                    break;
                };
                if cancel.is_cancelled() {
                    return Err(QueryError::Cancelled);
                }
                in_flight.push(async move {
                    (index, self.query_window(request, index, window, cancel).await)
                });
            }

            let Some((index, result)) = in_flight.next().await else {
                break;
            };
            buffer.insert(index, result?);
            trace!(
                window_index = index,
                waiting_for = buffer.next_index(),
                held = buffer.pending_len(),
                "window finished"
            );
            for outcome in buffer.drain_ready() {
                summary.record(&outcome);
                on_window(outcome);
            }
        }
        Ok(())
    }

    /// Runs the submit / poll / extract protocol for a single window.
    async fn query_window(
        &self,
        request: &SweepRequest,
        index: usize,
        window: QueryWindow,
        cancel: &CancellationToken,
    ) -> Result<WindowOutcome> {
        let submit = SubmitRequest {
            filter: request.filter.clone(),
            source: request.source.clone(),
            window,
            limit: self.config.result_limit,
        };

        let job = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(QueryError::Cancelled),
            result = self.client.submit(&submit) => result.map_err(|err| match err {
                ClientError::Rejected(message) => QueryError::Submit { window, message },
                ClientError::Transport(source) => QueryError::Transport(source),
            })?,
        };
        debug!(window_index = index, %window, job_id = %job, "query submitted");

        let response = self.await_completion(&job, index, window, cancel).await?;
        let outcome = self.extract(index, window, response);

        info!(
            window_index = index,
            %window,
            match_count = outcome.match_count,
            messages = outcome.messages.len(),
            "window complete"
        );
        if outcome.truncated {
            warn!(
                window_index = index,
                %window,
                limit = self.config.result_limit,
                "result limit reached, window may be incomplete"
            );
        }
        Ok(outcome)
    }

    /// Polls `job` until it reaches a terminal status.
    async fn await_completion(
        &self,
        job: &JobId,
        index: usize,
        window: QueryWindow,
        cancel: &CancellationToken,
    ) -> Result<PollResponse> {
        let mut attempt: u32 = 0;
        loop {
            let response = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QueryError::Cancelled),
                result = self.client.poll(job) => result.map_err(poll_error)?,
            };

            if response.status.is_success() {
                return Ok(response);
            }
            if response.status.is_terminal() {
                let status = response.status;
                warn!(window_index = index, %window, job_id = %job, %status, "query failed");
                return Err(QueryError::QueryFailed { window, status });
            }

            attempt = attempt.saturating_add(1);
            let delay = self.config.backoff.delay_for_attempt(attempt);
            trace!(
                window_index = index,
                job_id = %job,
                status = %response.status,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "query pending"
            );
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QueryError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
    }

    fn extract(&self, index: usize, window: QueryWindow, response: PollResponse) -> WindowOutcome {
        let match_count = response.records.len();
        if let Some(stats) = &response.statistics {
            debug!(
                window_index = index,
                records_matched = stats.records_matched,
                records_scanned = stats.records_scanned,
                bytes_scanned = stats.bytes_scanned,
                "query statistics"
            );
        }
        WindowOutcome {
            window_index: index,
            window,
            match_count,
            messages: extract_messages(&response.records, &self.config.message_field),
            statistics: response.statistics,
            truncated: self.config.result_limit > 0
                && match_count >= self.config.result_limit as usize,
        }
    }
}

impl<C: LogQueryClient + 'static> QueryDriver<C> {
    /// Spawns the sweep onto the tokio runtime and streams outcomes.
    ///
    /// The stream yields one `Ok` item per window, in window order, followed
    /// by a single `Err` if the run fails. Dropping the stream cancels the run.
    #[must_use]
    pub fn stream(self, request: SweepRequest, cancel: &CancellationToken) -> OutcomeStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let token = cancel.child_token();
        let run_token = token.clone();

        tokio::spawn(async move {
            let result = self
                .run(&request, &run_token, |outcome| {
                    if tx.send(Ok(outcome)).is_err() {
                        run_token.cancel();
                    }
                })
                .await;
            if let Err(err) = result {
                let _ = tx.send(Err(err));
            }
        });

        OutcomeStream::new(rx, token)
    }
}

/// Values of `field` across `records`, in input order.
///
/// Records without the field contribute nothing.
#[must_use]
pub fn extract_messages(records: &[LogRecord], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| record.get(field))
        .map(str::to_string)
        .collect()
}

fn poll_error(err: ClientError) -> QueryError {
    match err {
        ClientError::Transport(source) => QueryError::Transport(source),
        rejected @ ClientError::Rejected(_) => QueryError::Transport(Box::new(rejected)),
    }
}
