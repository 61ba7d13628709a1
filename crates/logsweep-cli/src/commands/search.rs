//! Search command implementation.
//!
//! Runs the windowed query driver and prints each window as soon as it
//! completes.

use std::io::Write;

use logsweep_core::{DriverConfig, LogQueryClient, QueryDriver, RunSummary, SweepRequest};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;
use crate::output::OutputFormat;

/// Handler for the search command.
pub struct SearchCommand {
    config: DriverConfig,
}

impl SearchCommand {
    /// Creates a new search command handler.
    #[must_use]
    pub const fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Executes the search, writing each window's results to `out`.
    ///
    /// Windows already written stay written when the search fails part way.
    ///
    /// # Errors
    ///
    /// Returns error if the search fails, is cancelled, or output cannot be
    /// written.
    pub async fn execute<C, W>(
        &self,
        client: C,
        out: &mut W,
        format: &OutputFormat,
        request: &SweepRequest,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, CliError>
    where
        C: LogQueryClient,
        W: Write,
    {
        let driver = QueryDriver::with_config(client, self.config.clone());
        let mut write_error = None;

        let result = driver
            .run(request, cancel, |outcome| {
                if write_error.is_some() {
                    return;
                }
                if let Err(e) = format.write(out, &outcome) {
                    write_error = Some(e);
                    cancel.cancel();
                }
            })
            .await;

        if let Some(e) = write_error {
            return Err(e);
        }
        let summary = result?;
        info!(
            log_group = %request.source,
            windows = summary.windows,
            matches = summary.matches,
            "search finished"
        );
        Ok(summary)
    }
}
