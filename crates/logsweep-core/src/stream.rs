//! Incremental delivery of window outcomes.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::Result;
use crate::types::WindowOutcome;

/// Stream of window outcomes produced by [`QueryDriver::stream`].
///
/// Dropping the stream cancels the background run.
///
/// [`QueryDriver::stream`]: crate::driver::QueryDriver::stream
pub struct OutcomeStream {
    receiver: mpsc::UnboundedReceiver<Result<WindowOutcome>>,
    _guard: DropGuard,
}

impl OutcomeStream {
    pub(crate) fn new(
        receiver: mpsc::UnboundedReceiver<Result<WindowOutcome>>,
        token: CancellationToken,
    ) -> Self {
        Self {
            receiver,
            _guard: token.drop_guard(),
        }
    }

    /// Receives the next outcome, or `None` once the run has finished.
    pub async fn recv(&mut self) -> Option<Result<WindowOutcome>> {
        self.receiver.recv().await
    }
}

impl Stream for OutcomeStream {
    type Item = Result<WindowOutcome>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

impl std::fmt::Debug for OutcomeStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutcomeStream").finish_non_exhaustive()
    }
}
