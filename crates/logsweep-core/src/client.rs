//! The query-service capability the driver depends on.
//!
//! [`LogQueryClient`] is the driver's entire dependency surface: submit a
//! job for one window, then poll it. Credential and SDK setup happen before a
//! client is handed to the driver, which keeps the driver testable against a
//! scripted fake.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::error::BoxError;
use crate::types::{JobId, PollResponse, SubmitRequest};

/// Errors a [`LogQueryClient`] may return.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend refused the request (bad filter, unknown source, throttling).
    #[error("request rejected: {0}")]
    Rejected(String),

    /// The request never got a backend answer.
    #[error(transparent)]
    Transport(BoxError),
}

impl ClientError {
    /// Wraps any transport-level error.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }
}

/// Client for an asynchronous log-query service.
pub trait LogQueryClient: Send + Sync {
    /// Starts a query job for one window.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] if the backend refuses the job.
    fn submit(
        &self,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<JobId, ClientError>> + Send;

    /// Fetches the current status of a job, with results once it is complete.
    ///
    /// # Errors
    ///
    /// Returns an error if the status cannot be retrieved.
    fn poll(&self, job: &JobId) -> impl Future<Output = Result<PollResponse, ClientError>> + Send;
}

impl<C: LogQueryClient> LogQueryClient for Arc<C> {
    fn submit(
        &self,
        request: &SubmitRequest,
    ) -> impl Future<Output = Result<JobId, ClientError>> + Send {
        (**self).submit(request)
    }

    fn poll(&self, job: &JobId) -> impl Future<Output = Result<PollResponse, ClientError>> + Send {
        (**self).poll(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_display() {
        let err = ClientError::Rejected("MalformedQueryException".to_string());
        assert_eq!(err.to_string(), "request rejected: MalformedQueryException");
    }

    #[test]
    fn transport_is_transparent() {
        let err = ClientError::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ));
        assert_eq!(err.to_string(), "connection reset");
    }
}
