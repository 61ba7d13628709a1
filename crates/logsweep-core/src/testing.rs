//! Scripted in-memory query client for driver tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use parking_lot::Mutex;

use crate::client::{ClientError, LogQueryClient};
use crate::types::{JobId, PollResponse, SubmitRequest};

/// Answers polls from per-window scripts keyed by window start.
///
/// The last scripted response repeats forever. Unscripted windows complete
/// immediately with no records. Submits and polls for a window can be held
/// open for a fixed time to leave a call pending.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    scripts: Mutex<HashMap<i64, VecDeque<PollResponse>>>,
    rejections: Mutex<HashMap<i64, String>>,
    poll_failures: Mutex<HashMap<i64, String>>,
    submits: Mutex<Vec<SubmitRequest>>,
    polls: Mutex<HashMap<i64, usize>>,
    submit_delays: Mutex<HashMap<i64, Duration>>,
    poll_delays: Mutex<HashMap<i64, Duration>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(&self, window_start: i64, responses: Vec<PollResponse>) {
        self.scripts.lock().insert(window_start, responses.into());
    }

    pub(crate) fn reject(&self, window_start: i64, message: &str) {
        self.rejections
            .lock()
            .insert(window_start, message.to_string());
    }

    pub(crate) fn fail_polls(&self, window_start: i64, message: &str) {
        self.poll_failures
            .lock()
            .insert(window_start, message.to_string());
    }

    pub(crate) fn delay_submit(&self, window_start: i64, delay: Duration) {
        self.submit_delays.lock().insert(window_start, delay);
    }

    pub(crate) fn delay_polls(&self, window_start: i64, delay: Duration) {
        self.poll_delays.lock().insert(window_start, delay);
    }

    pub(crate) fn submits(&self) -> Vec<SubmitRequest> {
        self.submits.lock().clone()
    }

    pub(crate) fn poll_count(&self, window_start: i64) -> usize {
        self.polls.lock().get(&window_start).copied().unwrap_or(0)
    }

    fn window_of(job: &JobId) -> Result<i64, ClientError> {
        job.as_str()
            .strip_prefix("job-")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ClientError::Rejected(format!("unknown query id {job}")))
    }
}

impl LogQueryClient for ScriptedClient {
    async fn submit(&self, request: &SubmitRequest) -> Result<JobId, ClientError> {
        let start = request.window.start;
        self.submits.lock().push(request.clone());
        let delay = self.submit_delays.lock().get(&start).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.rejections.lock().get(&start) {
            return Err(ClientError::Rejected(message.clone()));
        }
        Ok(JobId::new(format!("job-{start}")))
    }

    async fn poll(&self, job: &JobId) -> Result<PollResponse, ClientError> {
        let start = Self::window_of(job)?;
        *self.polls.lock().entry(start).or_default() += 1;
        let delay = self.poll_delays.lock().get(&start).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.poll_failures.lock().get(&start) {
            return Err(ClientError::transport(std::io::Error::other(message.clone())));
        }

        let mut scripts = self.scripts.lock();
        let Some(script) = scripts.get_mut(&start) else {
            return Ok(PollResponse::complete(Vec::new()));
        };
        let response = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(response.unwrap_or_else(|| PollResponse::complete(Vec::new())))
    }
}
