//! CloudWatch Logs Insights implementation of [`LogQueryClient`].
//!
//! `StartQuery` submits a job for one window; `GetQueryResults` reports its
//! status and, once complete, its rows.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatchlogs::Client;
use aws_sdk_cloudwatchlogs::config::http::HttpResponse;
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, SdkError};
use logsweep_core::{
    ClientError, JobId, LogQueryClient, LogRecord, PollResponse, QueryStatistics, QueryStatus,
    ResultField, SubmitRequest,
};
use tracing::debug;

/// Builds the Insights query for a message filter.
///
/// The filter is embedded in a `/.../` regex literal, so `/` is escaped.
#[must_use]
pub fn build_query(filter: &str) -> String {
    let pattern = filter.replace('/', "\\/");
    format!(
        "fields @timestamp, @message, @logStream, @log\n\
         | filter @message like /{pattern}/\n\
         | sort @timestamp desc"
    )
}

/// Query client backed by the AWS SDK.
#[derive(Debug, Clone)]
pub struct CloudWatchClient {
    client: Client,
}

impl CloudWatchClient {
    /// Resolves credentials and region from the shared AWS config.
    pub async fn connect(profile: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = loader.load().await;
        debug!(
            profile = profile.unwrap_or("default"),
            region = ?config.region(),
            "loaded AWS configuration"
        );
        Self::from_client(Client::new(&config))
    }

    /// Wraps an already configured SDK client.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl LogQueryClient for CloudWatchClient {
    async fn submit(&self, request: &SubmitRequest) -> Result<JobId, ClientError> {
        let output = self
            .client
            .start_query()
            .log_group_name(&request.source)
            .query_string(build_query(&request.filter))
            .start_time(request.window.start)
            .end_time(request.window.end)
            .limit(i32::try_from(request.limit).unwrap_or(i32::MAX))
            .send()
            .await
            .map_err(classify)?;

        output
            .query_id()
            .map(JobId::new)
            .ok_or_else(|| ClientError::Rejected("StartQuery returned no query id".to_string()))
    }

    async fn poll(&self, job: &JobId) -> Result<PollResponse, ClientError> {
        let output = self
            .client
            .get_query_results()
            .query_id(job.as_str())
            .send()
            .await
            .map_err(classify)?;

        let status = output
            .status()
            .map_or_else(|| QueryStatus::Unknown(String::new()), |s| {
                QueryStatus::from_name(s.as_str())
            });

        let records = output
            .results()
            .iter()
            .map(|row| LogRecord {
                fields: row
                    .iter()
                    .filter_map(|f| {
                        Some(ResultField {
                            field: f.field()?.to_string(),
                            value: f.value()?.to_string(),
                        })
                    })
                    .collect(),
            })
            .collect();

        let statistics = output.statistics().map(|s| QueryStatistics {
            records_matched: s.records_matched(),
            records_scanned: s.records_scanned(),
            bytes_scanned: s.bytes_scanned(),
        });

        Ok(PollResponse {
            status,
            records,
            statistics,
        })
    }
}

/// Service errors are backend rejections; everything else is transport.
fn classify<E>(err: SdkError<E, HttpResponse>) -> ClientError
where
    E: std::error::Error + Send + Sync + 'static,
{
    if matches!(err, SdkError::ServiceError(_)) {
        ClientError::Rejected(DisplayErrorContext(&err).to_string())
    } else {
        ClientError::transport(err)
    }
}
