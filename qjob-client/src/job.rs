//! Remote jobs
//!
//! A [`Job`] wraps a snapshot of a remote job's details together with the
//! workspace it belongs to. Status polling and result retrieval are exposed
//! through the [`Refreshable`] and [`ResultFetchable`] capabilities.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use qjob_core::domain::job::{JobDetails, JobStatus};
use serde_json::Value as JsonValue;
use tracing::debug;
use uuid::Uuid;

use crate::backoff::{DEFAULT_MAX_POLL_WAIT, PollBackoff};
use crate::blob::BlobUri;
use crate::error::{ClientError, Result};
use crate::workspace::Workspace;

/// Timeout callers use for result retrieval unless they pick their own
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Callback invoked with the cached details before each poll sleep
pub type ProgressFn = Arc<dyn Fn(&JobDetails) + Send + Sync>;

/// Options for [`Refreshable::wait_until_completed`]
#[derive(Clone)]
pub struct WaitOptions {
    /// Ceiling for the poll interval
    pub max_poll_wait: Duration,
    /// Budget for the whole wait, measured in intended sleep time
    pub timeout: Option<Duration>,
    pub progress: Option<ProgressFn>,
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_poll_wait(mut self, max_poll_wait: Duration) -> Self {
        self.max_poll_wait = max_poll_wait;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, progress: impl Fn(&JobDetails) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_poll_wait: DEFAULT_MAX_POLL_WAIT,
            timeout: None,
            progress: None,
        }
    }
}

impl fmt::Debug for WaitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitOptions")
            .field("max_poll_wait", &self.max_poll_wait)
            .field("timeout", &self.timeout)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Something whose remote state can be re-fetched and waited on
#[async_trait]
pub trait Refreshable: Send {
    /// Last fetched details
    fn details(&self) -> &JobDetails;

    /// Replaces the cached details with a fresh remote copy
    async fn refresh(&mut self) -> Result<()>;

    /// Whether the cached status is terminal. Does not refresh.
    fn has_completed(&self) -> bool {
        self.details().is_terminal()
    }

    /// Polls until the status is terminal
    ///
    /// Refreshes once up front, then sleeps with bounded exponential backoff
    /// between refreshes. Fails with [`ClientError::Timeout`] once the summed
    /// sleep time reaches `options.timeout`.
    async fn wait_until_completed(&mut self, options: &WaitOptions) -> Result<()> {
        self.refresh().await?;

        let mut backoff = PollBackoff::new(options.max_poll_wait);
        let mut elapsed = Duration::ZERO;

        while !self.has_completed() {
            if let Some(timeout) = options.timeout {
                if elapsed >= timeout {
                    return Err(ClientError::Timeout {
                        job_id: self.details().id.clone(),
                        timeout,
                    });
                }
            }

            debug!(
                "Waiting for job {}, it is in status '{}'",
                self.details().id,
                self.details()
                    .status
                    .map(JobStatus::as_str)
                    .unwrap_or("Unknown")
            );
            if let Some(progress) = &options.progress {
                progress(self.details());
            }

            let wait = backoff.current();
            tokio::time::sleep(wait).await;
            elapsed += wait;

            self.refresh().await?;
            backoff.advance();
        }

        Ok(())
    }
}

/// Something that produces a decoded result once it has finished
#[async_trait]
pub trait ResultFetchable: Refreshable {
    /// Waits for completion if needed and returns the decoded output
    ///
    /// `timeout` bounds the wait; `None` waits indefinitely.
    async fn get_results(&mut self, timeout: Option<Duration>) -> Result<JsonValue>;
}

/// A job submitted to (or fetched from) a workspace
#[derive(Debug, Clone)]
pub struct Job {
    id: String,
    workspace: Workspace,
    details: JobDetails,
    results: Option<JsonValue>,
}

impl Job {
    pub fn new(workspace: Workspace, details: JobDetails) -> Self {
        Self {
            id: details.id.clone(),
            workspace,
            details,
            results: None,
        }
    }

    /// Generates an id for a new job
    pub fn create_job_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Decoded results, once they have been fetched successfully
    pub fn results(&self) -> Option<&JsonValue> {
        self.results.as_ref()
    }

    /// Submits the job and adopts the details returned by the service
    pub async fn submit(&mut self) -> Result<()> {
        debug!("Submitting job with ID {}", self.id);
        let submitted = self.workspace.submit_job(self).await?;
        self.details = submitted.details;
        Ok(())
    }

    /// Downloads a blob produced by this job
    ///
    /// Signed URIs are fetched directly; unsigned ones are first exchanged for
    /// a signed URI through the workspace.
    pub async fn download_data(&self, uri: &str) -> Result<Vec<u8>> {
        let blob = BlobUri::parse(uri)?;

        let url = if blob.has_sas() {
            uri.to_string()
        } else {
            self.workspace
                .get_linked_storage_sas_uri(&blob.container, Some(&blob.blob))
                .await?
        };

        self.workspace.download_blob(&url).await
    }
}

#[async_trait]
impl Refreshable for Job {
    fn details(&self) -> &JobDetails {
        &self.details
    }

    async fn refresh(&mut self) -> Result<()> {
        self.details = self.workspace.get_job(&self.id).await?.details;
        Ok(())
    }
}

#[async_trait]
impl ResultFetchable for Job {
    async fn get_results(&mut self, timeout: Option<Duration>) -> Result<JsonValue> {
        if let Some(results) = &self.results {
            return Ok(results.clone());
        }

        if !self.has_completed() {
            let options = WaitOptions {
                timeout,
                ..WaitOptions::default()
            };
            self.wait_until_completed(&options).await?;
        }

        let Some(status) = self.details.status else {
            return Err(ClientError::InvalidRequest(format!(
                "job {} has no status",
                self.id
            )));
        };
        if status != JobStatus::Succeeded {
            return Err(ClientError::JobFailed {
                job_id: self.id.clone(),
                status,
                error: self.details.error_data.clone(),
            });
        }

        let uri = self.details.output_data_uri.clone().ok_or_else(|| {
            ClientError::InvalidRequest(format!("job {} has no output data URI", self.id))
        })?;

        let payload = self.download_data(&uri).await?;
        let text = String::from_utf8(payload)
            .map_err(|e| ClientError::ParseError(format!("result payload is not UTF-8: {}", e)))?;
        let results: JsonValue = serde_json::from_str(&text)
            .map_err(|e| ClientError::ParseError(format!("result payload is not JSON: {}", e)))?;

        self.results = Some(results.clone());
        Ok(results)
    }
}
