//! Error types for the qjob client

use std::time::Duration;

use qjob_core::domain::job::{ErrorData, JobStatus};
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the qjob client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse a response or a result payload
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The credential provider could not produce a token
    #[error("Credential error: {0}")]
    Credential(String),

    /// Workspace is not fully specified
    #[error("Invalid workspace configuration: {0}")]
    Configuration(String),

    /// Polling exceeded the caller's budget
    #[error("Job {job_id}: the wait time has exceeded {} seconds", .timeout.as_secs_f64())]
    Timeout {
        job_id: String,
        timeout: Duration,
    },

    /// Job reached a terminal status other than Succeeded
    #[error(
        "Cannot retrieve results as job {job_id} execution failed (status: {status}, error: {})",
        .error.as_ref().map(ToString::to_string).unwrap_or_else(|| "none".to_string())
    )]
    JobFailed {
        job_id: String,
        status: JobStatus,
        error: Option<ErrorData>,
    },
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
