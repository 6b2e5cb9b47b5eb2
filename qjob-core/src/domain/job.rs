//! Job domain types

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Job details as reported by the remote job service
///
/// The client keeps a snapshot of this record and replaces it wholesale on
/// every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_data_format: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub input_params: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub provider_id: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data_format: Option<String>,
    /// Set by the service once the job has produced output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_data_uri: Option<String>,
    /// Absent until the service has accepted the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_execution_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_execution_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancellation_time: Option<DateTime<Utc>>,
    /// Only present on failed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_data: Option<ErrorData>,
}

impl JobDetails {
    /// Creates a submission record for a new job
    ///
    /// Server-assigned fields (status, timestamps, output URI) start empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider_id: impl Into<String>,
        target: impl Into<String>,
        container_uri: impl Into<String>,
        input_data_format: impl Into<String>,
        output_data_format: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            container_uri: Some(container_uri.into()),
            input_data_uri: None,
            input_data_format: Some(input_data_format.into()),
            input_params: HashMap::new(),
            provider_id: provider_id.into(),
            target: target.into(),
            metadata: HashMap::new(),
            output_data_format: Some(output_data_format.into()),
            output_data_uri: None,
            status: None,
            creation_time: None,
            begin_execution_time: None,
            end_execution_time: None,
            cancellation_time: None,
            error_data: None,
        }
    }

    pub fn with_input_data_uri(mut self, uri: impl Into<String>) -> Self {
        self.input_data_uri = Some(uri.into());
        self
    }

    pub fn with_input_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.input_params.insert(key.into(), value);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// True iff the cached status is terminal
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(|s| s.is_terminal())
    }
}

/// Job execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobStatus {
    Waiting,
    Executing,
    Succeeded,
    Failed,
    Cancelled,
    /// Any status this client does not recognise; never terminal
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Succeeded, Failed and Cancelled never change again
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Executing => "Executing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "waiting" => Ok(Self::Waiting),
            "executing" => Ok(Self::Executing),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

/// Error payload attached to a failed job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: String,
    pub message: String,
}

impl fmt::Display for ErrorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Optional predicates applied to a job listing
///
/// Every supplied predicate must hold; absent ones always hold.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    /// Searched anywhere in the job name
    pub name_match: Option<Regex>,
    pub status: Option<JobStatus>,
    /// Inclusive lower bound on the creation time
    pub created_after: Option<DateTime<Utc>>,
}

impl JobFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name_match(mut self, pattern: Regex) -> Self {
        self.name_match = Some(pattern);
        self
    }

    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_created_after(mut self, created_after: DateTime<Utc>) -> Self {
        self.created_after = Some(created_after);
        self
    }

    pub fn matches(&self, details: &JobDetails) -> bool {
        if let Some(pattern) = &self.name_match {
            if !pattern.is_match(&details.name) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if details.status != Some(status) {
                return false;
            }
        }

        if let Some(created_after) = self.created_after {
            match details.creation_time {
                Some(created) if created >= created_after => {}
                _ => return false,
            }
        }

        true
    }
}
