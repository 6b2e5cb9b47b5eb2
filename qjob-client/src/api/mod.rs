//! Remote job and storage APIs
//!
//! The traits in this module are the seams between the job lifecycle logic and
//! the remote service. [`QuantumClient`] implements them over HTTP; tests and
//! embedders can substitute their own implementations.

mod jobs;
mod storage;

use std::sync::Arc;

use async_trait::async_trait;
use qjob_core::domain::job::JobDetails;
use qjob_core::domain::workspace::WorkspaceId;
use qjob_core::dto::job::JobPage;
use qjob_core::dto::storage::BlobDetails;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credential::TokenCredential;
use crate::error::{ClientError, Result};

/// Version of the job management API this client speaks
pub const API_VERSION: &str = "2022-09-12-preview";

/// Remote job management operations
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// Creates a job and returns the details accepted by the service
    async fn create(&self, job_id: &str, details: &JobDetails) -> Result<JobDetails>;

    /// Fetches the current details of a job
    async fn get(&self, job_id: &str) -> Result<JobDetails>;

    /// Requests cancellation of a job
    async fn cancel(&self, job_id: &str) -> Result<()>;

    /// Fetches one page of the job listing
    ///
    /// `next_link` is `None` for the first page and the previous page's
    /// continuation link afterwards.
    async fn list_page(&self, next_link: Option<&str>) -> Result<JobPage>;
}

/// Remote storage operations
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Returns a signed URI for a container or a blob within it
    async fn sas_uri(&self, blob: &BlobDetails) -> Result<String>;
}

/// Base URL of the service in a given (normalized) region
pub fn default_base_url(location: &str) -> String {
    format!("https://{}.quantum.azure.com", location)
}

/// HTTP client for the remote job and storage APIs of one workspace
#[derive(Clone)]
pub struct QuantumClient {
    /// Base URL of the service (e.g., "https://eastus.quantum.azure.com")
    base_url: String,
    /// Workspace the requests are scoped to
    workspace: WorkspaceId,
    credential: Arc<dyn TokenCredential>,
    /// HTTP client instance
    client: Client,
}

impl QuantumClient {
    /// Create a new client for a workspace
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the service
    /// * `workspace` - Identity of the workspace the requests are scoped to
    /// * `credential` - Provider of bearer tokens
    pub fn new(
        base_url: impl Into<String>,
        workspace: WorkspaceId,
        credential: Arc<dyn TokenCredential>,
    ) -> Self {
        Self::with_client(base_url, workspace, credential, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        workspace: WorkspaceId,
        credential: Arc<dyn TokenCredential>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(
            "Creating client for: subs:{}, rg={}, ws={}, frontdoor={}",
            workspace.subscription_id, workspace.resource_group, workspace.name, base_url
        );
        Self {
            base_url,
            workspace,
            credential,
            client,
        }
    }

    /// Get the base URL of the service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the workspace scope, without a trailing slash
    fn workspace_url(&self) -> String {
        format!(
            "{}/v1.0/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Quantum/workspaces/{}",
            self.base_url,
            self.workspace.subscription_id,
            self.workspace.resource_group,
            self.workspace.name
        )
    }

    /// Attaches the bearer token and API version to a request
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.credential.token().await?;
        Ok(request
            .bearer_auth(token)
            .query(&[("api-version", API_VERSION)]))
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response that returns no content
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
