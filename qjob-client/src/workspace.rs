//! Workspaces
//!
//! A [`Workspace`] scopes every remote call to one subscription, resource
//! group and workspace name. It is built once and shared by every [`Job`] it
//! hands out.

use std::fmt;
use std::sync::Arc;

use qjob_core::domain::job::JobFilter;
use qjob_core::domain::workspace::WorkspaceId;
use qjob_core::dto::storage::BlobDetails;
use tracing::debug;

use crate::api::{JobsApi, QuantumClient, StorageApi};
use crate::blob::{BlobDownloader, HttpBlobClient};
use crate::config::{ResolvedConfig, WorkspaceConfig};
use crate::credential::TokenCredential;
use crate::error::Result;
use crate::job::{Job, Refreshable};

/// A remote workspace and the handles used to talk to it
#[derive(Clone)]
pub struct Workspace {
    config: Arc<ResolvedConfig>,
    jobs: Arc<dyn JobsApi>,
    storage: Arc<dyn StorageApi>,
    blobs: Arc<dyn BlobDownloader>,
}

impl Workspace {
    /// Connects to a workspace over HTTP
    ///
    /// # Errors
    /// Returns [`ClientError::Configuration`](crate::ClientError::Configuration)
    /// if the workspace identity or location is incomplete.
    ///
    /// # Example
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use qjob_client::{StaticTokenCredential, Workspace, WorkspaceConfig};
    /// # fn example() -> anyhow::Result<()> {
    /// let workspace = Workspace::new(
    ///     WorkspaceConfig {
    ///         resource_id: Some("/subscriptions/0000/resourceGroups/rg/providers/Microsoft.Quantum/Workspaces/ws".into()),
    ///         location: Some("East US".into()),
    ///         ..Default::default()
    ///     },
    ///     Arc::new(StaticTokenCredential::new("token")),
    /// )?;
    /// assert_eq!(workspace.location(), "eastus");
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: WorkspaceConfig, credential: Arc<dyn TokenCredential>) -> Result<Self> {
        let resolved = config.resolve()?;
        let client = Arc::new(QuantumClient::new(
            resolved.base_url.clone(),
            resolved.id.clone(),
            credential,
        ));

        Ok(Self {
            config: Arc::new(resolved),
            jobs: client.clone(),
            storage: client,
            blobs: Arc::new(HttpBlobClient::new()),
        })
    }

    /// Builds a workspace on top of caller-supplied service implementations
    pub fn with_services(
        config: WorkspaceConfig,
        jobs: Arc<dyn JobsApi>,
        storage: Arc<dyn StorageApi>,
        blobs: Arc<dyn BlobDownloader>,
    ) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config.resolve()?),
            jobs,
            storage,
            blobs,
        })
    }

    pub fn id(&self) -> &WorkspaceId {
        &self.config.id
    }

    pub fn subscription_id(&self) -> &str {
        &self.config.id.subscription_id
    }

    pub fn resource_group(&self) -> &str {
        &self.config.id.resource_group
    }

    pub fn name(&self) -> &str {
        &self.config.id.name
    }

    /// Normalized region slug
    pub fn location(&self) -> &str {
        &self.config.location
    }

    pub fn storage(&self) -> Option<&str> {
        self.config.storage.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn resource_id(&self) -> String {
        self.config.id.resource_id()
    }

    // =============================================================================
    // Jobs
    // =============================================================================

    /// Submits a job and returns it with the details accepted by the service
    pub async fn submit_job(&self, job: &Job) -> Result<Job> {
        let details = self.jobs.create(job.id(), job.details()).await?;
        Ok(Job::new(self.clone(), details))
    }

    /// Returns the job with the given id
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let details = self.jobs.get(job_id).await?;
        Ok(Job::new(self.clone(), details))
    }

    /// Requests cancellation and returns the re-fetched job
    ///
    /// Cancellation may complete asynchronously, so the returned job can still
    /// report a non-terminal status.
    pub async fn cancel_job(&self, job: &Job) -> Result<Job> {
        self.jobs.cancel(job.id()).await?;
        self.get_job(job.id()).await
    }

    /// Lists the jobs matching every predicate of `filter`
    ///
    /// Pages are fetched one at a time; jobs keep the order the service
    /// returned them in.
    pub async fn list_jobs(&self, filter: &JobFilter) -> Result<Vec<Job>> {
        let mut jobs = Vec::new();
        let mut next_link: Option<String> = None;

        loop {
            let page = self.jobs.list_page(next_link.as_deref()).await?;
            let next = page.next().map(str::to_string);

            jobs.extend(
                page.value
                    .into_iter()
                    .filter(|details| filter.matches(details))
                    .map(|details| Job::new(self.clone(), details)),
            );

            match next {
                Some(link) => next_link = Some(link),
                None => break,
            }
        }

        Ok(jobs)
    }

    // =============================================================================
    // Storage
    // =============================================================================

    /// Asks the service for a signed URI to a container, or a blob within it
    pub async fn get_linked_storage_sas_uri(
        &self,
        container_name: &str,
        blob_name: Option<&str>,
    ) -> Result<String> {
        let sas_uri = self
            .storage
            .sas_uri(&BlobDetails {
                container_name: container_name.to_string(),
                blob_name: blob_name.map(str::to_string),
            })
            .await?;
        debug!("Container URI from service: {}", sas_uri);
        Ok(sas_uri)
    }

    pub(crate) async fn download_blob(&self, url: &str) -> Result<Vec<u8>> {
        self.blobs.download(url).await
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.config.id)
            .field("location", &self.config.location)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use qjob_core::domain::job::{JobDetails, JobStatus};
    use regex::Regex;

    use super::*;
    use crate::credential::StaticTokenCredential;
    use crate::error::ClientError;
    use crate::testing::{FakeService, config, details, workspace};

    #[test]
    fn test_new_resolves_identity() {
        let ws = Workspace::new(config(), Arc::new(StaticTokenCredential::new("t"))).unwrap();
        assert_eq!(ws.name(), "ws");
        assert_eq!(ws.resource_group(), "rg");
        assert_eq!(ws.location(), "eastus");
        assert_eq!(ws.base_url(), "https://eastus.quantum.azure.com");
        assert!(ws.resource_id().ends_with("/providers/Microsoft.Quantum/Workspaces/ws"));
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let err = Workspace::new(
            WorkspaceConfig {
                name: Some("ws".to_string()),
                location: Some("eastus".to_string()),
                ..Default::default()
            },
            Arc::new(StaticTokenCredential::new("t")),
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_get_job_binds_workspace() {
        let fake = FakeService::new()
            .with_job(details("job-1", Some(JobStatus::Executing), None))
            .into_arc();
        let ws = workspace(&fake);

        let job = ws.get_job("job-1").await.unwrap();
        assert_eq!(job.id(), "job-1");
        assert_eq!(job.workspace().name(), ws.name());
        assert_eq!(fake.state().gets, 1);
    }

    #[tokio::test]
    async fn test_cancel_refetches_details() {
        let fake = FakeService::new()
            .with_job(details("job-1", Some(JobStatus::Executing), None))
            .into_arc();
        let ws = workspace(&fake);
        let job = ws.get_job("job-1").await.unwrap();

        let cancelled = ws.cancel_job(&job).await.unwrap();

        assert_eq!(cancelled.details().status, Some(JobStatus::Cancelled));
        let state = fake.state();
        assert_eq!(state.cancels, 1);
        assert_eq!(state.gets, 2);
    }

    #[tokio::test]
    async fn test_cancel_errors_propagate() {
        let fake = FakeService::new().into_arc();
        let ws = workspace(&fake);
        let job = Job::new(ws.clone(), details("ghost", None, None));

        let err = ws.cancel_job(&job).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fake.state().gets, 0);
    }

    fn listing() -> Vec<Vec<JobDetails>> {
        let mut a = details("a", Some(JobStatus::Succeeded), None);
        a.name = "bell-1".to_string();
        a.creation_time = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let mut b = details("b", Some(JobStatus::Failed), None);
        b.name = "bell-2".to_string();
        b.creation_time = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        let mut c = details("c", Some(JobStatus::Succeeded), None);
        c.name = "ghz".to_string();
        c.creation_time = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let mut d = details("d", Some(JobStatus::Succeeded), None);
        d.name = "bell-3".to_string();
        d.creation_time = Some(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap());

        vec![vec![a, b], vec![], vec![c, d]]
    }

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(Job::id).collect()
    }

    #[tokio::test]
    async fn test_list_jobs_walks_every_page() {
        let fake = FakeService::new().with_pages(listing()).into_arc();
        let ws = workspace(&fake);

        let jobs = ws.list_jobs(&JobFilter::new()).await.unwrap();

        assert_eq!(ids(&jobs), vec!["a", "b", "c", "d"]);
        assert_eq!(fake.state().page_calls, 3);
    }

    #[tokio::test]
    async fn test_list_jobs_by_status_keeps_order() {
        let fake = FakeService::new().with_pages(listing()).into_arc();
        let ws = workspace(&fake);

        let jobs = ws
            .list_jobs(&JobFilter::new().with_status(JobStatus::Succeeded))
            .await
            .unwrap();

        assert_eq!(ids(&jobs), vec!["a", "c", "d"]);
        assert!(
            jobs.iter()
                .all(|j| j.details().status == Some(JobStatus::Succeeded))
        );
    }

    #[tokio::test]
    async fn test_list_jobs_combines_filters() {
        let fake = FakeService::new().with_pages(listing()).into_arc();
        let ws = workspace(&fake);

        let filter = JobFilter::new()
            .with_name_match(Regex::new("^bell").unwrap())
            .with_created_after(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let jobs = ws.list_jobs(&filter).await.unwrap();

        assert_eq!(ids(&jobs), vec!["b", "d"]);
    }

    #[tokio::test]
    async fn test_list_jobs_empty_listing() {
        let fake = FakeService::new().into_arc();
        let jobs = workspace(&fake).list_jobs(&JobFilter::new()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_sas_uri_request() {
        let fake = FakeService::new().into_arc();
        let uri = workspace(&fake)
            .get_linked_storage_sas_uri("job-1", Some("rawOutputData"))
            .await
            .unwrap();

        assert!(uri.starts_with("https://acct.blob.core.windows.net/job-1/rawOutputData?"));
        assert_eq!(fake.state().sas_calls, 1);
    }
}
