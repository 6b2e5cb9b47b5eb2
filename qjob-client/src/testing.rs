//! In-memory stand-in for the remote services, used by unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use qjob_core::domain::job::{JobDetails, JobStatus};
use qjob_core::dto::job::JobPage;
use qjob_core::dto::storage::BlobDetails;
use reqwest::Url;

use crate::api::{JobsApi, StorageApi};
use crate::blob::{BlobDownloader, BlobUri};
use crate::config::WorkspaceConfig;
use crate::error::{ClientError, Result};
use crate::workspace::Workspace;

#[derive(Default)]
pub(crate) struct FakeState {
    pub jobs: HashMap<String, JobDetails>,
    /// Status applied to a job on each successive `get`
    pub scripted: HashMap<String, VecDeque<JobStatus>>,
    pub pages: Vec<Vec<JobDetails>>,
    /// Payloads keyed by "container/blob"
    pub blobs: HashMap<String, Vec<u8>>,
    pub gets: usize,
    pub creates: usize,
    pub cancels: usize,
    pub page_calls: usize,
    pub sas_calls: usize,
    pub sas_requests: Vec<BlobDetails>,
    pub downloads: usize,
    pub downloaded_urls: Vec<String>,
}

#[derive(Default)]
pub(crate) struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn with_job(self, details: JobDetails) -> Self {
        self.state().jobs.insert(details.id.clone(), details);
        self
    }

    pub fn with_statuses(self, id: &str, statuses: impl IntoIterator<Item = JobStatus>) -> Self {
        self.state()
            .scripted
            .insert(id.to_string(), statuses.into_iter().collect());
        self
    }

    pub fn with_pages(self, pages: Vec<Vec<JobDetails>>) -> Self {
        self.state().pages = pages;
        self
    }

    pub fn with_blob(self, container: &str, blob: &str, payload: &[u8]) -> Self {
        self.put_blob(container, blob, payload);
        self
    }

    pub fn put_blob(&self, container: &str, blob: &str, payload: &[u8]) {
        self.state()
            .blobs
            .insert(format!("{}/{}", container, blob), payload.to_vec());
    }

    pub fn remove_blob(&self, container: &str, blob: &str) {
        self.state().blobs.remove(&format!("{}/{}", container, blob));
    }
}

#[async_trait]
impl JobsApi for FakeService {
    async fn create(&self, job_id: &str, details: &JobDetails) -> Result<JobDetails> {
        let mut state = self.state();
        state.creates += 1;

        let mut accepted = details.clone();
        accepted.id = job_id.to_string();
        accepted.status = Some(JobStatus::Waiting);
        state.jobs.insert(job_id.to_string(), accepted.clone());
        Ok(accepted)
    }

    async fn get(&self, job_id: &str) -> Result<JobDetails> {
        let mut state = self.state();
        state.gets += 1;

        let next = state.scripted.get_mut(job_id).and_then(VecDeque::pop_front);
        let details = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| ClientError::api_error(404, format!("job {} not found", job_id)))?;
        if let Some(status) = next {
            details.status = Some(status);
        }
        Ok(details.clone())
    }

    async fn cancel(&self, job_id: &str) -> Result<()> {
        let mut state = self.state();
        state.cancels += 1;

        let details = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| ClientError::api_error(404, format!("job {} not found", job_id)))?;
        details.status = Some(JobStatus::Cancelled);
        Ok(())
    }

    async fn list_page(&self, next_link: Option<&str>) -> Result<JobPage> {
        let mut state = self.state();
        state.page_calls += 1;

        let index = match next_link {
            None => 0,
            Some(link) => link
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ClientError::InvalidRequest(format!("bad link {}", link)))?,
        };

        let value = state.pages.get(index).cloned().unwrap_or_default();
        let next_link = (index + 1 < state.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(JobPage { value, next_link })
    }
}

#[async_trait]
impl StorageApi for FakeService {
    async fn sas_uri(&self, blob: &BlobDetails) -> Result<String> {
        let mut state = self.state();
        state.sas_calls += 1;
        state.sas_requests.push(blob.clone());

        let mut url = Url::parse("https://acct.blob.core.windows.net/")
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.clear().push(&blob.container_name);
            if let Some(name) = &blob.blob_name {
                segments.extend(name.split('/'));
            }
        }
        url.set_query(Some("sv=2020-10-02&se=2030-01-01&sr=b&sig=fake"));
        Ok(url.to_string())
    }
}

#[async_trait]
impl BlobDownloader for FakeService {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let blob = BlobUri::parse(url)?;
        let mut state = self.state();
        state.downloads += 1;
        state.downloaded_urls.push(url.to_string());

        state
            .blobs
            .get(&format!("{}/{}", blob.container, blob.blob))
            .cloned()
            .ok_or_else(|| ClientError::api_error(404, "BlobNotFound"))
    }
}

pub(crate) fn config() -> WorkspaceConfig {
    WorkspaceConfig {
        subscription_id: Some("00000000-0000-0000-0000-000000000000".to_string()),
        resource_group: Some("rg".to_string()),
        name: Some("ws".to_string()),
        location: Some("East US".to_string()),
        ..WorkspaceConfig::default()
    }
}

pub(crate) fn workspace(fake: &Arc<FakeService>) -> Workspace {
    Workspace::with_services(config(), fake.clone(), fake.clone(), fake.clone())
        .expect("test workspace config is complete")
}

pub(crate) fn details(id: &str, status: Option<JobStatus>, output: Option<&str>) -> JobDetails {
    let mut details = JobDetails::new(
        id,
        format!("{}-name", id),
        "Microsoft.Simulator",
        "microsoft.simulator.fullstate",
        format!("https://acct.blob.core.windows.net/{}", id),
        "qir.v1/full-profile",
        "microsoft.qio-results.v2",
    );
    details.status = status;
    details.output_data_uri = output.map(str::to_string);
    details
}
