//! qjob client
//!
//! Async client for submitting jobs to a remote compute workspace, waiting for
//! them to finish and fetching their results from blob storage.
//!
//! The lifecycle is: obtain a [`Workspace`], submit or look up a [`Job`], wait
//! for it with [`Refreshable::wait_until_completed`], then download and decode
//! the output with [`ResultFetchable::get_results`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use qjob_client::{
//!     DEFAULT_TIMEOUT, ResultFetchable, StaticTokenCredential, Workspace, WorkspaceConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let workspace = Workspace::new(
//!         WorkspaceConfig::from_env(),
//!         Arc::new(StaticTokenCredential::new(std::env::var("AZURE_QUANTUM_ACCESS_TOKEN")?)),
//!     )?;
//!
//!     let mut job = workspace.get_job("c5f3b5e4-1f0a-4e2b-9d57-0d3c1f2a7b11").await?;
//!     let results = job.get_results(Some(DEFAULT_TIMEOUT)).await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&results)?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backoff;
pub mod blob;
pub mod config;
pub mod credential;
pub mod error;
pub mod job;
pub mod workspace;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use api::{JobsApi, QuantumClient, StorageApi};
pub use backoff::PollBackoff;
pub use blob::{BlobDownloader, BlobUri, HttpBlobClient};
pub use config::{ResolvedConfig, WorkspaceConfig};
pub use credential::{StaticTokenCredential, TokenCredential};
pub use error::{ClientError, Result};
pub use job::{DEFAULT_TIMEOUT, Job, Refreshable, ResultFetchable, WaitOptions};
pub use qjob_core::domain::job::{ErrorData, JobDetails, JobFilter, JobStatus};
pub use workspace::Workspace;
