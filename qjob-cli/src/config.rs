//! Configuration module
//!
//! Handles CLI configuration: workspace identity and credentials.

use std::sync::Arc;

use anyhow::{Context, Result};
use qjob_client::{StaticTokenCredential, Workspace, WorkspaceConfig};
use tracing::debug;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace settings gathered from flags and environment
    pub workspace: WorkspaceConfig,
    /// Bearer token passed to the service
    pub access_token: String,
}

impl Config {
    /// Builds a workspace from this configuration
    pub fn connect(&self) -> Result<Workspace> {
        let workspace = Workspace::new(
            self.workspace.clone(),
            Arc::new(StaticTokenCredential::new(self.access_token.clone())),
        )
        .context("Failed to open workspace")?;

        debug!("Using workspace {} at {}", workspace.id(), workspace.base_url());
        Ok(workspace)
    }
}
