//! Workspace configuration
//!
//! A workspace can be identified either by its resource ID or by the
//! subscription / resource group / name triple. Both forms, plus the region,
//! can come from code, from the environment, or from CLI flags.

use qjob_core::domain::workspace::{WorkspaceId, normalize_location};

use crate::api::default_base_url;
use crate::error::{ClientError, Result};

/// Unvalidated workspace settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceConfig {
    /// Ignored when `resource_id` parses
    pub subscription_id: Option<String>,
    /// Ignored when `resource_id` parses
    pub resource_group: Option<String>,
    /// Ignored when `resource_id` parses
    pub name: Option<String>,
    pub resource_id: Option<String>,
    /// Region name ("East US") or slug ("eastus")
    pub location: Option<String>,
    /// Storage account connection string, for workspaces without linked storage
    pub storage: Option<String>,
    /// Overrides the region-derived service URL
    pub base_url: Option<String>,
}

/// Validated workspace settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub id: WorkspaceId,
    /// Normalized region slug
    pub location: String,
    pub storage: Option<String>,
    pub base_url: String,
}

impl WorkspaceConfig {
    /// Creates configuration from environment variables
    ///
    /// Recognized variables (all optional here, validated by [`resolve`]):
    /// - AZURE_QUANTUM_SUBSCRIPTION_ID
    /// - AZURE_QUANTUM_WORKSPACE_RG
    /// - AZURE_QUANTUM_WORKSPACE_NAME
    /// - AZURE_QUANTUM_RESOURCE_ID
    /// - AZURE_QUANTUM_WORKSPACE_LOCATION
    /// - AZURE_QUANTUM_STORAGE
    /// - AZURE_QUANTUM_BASE_URL
    ///
    /// [`resolve`]: WorkspaceConfig::resolve
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok();

        Self {
            subscription_id: var("AZURE_QUANTUM_SUBSCRIPTION_ID"),
            resource_group: var("AZURE_QUANTUM_WORKSPACE_RG"),
            name: var("AZURE_QUANTUM_WORKSPACE_NAME"),
            resource_id: var("AZURE_QUANTUM_RESOURCE_ID"),
            location: var("AZURE_QUANTUM_WORKSPACE_LOCATION"),
            storage: var("AZURE_QUANTUM_STORAGE"),
            base_url: var("AZURE_QUANTUM_BASE_URL"),
        }
    }

    /// Validates the configuration
    ///
    /// A resource ID that parses wins over the explicit triple; one that does
    /// not parse is ignored. Empty strings count as unset.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let id = self
            .resource_id
            .as_deref()
            .and_then(WorkspaceId::from_resource_id)
            .or_else(|| {
                WorkspaceId::new(
                    self.subscription_id.clone().unwrap_or_default(),
                    self.resource_group.clone().unwrap_or_default(),
                    self.name.clone().unwrap_or_default(),
                )
            })
            .ok_or_else(|| {
                ClientError::Configuration(
                    "workspace not fully specified; provide either a valid resource ID \
                     or a subscription ID, resource group name and workspace name"
                        .to_string(),
                )
            })?;

        let location = self
            .location
            .as_deref()
            .map(normalize_location)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                ClientError::Configuration(
                    "workspace has no associated location; specify the region of the workspace"
                        .to_string(),
                )
            })?;

        let base_url = match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ClientError::Configuration(format!(
                        "base_url must start with http:// or https://, got '{}'",
                        url
                    )));
                }
                url.to_string()
            }
            _ => default_base_url(&location),
        };

        Ok(ResolvedConfig {
            id,
            location,
            storage: self.storage.clone().filter(|s| !s.is_empty()),
            base_url,
        })
    }
}
