//! Workspace identity types

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static RESOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^/subscriptions/([a-f0-9-]*)/resourceGroups/([^\s/]*)/providers/Microsoft\.Quantum/Workspaces/([^\s/]*)$",
    )
    .expect("resource id pattern is valid")
});

/// Fully specified identity of a remote workspace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId {
    pub subscription_id: String,
    pub resource_group: String,
    pub name: String,
}

impl WorkspaceId {
    /// Builds an identity from its three parts
    ///
    /// Returns `None` if any part is empty.
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        name: impl Into<String>,
    ) -> Option<Self> {
        let id = Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            name: name.into(),
        };

        if id.subscription_id.is_empty() || id.resource_group.is_empty() || id.name.is_empty() {
            return None;
        }

        Some(id)
    }

    /// Parses a resource identifier of the form
    /// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Quantum/Workspaces/{name}`
    ///
    /// Matching is case-insensitive. Returns `None` when the string does not
    /// match or when a captured segment is empty.
    pub fn from_resource_id(resource_id: &str) -> Option<Self> {
        let caps = RESOURCE_ID.captures(resource_id)?;
        Self::new(&caps[1], &caps[2], &caps[3])
    }

    /// Renders the canonical resource identifier
    pub fn resource_id(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Quantum/Workspaces/{}",
            self.subscription_id, self.resource_group, self.name
        )
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resource_id())
    }
}

/// Converts a region name such as "West US" into the slug the service
/// expects ("westus")
pub fn normalize_location(location: &str) -> String {
    location
        .split_whitespace()
        .collect::<String>()
        .to_lowercase()
}
