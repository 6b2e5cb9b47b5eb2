//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobDetails;

/// One page of the remote job listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    #[serde(default)]
    pub value: Vec<JobDetails>,
    /// Absolute URL of the next page, absent on the last one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_link: Option<String>,
}

impl JobPage {
    /// Returns the continuation link, treating an empty link as the end
    pub fn next(&self) -> Option<&str> {
        self.next_link.as_deref().filter(|link| !link.is_empty())
    }
}
