//! Storage DTOs

use serde::{Deserialize, Serialize};

/// Request body asking the service for a signed blob URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobDetails {
    pub container_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob_name: Option<String>,
}

/// Signed URI returned by the service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SasUriResponse {
    pub sas_uri: String,
}
