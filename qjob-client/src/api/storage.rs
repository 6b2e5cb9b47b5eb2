//! Storage-related API endpoints

use async_trait::async_trait;
use qjob_core::dto::storage::{BlobDetails, SasUriResponse};

use super::{QuantumClient, StorageApi};
use crate::error::Result;

#[async_trait]
impl StorageApi for QuantumClient {
    async fn sas_uri(&self, blob: &BlobDetails) -> Result<String> {
        let url = format!("{}/storage/sasUri", self.workspace_url());
        let request = self.client.post(&url).json(blob);
        let response = self.authorize(request).await?.send().await?;

        let body: SasUriResponse = self.handle_response(response).await?;
        Ok(body.sas_uri)
    }
}
