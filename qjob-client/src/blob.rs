//! Blob URI handling and download

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use reqwest::{Client, Url};
use tracing::info;

use crate::error::{ClientError, Result};

/// Fetches the full body of a blob
#[async_trait]
pub trait BlobDownloader: Send + Sync {
    /// Downloads the blob at `url`, which may carry a SAS query
    async fn download(&self, url: &str) -> Result<Vec<u8>>;
}

/// A blob URL split into its parts
///
/// Expects the `https://{account}.blob.core.windows.net/{container}/{blob}`
/// layout: the first path segment names the container, the rest the blob.
/// Both names are percent-decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobUri {
    pub account: String,
    pub container: String,
    pub blob: String,
    url: Url,
}

impl BlobUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri)
            .map_err(|e| ClientError::InvalidRequest(format!("invalid blob URI '{}': {}", uri, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| ClientError::InvalidRequest(format!("blob URI '{}' has no host", uri)))?;
        let account = host.split('.').next().unwrap_or(host).to_string();

        let mut segments = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter()
            .map(|seg| {
                percent_decode_str(seg)
                    .decode_utf8()
                    .map(|decoded| decoded.into_owned())
                    .map_err(|e| {
                        ClientError::InvalidRequest(format!(
                            "blob URI '{}' has a non UTF-8 path: {}",
                            uri, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?
            .into_iter();

        let container = segments.next().ok_or_else(|| {
            ClientError::InvalidRequest(format!("blob URI '{}' has no container", uri))
        })?;
        let blob = segments.collect::<Vec<_>>().join("/");
        if blob.is_empty() {
            return Err(ClientError::InvalidRequest(format!(
                "blob URI '{}' has no blob name",
                uri
            )));
        }

        Ok(Self {
            account,
            container,
            blob,
            url,
        })
    }

    /// True if the URI already carries a shared access signature (`se=`)
    pub fn has_sas(&self) -> bool {
        self.url.query_pairs().any(|(key, _)| key == "se")
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// Downloads blobs with plain HTTP GETs
#[derive(Debug, Clone, Default)]
pub struct HttpBlobClient {
    client: Client,
}

impl HttpBlobClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobDownloader for HttpBlobClient {
    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        if let Ok(blob) = BlobUri::parse(url) {
            info!(
                "Downloading blob '{}' from container '{}' on account: '{}'",
                blob.blob, blob.container, blob.account
            );
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response.bytes().await?.to_vec())
    }
}
