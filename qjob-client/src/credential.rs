//! Credential providers
//!
//! The client never inspects or refreshes credentials itself. It asks the
//! injected provider for a bearer token before each request.

use async_trait::async_trait;

use crate::error::{ClientError, Result};

/// Source of bearer tokens for the remote APIs
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Returns a token valid for the next request
    async fn token(&self) -> Result<String>;
}

/// Credential wrapping a token acquired elsewhere
#[derive(Clone)]
pub struct StaticTokenCredential {
    token: String,
}

impl StaticTokenCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenCredential")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(ClientError::Credential("access token is empty".to_string()));
        }
        Ok(self.token.clone())
    }
}
