use std::sync::Arc;

use async_trait::async_trait;

use blend_core::{AppResult, SecretString};

use super::DirectoryClient;

/// API credentials for one directory instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryCredentials {
    /// Instance origin, e.g. `https://acme.cloud.looker.com`.
    pub base_url: String,
    /// API client id.
    pub client_id: String,
    /// API client secret.
    pub client_secret: SecretString,
}

/// Factory port that authenticates and returns a ready directory client.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Opens an authenticated session for the given credentials.
    async fn connect(
        &self,
        credentials: &DirectoryCredentials,
    ) -> AppResult<Arc<dyn DirectoryClient>>;
}
