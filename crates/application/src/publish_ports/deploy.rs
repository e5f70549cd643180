use async_trait::async_trait;

use blend_core::{AppResult, SecretString};

/// Project deploy trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// Instance origin hosting the deploy webhook.
    pub base_url: String,
    /// LookML project to deploy.
    pub project_name: String,
    /// Shared deploy secret.
    pub secret: SecretString,
}

/// Port for the remote deploy webhook.
#[async_trait]
pub trait DeployWebhook: Send + Sync {
    /// Asks the instance to pull and deploy the project.
    async fn trigger_deploy(&self, request: &DeployRequest) -> AppResult<()>;
}
