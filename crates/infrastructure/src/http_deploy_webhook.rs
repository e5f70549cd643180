use async_trait::async_trait;
use reqwest::header;
use tracing::info;
use url::Url;

use blend_application::{DeployRequest, DeployWebhook};
use blend_core::{AppError, AppResult};

use crate::http_error::{status_error, transport_error, unavailable};

const DEPLOY_SECRET_HEADER: &str = "X-Looker-Deploy-Secret";

/// Triggers project deploys through the instance's deploy webhook.
#[derive(Clone)]
pub struct HttpDeployWebhook {
    http_client: reqwest::Client,
}

impl HttpDeployWebhook {
    /// Creates a new deploy webhook adapter.
    #[must_use]
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl DeployWebhook for HttpDeployWebhook {
    async fn trigger_deploy(&self, request: &DeployRequest) -> AppResult<()> {
        let mut url = Url::parse(request.base_url.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "invalid deploy base url '{}': {error}",
                request.base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Validation(format!(
                    "deploy base url '{}' cannot be a base",
                    request.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["webhooks", "projects", request.project_name.as_str(), "deploy"]);

        let operation = "deploy webhook";
        let response = self
            .http_client
            .post(url)
            .header(DEPLOY_SECRET_HEADER, request.secret.expose())
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;
        if !response.status().is_success() {
            return Err(unavailable(status_error(operation, response).await));
        }

        info!(project = %request.project_name, "deploy webhook accepted");
        Ok(())
    }
}
