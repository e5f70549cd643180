//! Blend API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod request_headers;
mod state;

use std::sync::Arc;

use blend_application::BlendPublishService;
use blend_core::AppError;
use blend_infrastructure::{GithubSourceControl, HttpDeployWebhook, LookerDirectoryConnector};
use tracing::info;

use crate::api_config::{ApiConfig, DirectoryMode, init_tracing};
use crate::state::{AppState, CredentialDefaults};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let directory_connector = Arc::new(LookerDirectoryConnector::new(http_client.clone()));
    let app_state = AppState {
        blend_publish_service: BlendPublishService::new(
            directory_connector.clone(),
            Arc::new(GithubSourceControl::new(
                http_client.clone(),
                config.github_api_base_url.clone(),
            )),
            Arc::new(HttpDeployWebhook::new(http_client)),
        ),
        directory_connector,
        credential_defaults: CredentialDefaults {
            personal_access_token: config.personal_access_token.clone(),
            directory: match &config.directory_mode {
                DirectoryMode::Multitenant => None,
                DirectoryMode::SingleTenant(credentials) => Some(credentials.clone()),
            },
        },
    };

    let app = api_router::build_router(app_state, config.cors_allowed_origin.as_deref())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(
        %address,
        multitenant = matches!(config.directory_mode, DirectoryMode::Multitenant),
        "blend-api listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
