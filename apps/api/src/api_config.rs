use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use blend_application::DirectoryCredentials;
use blend_core::{AppError, SecretString};
use tracing_subscriber::EnvFilter;

const DEFAULT_GITHUB_API_BASE_URL: &str = "https://api.github.com";

/// Where directory credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryMode {
    /// Each request carries its own instance credentials in headers.
    Multitenant,
    /// One instance configured through the environment.
    SingleTenant(DirectoryCredentials),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: String,
    pub api_port: u16,
    pub personal_access_token: Option<SecretString>,
    pub directory_mode: DirectoryMode,
    pub github_api_base_url: String,
    pub http_timeout: Duration,
    pub cors_allowed_origin: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_host = optional("API_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let api_port = match optional("API_PORT").or_else(|| optional("PORT")) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|error| AppError::Validation(format!("invalid API_PORT: {error}")))?,
            None => 8080,
        };

        let directory_mode = if optional("MULTITENANT")
            .is_some_and(|value| value.eq_ignore_ascii_case("false"))
        {
            let required = |name: &str| {
                optional(name)
                    .ok_or_else(|| AppError::Validation(format!("{name} is required")))
            };
            DirectoryMode::SingleTenant(DirectoryCredentials {
                base_url: required("LOOKER_SDK_BASE_URL")?,
                client_id: required("LOOKER_SDK_CLIENT_ID")?,
                client_secret: SecretString::new(required("LOOKER_SDK_CLIENT_SECRET")?),
            })
        } else {
            DirectoryMode::Multitenant
        };

        let http_timeout_seconds = match optional("HTTP_TIMEOUT_SECONDS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid HTTP_TIMEOUT_SECONDS: {error}"))
            })?,
            None => 60,
        };

        Ok(Self {
            api_host,
            api_port,
            personal_access_token: optional("PERSONAL_ACCESS_TOKEN").map(SecretString::new),
            directory_mode,
            github_api_base_url: optional("GITHUB_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE_URL.to_owned()),
            http_timeout: Duration::from_secs(http_timeout_seconds),
            cors_allowed_origin: optional("CORS_ALLOWED_ORIGIN"),
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}
