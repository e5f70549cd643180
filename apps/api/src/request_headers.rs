use axum::http::HeaderMap;
use blend_application::DirectoryCredentials;
use blend_core::{AppError, AppResult, SecretString};

use crate::state::CredentialDefaults;

pub const PERSONAL_ACCESS_TOKEN_HEADER: &str = "x-personal-access-token";
pub const BASE_URL_HEADER: &str = "x-base-url";
pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const CLIENT_SECRET_HEADER: &str = "x-client-secret";
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Credentials supplied with a request.
#[derive(Debug, Clone, Default)]
pub struct RequestCredentials {
    personal_access_token: Option<SecretString>,
    base_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    webhook_secret: Option<SecretString>,
}

impl RequestCredentials {
    /// Reads credential headers. Blank and non-UTF-8 values count as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        Self {
            personal_access_token: header(PERSONAL_ACCESS_TOKEN_HEADER).map(SecretString::new),
            base_url: header(BASE_URL_HEADER),
            client_id: header(CLIENT_ID_HEADER),
            client_secret: header(CLIENT_SECRET_HEADER).map(SecretString::new),
            webhook_secret: header(WEBHOOK_SECRET_HEADER).map(SecretString::new),
        }
    }

    /// Returns the source control token, falling back to the configured one.
    pub fn personal_access_token(&self, defaults: &CredentialDefaults) -> AppResult<SecretString> {
        self.personal_access_token
            .clone()
            .or_else(|| defaults.personal_access_token.clone())
            .ok_or_else(|| {
                AppError::Validation("missing or invalid personal access token".to_owned())
            })
    }

    /// Returns the instance origin, falling back to the configured instance.
    pub fn base_url(&self, defaults: &CredentialDefaults) -> AppResult<String> {
        self.base_url
            .clone()
            .or_else(|| {
                defaults
                    .directory
                    .as_ref()
                    .map(|credentials| credentials.base_url.clone())
            })
            .ok_or_else(|| AppError::Validation("missing or invalid sdk base url".to_owned()))
    }

    /// Returns directory credentials when the configured instance or a
    /// complete header set provides them.
    pub fn directory(&self, defaults: &CredentialDefaults) -> Option<DirectoryCredentials> {
        if let Some(credentials) = &defaults.directory {
            return Some(credentials.clone());
        }

        match (&self.base_url, &self.client_id, &self.client_secret) {
            (Some(base_url), Some(client_id), Some(client_secret)) => Some(DirectoryCredentials {
                base_url: base_url.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
            }),
            _ => None,
        }
    }

    /// Returns the deploy webhook secret.
    pub fn webhook_secret(&self) -> Option<SecretString> {
        self.webhook_secret.clone()
    }
}

#[cfg(test)]
mod tests;
