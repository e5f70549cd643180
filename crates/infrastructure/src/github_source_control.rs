use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{StatusCode, header};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use blend_application::{SourceControl, SourceFileChange, SourceFileUpsert};
use blend_core::{AppError, AppResult, SecretString};

use crate::http_error::{decode_error, status_error, transport_error};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "blend-api";

#[derive(Debug, Deserialize)]
struct ContentResponse {
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutContentRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

/// GitHub contents API adapter.
#[derive(Clone)]
pub struct GithubSourceControl {
    http_client: reqwest::Client,
    api_base_url: String,
}

impl GithubSourceControl {
    /// Creates an adapter against a GitHub API origin.
    #[must_use]
    pub fn new(http_client: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base_url: api_base_url.into(),
        }
    }

    fn contents_url(&self, repo_name: &str, path: &str) -> AppResult<Url> {
        let (owner, repository) = repo_name
            .split_once('/')
            .filter(|(owner, repository)| {
                !owner.is_empty() && !repository.is_empty() && !repository.contains('/')
            })
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "repo_name '{repo_name}' must have the form owner/name"
                ))
            })?;

        let mut url = Url::parse(self.api_base_url.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid source control api url '{}': {error}",
                self.api_base_url
            ))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                AppError::Internal(format!(
                    "source control api url '{}' cannot be a base",
                    self.api_base_url
                ))
            })?
            .pop_if_empty()
            .extend(["repos", owner, repository, "contents"])
            .extend(path.split('/'));
        Ok(url)
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        access_token: &SecretString,
    ) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .bearer_auth(access_token.expose())
            .header(header::ACCEPT, GITHUB_ACCEPT)
            .header(header::USER_AGENT, USER_AGENT)
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }

    async fn existing_sha(&self, url: &Url, access_token: &SecretString) -> AppResult<Option<String>> {
        let operation = "source control file lookup";
        let response = self
            .request(reqwest::Method::GET, url.clone(), access_token)
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(operation, response).await);
        }

        let content = response
            .json::<ContentResponse>()
            .await
            .map_err(|error| decode_error(operation, &error))?;
        Ok(Some(content.sha))
    }
}

#[async_trait]
impl SourceControl for GithubSourceControl {
    async fn upsert_file(
        &self,
        access_token: &SecretString,
        upsert: SourceFileUpsert,
    ) -> AppResult<SourceFileChange> {
        let url = self.contents_url(upsert.repo_name.as_str(), upsert.path.as_str())?;
        let sha = self.existing_sha(&url, access_token).await?;
        let (change, message) = if sha.is_some() {
            (SourceFileChange::Updated, upsert.update_message.as_str())
        } else {
            (SourceFileChange::Created, upsert.create_message.as_str())
        };

        let operation = "source control file commit";
        let response = self
            .request(reqwest::Method::PUT, url, access_token)
            .json(&PutContentRequest {
                message,
                content: STANDARD.encode(upsert.content.as_bytes()),
                sha,
            })
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;
        if !response.status().is_success() {
            return Err(status_error(operation, response).await);
        }

        info!(
            repo = %upsert.repo_name,
            path = %upsert.path,
            change = change.as_str(),
            "committed file"
        );

        Ok(change)
    }
}
