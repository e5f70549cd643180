use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;
use url::form_urlencoded;

use blend_application::{
    DirectoryClient, DirectoryConnector, DirectoryCredentials, UserListQuery,
};
use blend_core::{AppError, AppResult, SecretString};
use blend_domain::{DirectoryUser, Group, Role, UserAttribute};

use crate::http_error::{decode_error, status_error, transport_error, unavailable};

/// Page size used when a caller asks for every user.
const BULK_USER_PAGE_SIZE: usize = 500;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct RoleResponse {
    id: String,
    model_set: Option<ModelSetResponse>,
}

#[derive(Debug, Deserialize)]
struct ModelSetResponse {
    models: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GroupResponse {
    id: String,
    name: Option<String>,
}

impl GroupResponse {
    /// Unnamed groups cannot contribute a value and are dropped.
    fn into_group(self) -> Option<Group> {
        match self.name {
            Some(name) => Some(Group::new(self.id, name)),
            None => {
                debug!(group_id = %self.id, "skipping group without a name");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    id: String,
    group_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct UserAttributeResponse {
    id: String,
    name: String,
    #[serde(rename = "type")]
    attribute_type: String,
}

#[derive(Debug, Serialize)]
struct UserAttributeValueRequest<'a> {
    value: &'a str,
}

/// Opens Looker API 4.0 sessions from client credentials.
#[derive(Clone)]
pub struct LookerDirectoryConnector {
    http_client: reqwest::Client,
}

impl LookerDirectoryConnector {
    /// Creates a connector sharing one HTTP client.
    #[must_use]
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl DirectoryConnector for LookerDirectoryConnector {
    async fn connect(
        &self,
        credentials: &DirectoryCredentials,
    ) -> AppResult<Arc<dyn DirectoryClient>> {
        let client = LookerDirectoryClient::login(self.http_client.clone(), credentials).await?;
        Ok(Arc::new(client))
    }
}

/// Authenticated Looker API 4.0 directory client.
pub struct LookerDirectoryClient {
    http_client: reqwest::Client,
    api_base: Url,
    access_token: SecretString,
}

impl LookerDirectoryClient {
    /// Exchanges client credentials for an access token.
    pub async fn login(
        http_client: reqwest::Client,
        credentials: &DirectoryCredentials,
    ) -> AppResult<Self> {
        let api_base = api_base(credentials.base_url.as_str())?;
        let login_url = endpoint(&api_base, &["login"], &[]);
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", credentials.client_id.as_str())
            .append_pair("client_secret", credentials.client_secret.expose())
            .finish();

        let response = http_client
            .post(login_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|error| transport_error("directory login", &error))?;
        if !response.status().is_success() {
            return Err(unavailable(status_error("directory login", response).await));
        }

        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|error| decode_error("directory login", &error))?;

        info!(base_url = %credentials.base_url, "opened directory session");

        Ok(Self {
            http_client,
            api_base,
            access_token: SecretString::new(login.access_token),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = endpoint(&self.api_base, segments, query);
        debug!(path = url.path(), "directory request");

        let response = self
            .http_client
            .get(url)
            .bearer_auth(self.access_token.expose())
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;
        if !response.status().is_success() {
            return Err(status_error(operation, response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|error| decode_error(operation, &error))
    }

    async fn search_users(&self, limit: usize, offset: usize) -> AppResult<Vec<DirectoryUser>> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let users: Vec<UserResponse> = self
            .get_json(
                "directory user search",
                &["users", "search"],
                &[
                    ("fields", "id,group_ids"),
                    ("embed_user", "false"),
                    ("is_disabled", "false"),
                    ("sorts", "id"),
                    ("limit", limit.as_str()),
                    ("offset", offset.as_str()),
                ],
            )
            .await?;

        Ok(users
            .into_iter()
            .map(|user| DirectoryUser::new(user.id, user.group_ids))
            .collect())
    }
}

#[async_trait]
impl DirectoryClient for LookerDirectoryClient {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let roles: Vec<RoleResponse> = self
            .get_json("directory role listing", &["roles"], &[("fields", "id,model_set")])
            .await?;

        Ok(roles
            .into_iter()
            .map(|role| {
                let models = role
                    .model_set
                    .and_then(|set| set.models)
                    .unwrap_or_default();
                Role::new(role.id, models)
            })
            .collect())
    }

    async fn list_groups_for_role(&self, role_id: &str) -> AppResult<Vec<Group>> {
        let groups: Vec<GroupResponse> = self
            .get_json(
                "directory role groups",
                &["roles", role_id, "groups"],
                &[("fields", "id,name")],
            )
            .await?;

        Ok(groups
            .into_iter()
            .filter_map(GroupResponse::into_group)
            .collect())
    }

    async fn list_users(&self, query: UserListQuery) -> AppResult<Vec<DirectoryUser>> {
        if let Some(limit) = query.limit {
            return self.search_users(limit, query.offset).await;
        }

        let mut users = Vec::new();
        let mut offset = query.offset;
        loop {
            let page = self.search_users(BULK_USER_PAGE_SIZE, offset).await?;
            let last_page = page.len() < BULK_USER_PAGE_SIZE;
            users.extend(page);
            if last_page {
                return Ok(users);
            }

            offset += BULK_USER_PAGE_SIZE;
        }
    }

    async fn list_groups_by_id(&self, group_ids: &BTreeSet<String>) -> AppResult<Vec<Group>> {
        let ids = group_ids
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let limit = group_ids.len().to_string();
        let groups: Vec<GroupResponse> = self
            .get_json(
                "directory group search",
                &["groups", "search"],
                &[
                    ("fields", "id,name"),
                    ("id", ids.as_str()),
                    ("limit", limit.as_str()),
                ],
            )
            .await?;

        Ok(groups
            .into_iter()
            .filter_map(GroupResponse::into_group)
            .collect())
    }

    async fn get_user_attribute_by_name(&self, name: &str) -> AppResult<Option<UserAttribute>> {
        let attributes: Vec<UserAttributeResponse> = self
            .get_json(
                "directory user attribute listing",
                &["user_attributes"],
                &[("fields", "id,name,type")],
            )
            .await?;

        Ok(attributes
            .into_iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| {
                UserAttribute::new(attribute.id, attribute.name, attribute.attribute_type)
            }))
    }

    async fn set_user_attribute_value(
        &self,
        user_id: &str,
        user_attribute_id: &str,
        value: &str,
    ) -> AppResult<()> {
        let operation = "directory user attribute update";
        let url = endpoint(
            &self.api_base,
            &["users", user_id, "attribute_values", user_attribute_id],
            &[],
        );

        let response = self
            .http_client
            .patch(url)
            .bearer_auth(self.access_token.expose())
            .json(&UserAttributeValueRequest { value })
            .send()
            .await
            .map_err(|error| transport_error(operation, &error))?;
        if !response.status().is_success() {
            return Err(status_error(operation, response).await);
        }

        Ok(())
    }
}

fn api_base(base_url: &str) -> AppResult<Url> {
    let mut url = Url::parse(base_url).map_err(|error| {
        AppError::Validation(format!("invalid directory base url '{base_url}': {error}"))
    })?;
    url.path_segments_mut()
        .map_err(|()| {
            AppError::Validation(format!("directory base url '{base_url}' cannot be a base"))
        })?
        .pop_if_empty()
        .extend(["api", "4.0"]);
    Ok(url)
}

fn endpoint(api_base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = api_base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}
