use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use blend_application::{
    BlendPublishService, DeployRequest, DeployWebhook, DirectoryClient, DirectoryConnector,
    DirectoryCredentials, SourceControl, SourceFileChange, SourceFileUpsert, UserListQuery,
};
use blend_core::{AppError, AppResult, SecretString};
use blend_domain::{DirectoryUser, Group, Role, UserAttribute};
use tokio::sync::Mutex;

use crate::state::{AppState, CredentialDefaults};

pub(super) struct FakeDirectory {
    pub(super) attribute_type: &'static str,
    pub(super) failing_user_ids: HashSet<String>,
}

#[async_trait]
impl DirectoryClient for FakeDirectory {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(vec![Role::new("r1", ["thelook"])])
    }

    async fn list_groups_for_role(&self, _role_id: &str) -> AppResult<Vec<Group>> {
        Ok(vec![Group::new("5", "analysts")])
    }

    async fn list_users(&self, query: UserListQuery) -> AppResult<Vec<DirectoryUser>> {
        let users = (1..=3)
            .map(|id| DirectoryUser::new(id.to_string(), Some(vec!["1".to_owned(), "5".to_owned()])))
            .skip(query.offset)
            .collect();
        Ok(users)
    }

    async fn list_groups_by_id(&self, _group_ids: &BTreeSet<String>) -> AppResult<Vec<Group>> {
        Ok(vec![Group::new("5", "analysts")])
    }

    async fn get_user_attribute_by_name(&self, name: &str) -> AppResult<Option<UserAttribute>> {
        Ok((name == "blend_groups").then(|| UserAttribute::new("12", name, self.attribute_type)))
    }

    async fn set_user_attribute_value(
        &self,
        user_id: &str,
        _user_attribute_id: &str,
        _value: &str,
    ) -> AppResult<()> {
        if self.failing_user_ids.contains(user_id) {
            return Err(AppError::Unavailable("user is locked".to_owned()));
        }

        Ok(())
    }
}

pub(super) struct FakeConnector {
    pub(super) directory: Arc<FakeDirectory>,
    pub(super) connections: Mutex<Vec<DirectoryCredentials>>,
}

#[async_trait]
impl DirectoryConnector for FakeConnector {
    async fn connect(
        &self,
        credentials: &DirectoryCredentials,
    ) -> AppResult<Arc<dyn DirectoryClient>> {
        self.connections.lock().await.push(credentials.clone());
        Ok(self.directory.clone())
    }
}

#[derive(Default)]
pub(super) struct FakeSourceControl {
    pub(super) upserts: Mutex<Vec<(String, SourceFileUpsert)>>,
}

#[async_trait]
impl SourceControl for FakeSourceControl {
    async fn upsert_file(
        &self,
        access_token: &SecretString,
        upsert: SourceFileUpsert,
    ) -> AppResult<SourceFileChange> {
        self.upserts
            .lock()
            .await
            .push((access_token.expose().to_owned(), upsert));
        Ok(SourceFileChange::Created)
    }
}

#[derive(Default)]
pub(super) struct FakeDeployWebhook {
    pub(super) requests: Mutex<Vec<DeployRequest>>,
}

#[async_trait]
impl DeployWebhook for FakeDeployWebhook {
    async fn trigger_deploy(&self, request: &DeployRequest) -> AppResult<()> {
        self.requests.lock().await.push(request.clone());
        Ok(())
    }
}

pub(super) struct Fakes {
    pub(super) connector: Arc<FakeConnector>,
    pub(super) source_control: Arc<FakeSourceControl>,
    pub(super) deploy_webhook: Arc<FakeDeployWebhook>,
}

impl Fakes {
    pub(super) fn new(directory: FakeDirectory) -> Self {
        Self {
            connector: Arc::new(FakeConnector {
                directory: Arc::new(directory),
                connections: Mutex::new(Vec::new()),
            }),
            source_control: Arc::new(FakeSourceControl::default()),
            deploy_webhook: Arc::new(FakeDeployWebhook::default()),
        }
    }

    pub(super) fn state(&self, credential_defaults: CredentialDefaults) -> AppState {
        AppState {
            blend_publish_service: BlendPublishService::new(
                self.connector.clone(),
                self.source_control.clone(),
                self.deploy_webhook.clone(),
            ),
            directory_connector: self.connector.clone(),
            credential_defaults,
        }
    }
}

pub(super) fn filter_directory() -> FakeDirectory {
    FakeDirectory {
        attribute_type: "advanced_filter_string",
        failing_user_ids: HashSet::new(),
    }
}
