use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use blend_core::{AppResult, SecretString};
use blend_domain::{AccessGrant, BlendDefinition};

use crate::{
    AccessGrantResolver, DeployRequest, DeployWebhook, DirectoryConnector, DirectoryCredentials,
    SourceControl, SourceFileChange, SourceFileUpsert,
};

/// Per-request credentials for publishing a blend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishCredentials {
    /// Source control token.
    pub personal_access_token: SecretString,
    /// Instance origin used for the deploy webhook.
    pub base_url: String,
    /// Directory credentials; the access grant is skipped without them.
    pub directory: Option<DirectoryCredentials>,
    /// Deploy secret; no deploy is triggered without it.
    pub webhook_secret: Option<SecretString>,
}

/// Publish request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishBlendInput {
    /// Validated blend definition.
    pub definition: BlendDefinition,
    /// Request credentials.
    pub credentials: PublishCredentials,
    /// Render only, without committing.
    pub dry_run: bool,
    /// Whether to compute and attach an access grant.
    pub add_access_grant: bool,
}

/// Outcome of a publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedBlend {
    /// Rendered LookML.
    pub lookml: String,
    /// Instance-relative explore path.
    pub explore_path: String,
    /// Explore name.
    pub explore_name: String,
    /// Model serving the explore.
    pub lookml_model: String,
    /// Whether the commit was skipped.
    pub dry_run: bool,
    /// File change, absent on dry runs.
    pub change: Option<SourceFileChange>,
    /// Attached access grant.
    pub access_grant: Option<AccessGrant>,
}

/// Renders blends and commits them into the LookML repository.
#[derive(Clone)]
pub struct BlendPublishService {
    directory_connector: Arc<dyn DirectoryConnector>,
    source_control: Arc<dyn SourceControl>,
    deploy_webhook: Arc<dyn DeployWebhook>,
}

impl BlendPublishService {
    /// Creates a new publish service.
    #[must_use]
    pub fn new(
        directory_connector: Arc<dyn DirectoryConnector>,
        source_control: Arc<dyn SourceControl>,
        deploy_webhook: Arc<dyn DeployWebhook>,
    ) -> Self {
        Self {
            directory_connector,
            source_control,
            deploy_webhook,
        }
    }

    /// Publishes one blend.
    pub async fn publish(&self, input: PublishBlendInput) -> AppResult<PublishedBlend> {
        let PublishBlendInput {
            definition,
            credentials,
            dry_run,
            add_access_grant,
        } = input;

        let access_grant = match (&credentials.directory, definition.user_attribute()) {
            (Some(directory_credentials), Some(user_attribute)) if add_access_grant => {
                let directory = self
                    .directory_connector
                    .connect(directory_credentials)
                    .await?;
                let access_grant = AccessGrantResolver::new(directory)
                    .resolve(&definition.models(), user_attribute, definition.uuid())
                    .await?;
                Some(access_grant)
            }
            _ => {
                info!(
                    uuid = definition.uuid(),
                    "publishing blend without access grant"
                );
                None
            }
        };

        let lookml = definition.render_lookml(access_grant.as_ref(), Utc::now());
        let mut published = PublishedBlend {
            lookml,
            explore_path: definition.explore_path(),
            explore_name: definition.name(),
            lookml_model: definition.lookml_model().to_owned(),
            dry_run,
            change: None,
            access_grant,
        };

        if dry_run {
            info!(
                uuid = definition.uuid(),
                "rendered blend without committing"
            );
            return Ok(published);
        }

        let change = self
            .source_control
            .upsert_file(
                &credentials.personal_access_token,
                SourceFileUpsert {
                    repo_name: definition.repo_name().to_owned(),
                    path: definition.file_path(),
                    content: published.lookml.clone(),
                    create_message: format!("Create blend {}", definition.uuid()),
                    update_message: format!("Update blend {}", definition.uuid()),
                },
            )
            .await?;

        info!(
            uuid = definition.uuid(),
            repo = definition.repo_name(),
            change = change.as_str(),
            "committed blend"
        );

        if let Some(secret) = credentials.webhook_secret {
            self.deploy_webhook
                .trigger_deploy(&DeployRequest {
                    base_url: credentials.base_url,
                    project_name: definition.project_name().to_owned(),
                    secret,
                })
                .await?;
            info!(
                project = definition.project_name(),
                "triggered project deploy"
            );
        }

        published.change = Some(change);
        Ok(published)
    }
}
