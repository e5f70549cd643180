use blend_core::AppResult;
use blend_domain::{BlendDefinition, BlendDefinitionInput, BlendFieldInput, BlendFieldKind};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Source field kind of a blend field.
#[derive(Debug, Clone, Copy, Default, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/blend-field-kind-dto.ts"
)]
pub enum BlendFieldKindDto {
    #[default]
    Dimension,
    Measure,
}

impl From<BlendFieldKindDto> for BlendFieldKind {
    fn from(value: BlendFieldKindDto) -> Self {
        match value {
            BlendFieldKindDto::Dimension => Self::Dimension,
            BlendFieldKindDto::Measure => Self::Measure,
        }
    }
}

/// One field of the blend view.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/blend-field-request.ts"
)]
pub struct BlendFieldRequest {
    pub query_uuid: String,
    pub name: String,
    pub sql_alias: String,
    pub label_short: String,
    pub view_label: String,
    #[serde(default)]
    pub group_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub lookml_type: String,
    #[serde(default)]
    pub create_measure: Option<bool>,
    #[serde(default)]
    pub field_type: BlendFieldKindDto,
}

/// Incoming payload for publishing a blend.
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-blend-request.ts"
)]
pub struct PublishBlendRequest {
    pub uuid: String,
    pub url: String,
    pub fields: Vec<BlendFieldRequest>,
    pub sql: String,
    pub explore_ids: Vec<String>,
    pub project_name: String,
    #[serde(default)]
    pub user_attribute: Option<String>,
    #[serde(default)]
    pub includes: Option<String>,
    #[serde(default)]
    pub explore_label: Option<String>,
    #[serde(default)]
    pub repo_name: String,
    pub connection_name: String,
    pub lookml_model: String,
    #[serde(default)]
    pub user_commit_comment: Option<String>,
    #[serde(default)]
    pub create_measures: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default = "default_add_access_grant")]
    pub add_access_grant: bool,
}

fn default_add_access_grant() -> bool {
    true
}

impl PublishBlendRequest {
    /// Validates the payload into a blend definition.
    pub fn to_definition(&self) -> AppResult<BlendDefinition> {
        let fields = self
            .fields
            .iter()
            .map(|field| BlendFieldInput {
                query_uuid: field.query_uuid.clone(),
                name: field.name.clone(),
                sql_alias: field.sql_alias.clone(),
                label_short: field.label_short.clone(),
                view_label: field.view_label.clone(),
                group_label: field.group_label.clone(),
                description: field.description.clone(),
                field_type: field.lookml_type.clone(),
                create_measure: field.create_measure.unwrap_or(self.create_measures),
                kind: field.field_type.into(),
            })
            .collect();

        BlendDefinition::new(BlendDefinitionInput {
            uuid: self.uuid.clone(),
            url: self.url.clone(),
            fields,
            sql: self.sql.clone(),
            explore_ids: self.explore_ids.iter().cloned().collect(),
            project_name: self.project_name.clone(),
            user_attribute: self.user_attribute.clone(),
            includes: self.includes.clone(),
            explore_label: self.explore_label.clone(),
            repo_name: self.repo_name.clone(),
            connection_name: self.connection_name.clone(),
            lookml_model: self.lookml_model.clone(),
            user_commit_comment: self.user_commit_comment.clone(),
        })
    }
}

/// Published blend payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/publish-blend-response.ts"
)]
pub struct PublishBlendResponse {
    pub success: bool,
    pub dry_run: bool,
    pub explore_url: String,
    pub lookml_model: String,
    pub explore_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookml: Option<String>,
}
