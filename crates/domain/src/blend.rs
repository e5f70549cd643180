use std::collections::BTreeSet;

use blend_core::{AppError, AppResult, NonEmptyString};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccessGrant, SourceFieldType};

/// Separator between model and explore in a fully qualified explore id.
const EXPLORE_ID_SEPARATOR: &str = "::";

/// Whether a blend field is rendered as a dimension or a measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFieldKind {
    /// Plain dimension.
    #[default]
    Dimension,
    /// Measure in the source explore.
    Measure,
}

/// Input payload for a single blend field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendFieldInput {
    /// Query the field came from.
    pub query_uuid: String,
    /// Source field name, `view.field` or `field`.
    pub name: String,
    /// Column alias in the blend SQL.
    pub sql_alias: String,
    /// Short label.
    pub label_short: String,
    /// View label.
    pub view_label: String,
    /// Group label.
    pub group_label: String,
    /// Field description.
    pub description: String,
    /// Source LookML type.
    pub field_type: String,
    /// Whether to emit a measure when the type re-aggregates.
    pub create_measure: bool,
    /// Source field kind.
    pub kind: BlendFieldKind,
}

/// Validated blend field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendField {
    query_uuid: NonEmptyString,
    name: String,
    sql_alias: NonEmptyString,
    label_short: String,
    view_label: String,
    group_label: String,
    description: String,
    source_type: SourceFieldType,
    create_measure: bool,
    kind: BlendFieldKind,
}

impl BlendField {
    /// Creates a validated blend field.
    pub fn new(input: BlendFieldInput) -> AppResult<Self> {
        if !is_field_name(input.name.as_str()) {
            return Err(AppError::Validation(format!(
                "field name '{}' must be snake_case with at most one period",
                input.name
            )));
        }

        Ok(Self {
            query_uuid: NonEmptyString::new(input.query_uuid)?,
            name: input.name,
            sql_alias: NonEmptyString::new(input.sql_alias)?,
            label_short: input.label_short,
            view_label: input.view_label,
            group_label: input.group_label,
            description: input.description,
            source_type: SourceFieldType::new(input.field_type),
            create_measure: input.create_measure,
            kind: input.kind,
        })
    }

    /// Returns the field name with periods flattened to underscores.
    #[must_use]
    pub fn alias(&self) -> String {
        self.name.replace('.', "_")
    }

    /// Returns the LookML field name inside the blend view.
    #[must_use]
    pub fn lookml_name(&self) -> String {
        format!("{}.{}", self.query_uuid.as_str(), self.alias())
    }

    /// Returns the measure type this field renders as, when it renders as one.
    #[must_use]
    pub fn rendered_measure_type(&self) -> Option<&'static str> {
        if self.create_measure && self.kind == BlendFieldKind::Measure {
            self.source_type.measure_type()
        } else {
            None
        }
    }

    fn to_lookml(&self) -> String {
        let (keyword, lookml_type) = match self.rendered_measure_type() {
            Some(measure_type) => ("measure", measure_type),
            None => ("dimension", self.source_type.dimension_type()),
        };

        format!(
            "  {keyword}: {} {{\n    label: {}\n    view_label: {}\n    group_label: {}\n    description: {}\n    type: {lookml_type}\n    sql: ${{TABLE}}.{} ;;\n  }}",
            self.lookml_name(),
            quoted(&self.label_short),
            quoted(&self.view_label),
            quoted(&self.group_label),
            quoted(&self.description),
            self.sql_alias.as_str(),
        )
    }
}

/// Input payload for a blend definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendDefinitionInput {
    /// Stable blend identifier, snake_case.
    pub uuid: String,
    /// Instance URL used in the generated header.
    pub url: String,
    /// Fields exposed by the blend view.
    pub fields: Vec<BlendFieldInput>,
    /// Derived table SQL.
    pub sql: String,
    /// Source explores as `model::explore`.
    pub explore_ids: BTreeSet<String>,
    /// LookML project receiving the file.
    pub project_name: String,
    /// User attribute for the access grant.
    pub user_attribute: Option<String>,
    /// Include statement for the generated file.
    pub includes: Option<String>,
    /// Explore label override.
    pub explore_label: Option<String>,
    /// Repository receiving the file, `owner/name`.
    pub repo_name: String,
    /// Database connection of the derived table.
    pub connection_name: String,
    /// LookML model the blend explore is reachable from, snake_case.
    pub lookml_model: String,
    /// Comment line added to the file header.
    pub user_commit_comment: Option<String>,
}

/// Validated blend definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlendDefinition {
    uuid: String,
    url: String,
    fields: Vec<BlendField>,
    sql: NonEmptyString,
    explore_ids: BTreeSet<String>,
    project_name: String,
    user_attribute: Option<String>,
    includes: Option<String>,
    explore_label: Option<String>,
    repo_name: NonEmptyString,
    connection_name: String,
    lookml_model: String,
    user_commit_comment: Option<String>,
}

impl BlendDefinition {
    /// Creates a validated blend definition.
    pub fn new(input: BlendDefinitionInput) -> AppResult<Self> {
        if !is_snake_case(input.uuid.as_str()) {
            return Err(AppError::Validation(format!(
                "uuid '{}' must be snake_case",
                input.uuid
            )));
        }

        if !is_snake_case(input.lookml_model.as_str()) {
            return Err(AppError::Validation(format!(
                "lookml_model '{}' must be snake_case",
                input.lookml_model
            )));
        }

        let repo_name = NonEmptyString::new(input.repo_name)
            .map_err(|_| AppError::Validation("repo_name is required".to_owned()))?;

        let sql = NonEmptyString::new(input.sql)
            .map_err(|_| AppError::Validation("sql is required".to_owned()))?;

        let fields = input
            .fields
            .into_iter()
            .map(BlendField::new)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            uuid: input.uuid,
            url: input.url,
            fields,
            sql,
            explore_ids: input.explore_ids,
            project_name: input.project_name,
            user_attribute: non_blank(input.user_attribute),
            includes: non_blank(input.includes),
            explore_label: non_blank(input.explore_label),
            repo_name,
            connection_name: input.connection_name,
            lookml_model: input.lookml_model,
            user_commit_comment: non_blank(input.user_commit_comment),
        })
    }

    /// Returns the blend identifier.
    #[must_use]
    pub fn uuid(&self) -> &str {
        self.uuid.as_str()
    }

    /// Returns the view and explore name.
    #[must_use]
    pub fn name(&self) -> String {
        format!("blend_{}", self.uuid)
    }

    /// Returns the explore label.
    #[must_use]
    pub fn explore_label(&self) -> String {
        self.explore_label
            .clone()
            .unwrap_or_else(|| format!("Blend {}", self.uuid))
    }

    /// Returns the distinct models referenced by the source explores.
    #[must_use]
    pub fn models(&self) -> BTreeSet<String> {
        self.explore_ids
            .iter()
            .map(|explore_id| {
                explore_id
                    .split(EXPLORE_ID_SEPARATOR)
                    .next()
                    .unwrap_or(explore_id.as_str())
                    .to_owned()
            })
            .collect()
    }

    /// Returns the user attribute for the access grant, when configured.
    #[must_use]
    pub fn user_attribute(&self) -> Option<&str> {
        self.user_attribute.as_deref()
    }

    /// Returns the target repository.
    #[must_use]
    pub fn repo_name(&self) -> &str {
        self.repo_name.as_str()
    }

    /// Returns the LookML project name.
    #[must_use]
    pub fn project_name(&self) -> &str {
        self.project_name.as_str()
    }

    /// Returns the LookML model name.
    #[must_use]
    pub fn lookml_model(&self) -> &str {
        self.lookml_model.as_str()
    }

    /// Returns the connection of the derived table.
    #[must_use]
    pub fn connection_name(&self) -> &str {
        self.connection_name.as_str()
    }

    /// Returns the blend fields.
    #[must_use]
    pub fn fields(&self) -> &[BlendField] {
        &self.fields
    }

    /// Returns the repository path of the generated file.
    #[must_use]
    pub fn file_path(&self) -> String {
        format!("blends/{}.explore.lkml", self.uuid)
    }

    /// Returns the instance-relative explore path.
    #[must_use]
    pub fn explore_path(&self) -> String {
        format!("/explore/{}/{}", self.lookml_model, self.name())
    }

    /// Renders the complete LookML file.
    #[must_use]
    pub fn render_lookml(
        &self,
        access_grant: Option<&AccessGrant>,
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut sections = Vec::new();

        let mut header = format!(
            "# This file is automatically generated: {}\n",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        if let Some(comment) = &self.user_commit_comment {
            for line in comment.lines() {
                header.push_str(&format!("# {line}\n"));
            }
        }
        header.push_str(&format!(
            "# URL: {}{}",
            self.url.trim_end_matches('/'),
            self.explore_path()
        ));
        sections.push(header);

        if let Some(includes) = &self.includes {
            sections.push(format!("include: {}", quoted(includes)));
        }

        if let Some(access_grant) = access_grant {
            sections.push(access_grant.to_lookml());
        }

        let mut view = format!(
            "view: {} {{\n  derived_table: {{\n    sql: {} ;;\n  }}",
            self.name(),
            self.sql.as_str().trim()
        );
        for field in &self.fields {
            view.push('\n');
            view.push_str(&field.to_lookml());
        }
        view.push_str("\n}");
        sections.push(view);

        let mut explore = format!(
            "explore: {} {{\n  hidden: yes\n  label: {}",
            self.name(),
            quoted(&self.explore_label())
        );
        if let Some(access_grant) = access_grant {
            explore.push('\n');
            explore.push_str(&access_grant.explore_requirement());
        }
        explore.push_str("\n}");
        sections.push(explore);

        let mut lookml = sections.join("\n\n");
        lookml.push('\n');
        lookml
    }
}

/// Returns whether the value matches `^[a-z][a-z0-9_]*$`.
#[must_use]
pub fn is_snake_case(value: &str) -> bool {
    let mut characters = value.chars();
    let Some(first) = characters.next() else {
        return false;
    };

    first.is_ascii_lowercase()
        && characters.all(|character| {
            character.is_ascii_lowercase() || character.is_ascii_digit() || character == '_'
        })
}

fn is_field_name(value: &str) -> bool {
    match value.split_once('.') {
        Some((view, field)) => is_snake_case(view) && is_snake_case(field),
        None => is_snake_case(value),
    }
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
