use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{error, info, warn};

use blend_core::{AppError, AppResult};
use blend_domain::{AccessGrant, intersect_model_groups};

use crate::DirectoryClient;

/// Resolves which directory groups may see every model a blend reads from.
#[derive(Clone)]
pub struct AccessGrantResolver {
    directory: Arc<dyn DirectoryClient>,
}

/// Per-model mapping collected while resolving, kept for diagnostics.
#[derive(Debug, Default)]
struct ModelAccess {
    roles: BTreeMap<String, BTreeSet<String>>,
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl ModelAccess {
    fn describe(&self) -> String {
        self.roles
            .iter()
            .map(|(model, roles)| {
                let groups = self.groups.get(model).cloned().unwrap_or_default();
                format!(
                    "{model} -> roles [{}] groups [{}]",
                    join(roles),
                    join(&groups)
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl AccessGrantResolver {
    /// Creates a resolver bound to an authenticated directory client.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }

    /// Computes the access grant for a set of models.
    ///
    /// Fails with `Validation` for an empty model set before any directory
    /// call, and with `NoIntersection` when no group reaches every model.
    pub async fn resolve(
        &self,
        models: &BTreeSet<String>,
        user_attribute: &str,
        grant_id: &str,
    ) -> AppResult<AccessGrant> {
        if models.is_empty() {
            error!(grant_id, "no models provided for access grant");
            return Err(AppError::Validation("no models provided".to_owned()));
        }

        let roles = self.directory.list_roles().await?;

        let mut access = ModelAccess::default();
        for model in models {
            let granting_roles: BTreeSet<String> = roles
                .iter()
                .filter(|role| role.grants_model(model))
                .map(|role| role.id().to_owned())
                .collect();
            if granting_roles.is_empty() {
                warn!(model = %model, "model is not granted by any role");
            }
            access.roles.insert(model.clone(), granting_roles);
        }

        let mut role_groups: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut group_names: BTreeMap<String, String> = BTreeMap::new();
        for role_id in access.roles.values().flatten() {
            if role_groups.contains_key(role_id) {
                continue;
            }

            let groups = self.directory.list_groups_for_role(role_id).await?;
            let group_ids = groups.iter().map(|group| group.id().to_owned()).collect();
            for group in groups {
                group_names.insert(group.id().to_owned(), group.name().to_owned());
            }
            role_groups.insert(role_id.clone(), group_ids);
        }

        for (model, model_roles) in &access.roles {
            let groups = model_roles
                .iter()
                .filter_map(|role_id| role_groups.get(role_id))
                .flatten()
                .cloned()
                .collect();
            access.groups.insert(model.clone(), groups);
        }

        let intersection = intersect_model_groups(&access.groups);
        if intersection.is_empty() {
            let mapping = access.describe();
            error!(
                grant_id,
                models = %join(models),
                mapping = %mapping,
                "no intersection groups found"
            );
            return Err(AppError::NoIntersection(mapping));
        }

        let allowed_values: BTreeSet<String> = intersection
            .iter()
            .filter_map(|group_id| group_names.get(group_id))
            .cloned()
            .collect();

        info!(
            grant_id,
            user_attribute,
            allowed_values = %join(&allowed_values),
            "resolved access grant"
        );

        Ok(AccessGrant::new(grant_id, user_attribute, allowed_values))
    }
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests;
