use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier of the implicit group every directory user belongs to.
pub const ALL_USERS_GROUP_ID: &str = "1";

/// Attribute type tag required for group-synchronized user attributes.
pub const ADVANCED_FILTER_STRING_TYPE: &str = "advanced_filter_string";

/// Role snapshot: a bundle of model access permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: String,
    models: BTreeSet<String>,
}

impl Role {
    /// Creates a role snapshot.
    #[must_use]
    pub fn new(id: impl Into<String>, models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the models this role grants access to.
    #[must_use]
    pub fn models(&self) -> &BTreeSet<String> {
        &self.models
    }

    /// Returns whether the role grants access to the model.
    #[must_use]
    pub fn grants_model(&self, model: &str) -> bool {
        self.models.contains(model)
    }
}

/// Group snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    id: String,
    name: String,
}

impl Group {
    /// Creates a group snapshot.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the group identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the group display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Directory user with its group memberships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    id: String,
    group_ids: Vec<String>,
}

impl DirectoryUser {
    /// Creates a directory user. Missing memberships are stored as empty.
    #[must_use]
    pub fn new(id: impl Into<String>, group_ids: Option<Vec<String>>) -> Self {
        Self {
            id: id.into(),
            group_ids: group_ids.unwrap_or_default(),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns group identifiers in directory order.
    #[must_use]
    pub fn group_ids(&self) -> &[String] {
        &self.group_ids
    }

    /// Computes the attribute value for this user from resolved group names.
    ///
    /// Names are joined with `,` in membership order. Ids missing from
    /// `group_names` are skipped, which covers both the all-users sentinel and
    /// groups deleted since the membership snapshot was taken.
    #[must_use]
    pub fn group_attribute_value(&self, group_names: &BTreeMap<String, String>) -> String {
        self.group_ids
            .iter()
            .filter_map(|group_id| group_names.get(group_id))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// User attribute definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttribute {
    id: String,
    name: String,
    attribute_type: String,
}

impl UserAttribute {
    /// Creates a user attribute definition.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        attribute_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attribute_type: attribute_type.into(),
        }
    }

    /// Returns the attribute identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the declared attribute type tag.
    #[must_use]
    pub fn attribute_type(&self) -> &str {
        self.attribute_type.as_str()
    }

    /// Returns whether values are advanced filter strings.
    #[must_use]
    pub fn is_advanced_filter_string(&self) -> bool {
        self.attribute_type == ADVANCED_FILTER_STRING_TYPE
    }
}

/// Collects the distinct group ids referenced by any user, minus the sentinel.
#[must_use]
pub fn referenced_group_ids<'a>(users: impl IntoIterator<Item = &'a DirectoryUser>) -> BTreeSet<String> {
    let mut group_ids: BTreeSet<String> = users
        .into_iter()
        .flat_map(|user| user.group_ids().iter().cloned())
        .collect();
    group_ids.remove(ALL_USERS_GROUP_ID);
    group_ids
}

/// Intersects per-model group sets.
///
/// Returns an empty set when `model_groups` is empty or when any model maps to
/// an empty set.
#[must_use]
pub fn intersect_model_groups(model_groups: &BTreeMap<String, BTreeSet<String>>) -> BTreeSet<String> {
    let mut sets = model_groups.values();
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };

    sets.fold(first.clone(), |accumulator, groups| {
        accumulator.intersection(groups).cloned().collect()
    })
}
