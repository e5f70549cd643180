use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Named LookML access restriction attached to a rendered blend explore.
///
/// Allowed values are kept in a sorted set so identical inputs always render
/// identical text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    grant_id: String,
    user_attribute: String,
    allowed_values: BTreeSet<String>,
}

impl AccessGrant {
    /// Creates an access grant.
    #[must_use]
    pub fn new(
        grant_id: impl Into<String>,
        user_attribute: impl Into<String>,
        allowed_values: BTreeSet<String>,
    ) -> Self {
        Self {
            grant_id: grant_id.into(),
            user_attribute: user_attribute.into(),
            allowed_values,
        }
    }

    /// Returns the grant identifier (the blend uuid).
    #[must_use]
    pub fn grant_id(&self) -> &str {
        self.grant_id.as_str()
    }

    /// Returns the user attribute the grant checks.
    #[must_use]
    pub fn user_attribute(&self) -> &str {
        self.user_attribute.as_str()
    }

    /// Returns the allowed group names.
    #[must_use]
    pub fn allowed_values(&self) -> &BTreeSet<String> {
        &self.allowed_values
    }

    /// Returns the LookML object name of the grant.
    #[must_use]
    pub fn name(&self) -> String {
        format!("access_grant_{}", self.grant_id)
    }

    /// Renders the explore-level `required_access_grants` line.
    #[must_use]
    pub fn explore_requirement(&self) -> String {
        format!("  required_access_grants: [{}]", self.name())
    }

    /// Renders the top-level `access_grant` block.
    #[must_use]
    pub fn to_lookml(&self) -> String {
        let allowed_values = self
            .allowed_values
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "access_grant: {} {{\n  user_attribute: {}\n  allowed_values: [{}]\n}}",
            self.name(),
            self.user_attribute,
            allowed_values
        )
    }
}
