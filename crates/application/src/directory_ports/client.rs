use std::collections::BTreeSet;

use async_trait::async_trait;

use blend_core::AppResult;
use blend_domain::{DirectoryUser, Group, Role, UserAttribute};

/// Pagination window for user listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserListQuery {
    /// Maximum users returned, `None` for every user.
    pub limit: Option<usize>,
    /// Number of users skipped.
    pub offset: usize,
}

impl UserListQuery {
    /// Lists every user; the client pages internally.
    #[must_use]
    pub fn all() -> Self {
        Self {
            limit: None,
            offset: 0,
        }
    }

    /// Lists a single page of users.
    #[must_use]
    pub fn page(limit: usize, offset: usize) -> Self {
        Self {
            limit: Some(limit),
            offset,
        }
    }
}

/// Capability port over the BI platform's role, group and user directory.
///
/// Implementations must be safe for many concurrent in-flight calls on one
/// shared instance.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Lists the full role catalog with model sets.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Lists groups holding a role.
    async fn list_groups_for_role(&self, role_id: &str) -> AppResult<Vec<Group>>;

    /// Lists enabled, non-embed users ordered by id.
    async fn list_users(&self, query: UserListQuery) -> AppResult<Vec<DirectoryUser>>;

    /// Resolves groups by id. Unknown ids are absent from the result.
    async fn list_groups_by_id(&self, group_ids: &BTreeSet<String>) -> AppResult<Vec<Group>>;

    /// Finds a user attribute by its name.
    async fn get_user_attribute_by_name(&self, name: &str) -> AppResult<Option<UserAttribute>>;

    /// Sets a user's value for a user attribute.
    async fn set_user_attribute_value(
        &self,
        user_id: &str,
        user_attribute_id: &str,
        value: &str,
    ) -> AppResult<()>;
}
