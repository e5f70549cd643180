use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::try_join_all;
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use blend_core::{AppError, AppResult};
use blend_domain::{ADVANCED_FILTER_STRING_TYPE, DirectoryUser, referenced_group_ids};

use crate::{DirectoryClient, UserListQuery};

/// Users requested per page.
pub const USER_PAGE_SIZE: usize = 500;

/// Pages fetched concurrently per round.
pub const USER_FETCH_CONCURRENCY: usize = 5;

/// Maximum in-flight attribute writes.
pub const USER_WRITE_CONCURRENCY: usize = 25;

/// How users are enumerated and which attribute types are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Concurrent paged listing; attribute must be an advanced filter string.
    #[default]
    User,
    /// Single bulk listing; any attribute type.
    Group,
}

impl SyncMode {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

/// One user whose attribute write failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// Directory user id.
    pub user_id: String,
    /// Attribute being written.
    pub user_attribute_id: String,
    /// Value that was attempted.
    pub attempted_value: String,
    /// Upstream error message.
    pub error: String,
}

/// Result of a sync run. Partial failure is reported here, not as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    /// Users enumerated.
    pub total_users: usize,
    /// Successful writes.
    pub succeeded_count: usize,
    /// Failed writes in completion order.
    pub failures: Vec<SyncFailure>,
}

impl SyncSummary {
    /// Returns whether every enumerated user was written.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.succeeded_count == self.total_users
    }
}

/// Writes each user's comma-joined group names into a user attribute.
#[derive(Clone)]
pub struct UserAttributeSyncer {
    directory: Arc<dyn DirectoryClient>,
}

impl UserAttributeSyncer {
    /// Creates a syncer bound to an authenticated directory client.
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryClient>) -> Self {
        Self { directory }
    }

    /// Synchronizes the named attribute for every directory user.
    pub async fn sync(&self, user_attribute_name: &str, mode: SyncMode) -> AppResult<SyncSummary> {
        let attribute = self
            .directory
            .get_user_attribute_by_name(user_attribute_name)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("user attribute '{user_attribute_name}' not found"))
            })?;

        if mode == SyncMode::User && !attribute.is_advanced_filter_string() {
            return Err(AppError::TypeMismatch(format!(
                "user attribute '{user_attribute_name}' has type '{}', expected '{ADVANCED_FILTER_STRING_TYPE}'",
                attribute.attribute_type()
            )));
        }

        let users = match mode {
            SyncMode::User => self.list_users_paged().await?,
            SyncMode::Group => self.directory.list_users(UserListQuery::all()).await?,
        };

        let group_ids = referenced_group_ids(&users);
        let group_names: BTreeMap<String, String> = if group_ids.is_empty() {
            BTreeMap::new()
        } else {
            self.directory
                .list_groups_by_id(&group_ids)
                .await?
                .into_iter()
                .map(|group| (group.id().to_owned(), group.name().to_owned()))
                .collect()
        };

        info!(
            user_attribute = user_attribute_name,
            mode = mode.as_str(),
            users = users.len(),
            groups = group_names.len(),
            "updating user attribute values"
        );

        let attribute_id = attribute.id();
        let group_names = &group_names;
        let writes: Vec<_> = users
            .iter()
            .map(|user| async move {
                let value = user.group_attribute_value(group_names);
                match self
                    .directory
                    .set_user_attribute_value(user.id(), attribute_id, value.as_str())
                    .await
                {
                    Ok(()) => None,
                    Err(error) => {
                        warn!(user_id = user.id(), error = %error, "failed to update user attribute");
                        Some(SyncFailure {
                            user_id: user.id().to_owned(),
                            user_attribute_id: attribute_id.to_owned(),
                            attempted_value: value,
                            error: error.to_string(),
                        })
                    }
                }
            })
            .collect();
        let outcomes: Vec<Option<SyncFailure>> = stream::iter(writes)
            .buffer_unordered(USER_WRITE_CONCURRENCY)
            .collect()
            .await;

        let failures: Vec<SyncFailure> = outcomes.into_iter().flatten().collect();
        let summary = SyncSummary {
            total_users: users.len(),
            succeeded_count: users.len() - failures.len(),
            failures,
        };

        info!(
            user_attribute = user_attribute_name,
            updated = summary.succeeded_count,
            total = summary.total_users,
            "user attribute sync finished"
        );

        Ok(summary)
    }

    /// Fetches users in rounds of concurrent pages until a short page appears.
    ///
    /// The base offset advances by a full round width even when the round's
    /// last page came back short.
    async fn list_users_paged(&self) -> AppResult<Vec<DirectoryUser>> {
        let mut users = Vec::new();
        let mut base = 0;

        loop {
            let pages = try_join_all((0..USER_FETCH_CONCURRENCY).map(|index| {
                self.directory.list_users(UserListQuery::page(
                    USER_PAGE_SIZE,
                    base + index * USER_PAGE_SIZE,
                ))
            }))
            .await?;

            let last_round = pages.iter().any(|page| page.len() < USER_PAGE_SIZE);
            users.extend(pages.into_iter().flatten());
            if last_round {
                return Ok(users);
            }

            base += USER_PAGE_SIZE * USER_FETCH_CONCURRENCY;
        }
    }
}
