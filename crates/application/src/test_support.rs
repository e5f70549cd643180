use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use blend_core::{AppError, AppResult};
use blend_domain::{DirectoryUser, Group, Role, UserAttribute};

use crate::{DirectoryClient, UserListQuery};

/// Tracks concurrent calls and the highest concurrency observed.
#[derive(Default)]
pub(crate) struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let current = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(current, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub(crate) fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Page fetch boundary, keyed by offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PageEvent {
    Started(usize),
    Finished(usize),
}

#[derive(Default)]
pub(crate) struct FakeDirectoryClient {
    pub(crate) roles: Vec<Role>,
    pub(crate) role_groups: HashMap<String, Vec<Group>>,
    pub(crate) users: Vec<DirectoryUser>,
    /// When set, pages are generated with these lengths by offset instead of
    /// slicing `users`.
    pub(crate) page_lengths: HashMap<usize, usize>,
    pub(crate) groups: Vec<Group>,
    pub(crate) attributes: Vec<UserAttribute>,
    pub(crate) failing_user_ids: HashSet<String>,
    pub(crate) unavailable: bool,
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) user_queries: Mutex<Vec<UserListQuery>>,
    pub(crate) page_events: Mutex<Vec<PageEvent>>,
    pub(crate) group_lookups: Mutex<Vec<BTreeSet<String>>>,
    pub(crate) written_values: Mutex<Vec<(String, String, String)>>,
    pub(crate) page_fetches: InFlight,
    pub(crate) writes: InFlight,
}

impl FakeDirectoryClient {
    async fn record(&self, call: String) -> AppResult<()> {
        self.calls.lock().await.push(call);
        if self.unavailable {
            return Err(AppError::Unavailable("directory login rejected".to_owned()));
        }

        Ok(())
    }

    pub(crate) async fn calls_named(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl DirectoryClient for FakeDirectoryClient {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.record("list_roles".to_owned()).await?;
        Ok(self.roles.clone())
    }

    async fn list_groups_for_role(&self, role_id: &str) -> AppResult<Vec<Group>> {
        self.record(format!("list_groups_for_role:{role_id}"))
            .await?;
        Ok(self.role_groups.get(role_id).cloned().unwrap_or_default())
    }

    async fn list_users(&self, query: UserListQuery) -> AppResult<Vec<DirectoryUser>> {
        self.record("list_users".to_owned()).await?;
        self.user_queries.lock().await.push(query);

        self.page_events
            .lock()
            .await
            .push(PageEvent::Started(query.offset));
        self.page_fetches.enter();
        tokio::task::yield_now().await;
        self.page_fetches.leave();
        self.page_events
            .lock()
            .await
            .push(PageEvent::Finished(query.offset));

        if !self.page_lengths.is_empty() {
            let length = self
                .page_lengths
                .get(&query.offset)
                .copied()
                .unwrap_or_default();
            return Ok((query.offset..query.offset + length)
                .map(|index| DirectoryUser::new(index.to_string(), Some(vec!["1".to_owned()])))
                .collect());
        }

        let users = self.users.iter().skip(query.offset);
        Ok(match query.limit {
            Some(limit) => users.take(limit).cloned().collect(),
            None => users.cloned().collect(),
        })
    }

    async fn list_groups_by_id(&self, group_ids: &BTreeSet<String>) -> AppResult<Vec<Group>> {
        self.record("list_groups_by_id".to_owned()).await?;
        self.group_lookups.lock().await.push(group_ids.clone());
        Ok(self
            .groups
            .iter()
            .filter(|group| group_ids.contains(group.id()))
            .cloned()
            .collect())
    }

    async fn get_user_attribute_by_name(&self, name: &str) -> AppResult<Option<UserAttribute>> {
        self.record(format!("get_user_attribute_by_name:{name}"))
            .await?;
        Ok(self
            .attributes
            .iter()
            .find(|attribute| attribute.name() == name)
            .cloned())
    }

    async fn set_user_attribute_value(
        &self,
        user_id: &str,
        user_attribute_id: &str,
        value: &str,
    ) -> AppResult<()> {
        self.writes.enter();
        tokio::task::yield_now().await;
        self.writes.leave();

        if self.failing_user_ids.contains(user_id) {
            return Err(AppError::Unavailable(format!(
                "failed to update user '{user_id}'"
            )));
        }

        self.written_values.lock().await.push((
            user_id.to_owned(),
            user_attribute_id.to_owned(),
            value.to_owned(),
        ));
        Ok(())
    }
}
