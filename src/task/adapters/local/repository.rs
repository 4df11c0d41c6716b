//! Task repository that keeps each scope's list as one JSON blob.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::task::{
    domain::{PersistedTaskData, Scope, Task, TaskId},
    ports::{KeyValueStore, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Well-known storage key of the guest task list.
pub const DEFAULT_GUEST_KEY: &str = "guestTasks";

/// Task record as stored on the device.
///
/// Field names and empty-string defaults match the blobs written by earlier
/// clients, so existing guest data keeps loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    due_time: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    stack_position: i64,
}

impl From<&Task> for StoredTask {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().as_str().to_owned(),
            description: Some(task.description().to_owned()),
            due_date: Some(task.due_date().unwrap_or_default().to_owned()),
            due_time: Some(task.due_time().unwrap_or_default().to_owned()),
            completed: task.is_completed(),
            stack_position: i64::from(task.stack_position().value()),
        }
    }
}

impl TryFrom<StoredTask> for Task {
    type Error = TaskRepositoryError;

    fn try_from(stored: StoredTask) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&stored.id)
            .map_err(|err| TaskRepositoryError::invalid_record(stored.id.clone(), err))?;
        let id = stored.id;
        Self::from_persisted(PersistedTaskData {
            id: TaskId::from_uuid(uuid),
            title: stored.title,
            description: stored.description.unwrap_or_default(),
            due_date: stored.due_date,
            due_time: stored.due_time,
            completed: stored.completed,
            stack_position: stored.stack_position,
        })
        .map_err(|err| TaskRepositoryError::invalid_record(id, err))
    }
}

/// Device-local task repository over a [`KeyValueStore`].
///
/// The guest scope lives under the configured guest key; user scopes, when
/// routed here, get a key suffixed with the user id. Saves replace the whole
/// blob.
#[derive(Debug, Clone)]
pub struct LocalTaskRepository<S>
where
    S: KeyValueStore,
{
    store: S,
    guest_key: String,
}

impl<S> LocalTaskRepository<S>
where
    S: KeyValueStore,
{
    /// Creates a repository using [`DEFAULT_GUEST_KEY`].
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_guest_key(store, DEFAULT_GUEST_KEY)
    }

    /// Creates a repository storing guest tasks under `guest_key`.
    #[must_use]
    pub fn with_guest_key(store: S, guest_key: impl Into<String>) -> Self {
        Self {
            store,
            guest_key: guest_key.into(),
        }
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Returns the storage key used for `scope`.
    #[must_use]
    pub fn storage_key(&self, scope: &Scope) -> String {
        match scope {
            Scope::Guest => self.guest_key.clone(),
            Scope::User(user_id) => format!("{}_{}", self.guest_key, user_id),
        }
    }

    async fn read_blob(&self, scope: &Scope) -> TaskRepositoryResult<Vec<StoredTask>> {
        let key = self.storage_key(scope);
        let Some(blob) = self
            .store
            .get(&key)
            .await
            .map_err(TaskRepositoryError::persistence)?
        else {
            return Ok(Vec::new());
        };
        if blob.trim().is_empty() {
            return Ok(Vec::new());
        }
        let entries: Vec<serde_json::Value> =
            serde_json::from_str(&blob).map_err(TaskRepositoryError::persistence)?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<StoredTask>(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(key = %key, error = %err, "skipping malformed local task record");
                    None
                }
            })
            .collect())
    }

    async fn write_blob(&self, scope: &Scope, records: &[StoredTask]) -> TaskRepositoryResult<()> {
        let key = self.storage_key(scope);
        let blob = serde_json::to_string(records).map_err(TaskRepositoryError::persistence)?;
        self.store
            .set(&key, &blob)
            .await
            .map_err(TaskRepositoryError::persistence)
    }

    async fn retain(
        &self,
        scope: &Scope,
        keep: impl Fn(&StoredTask) -> bool + Send,
    ) -> TaskRepositoryResult<()> {
        let records = self.read_blob(scope).await?;
        let before = records.len();
        let kept: Vec<StoredTask> = records.into_iter().filter(|record| keep(record)).collect();
        if kept.len() == before {
            return Ok(());
        }
        self.write_blob(scope, &kept).await
    }
}

#[async_trait]
impl<S> TaskRepository for LocalTaskRepository<S>
where
    S: KeyValueStore,
{
    async fn load_all(&self, scope: &Scope) -> TaskRepositoryResult<Vec<Task>> {
        let records = self.read_blob(scope).await?;
        let tasks: Vec<Task> = records
            .into_iter()
            .filter_map(|record| match Task::try_from(record) {
                Ok(task) => Some(task),
                Err(err) => {
                    tracing::warn!(scope = %scope, error = %err, "skipping invalid local task record");
                    None
                }
            })
            .collect();
        tracing::debug!(scope = %scope, count = tasks.len(), "loaded local task list");
        Ok(tasks)
    }

    async fn upsert_all(&self, scope: &Scope, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let records: Vec<StoredTask> = tasks.iter().map(StoredTask::from).collect();
        self.write_blob(scope, &records).await
    }

    async fn delete_one(&self, scope: &Scope, id: TaskId) -> TaskRepositoryResult<()> {
        let id = id.to_string();
        self.retain(scope, move |record| record.id != id).await
    }

    async fn delete_many(&self, scope: &Scope, ids: &[TaskId]) -> TaskRepositoryResult<()> {
        let ids: Vec<String> = ids.iter().map(ToString::to_string).collect();
        self.retain(scope, move |record| !ids.contains(&record.id)).await
    }

    async fn delete_all_for_scope(&self, scope: &Scope) -> TaskRepositoryResult<()> {
        let key = self.storage_key(scope);
        self.store
            .remove(&key)
            .await
            .map_err(TaskRepositoryError::persistence)
    }
}
