//! In-memory task repository for tests and ephemeral sessions.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{Scope, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository keyed by scope.
///
/// Upserts behave like the remote store: records are keyed on task id and are
/// only removed by explicit deletes. Load order follows the latest upserted
/// snapshot, with records it did not mention kept after it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<HashMap<Scope, Vec<Task>>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `tasks` for `scope`.
    #[must_use]
    pub fn with_tasks(scope: Scope, tasks: Vec<Task>) -> Self {
        let repository = Self::new();
        if let Ok(mut state) = repository.state.write() {
            state.insert(scope, tasks);
        }
        repository
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, HashMap<Scope, Vec<Task>>>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, HashMap<Scope, Vec<Task>>>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn load_all(&self, scope: &Scope) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(state.get(scope).cloned().unwrap_or_default())
    }

    async fn upsert_all(&self, scope: &Scope, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        let incoming: HashSet<TaskId> = tasks.iter().map(Task::id).collect();
        let stored = state.remove(scope).unwrap_or_default();
        let mut merged = tasks.to_vec();
        merged.extend(
            stored
                .into_iter()
                .filter(|task| !incoming.contains(&task.id())),
        );
        state.insert(*scope, merged);
        Ok(())
    }

    async fn delete_one(&self, scope: &Scope, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if let Some(tasks) = state.get_mut(scope) {
            tasks.retain(|task| task.id() != id);
        }
        Ok(())
    }

    async fn delete_many(&self, scope: &Scope, ids: &[TaskId]) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        if let Some(tasks) = state.get_mut(scope) {
            tasks.retain(|task| !ids.contains(&task.id()));
        }
        Ok(())
    }

    async fn delete_all_for_scope(&self, scope: &Scope) -> TaskRepositoryResult<()> {
        let mut state = self.write()?;
        state.remove(scope);
        Ok(())
    }
}
