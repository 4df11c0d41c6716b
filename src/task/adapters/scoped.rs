//! Repository that routes each scope to its backend.

use async_trait::async_trait;

use crate::task::{
    domain::{Scope, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryResult},
};

/// Dispatches guest scopes to the local backend and user scopes to the
/// remote one.
#[derive(Debug, Clone)]
pub struct ScopedTaskRepository<L, R>
where
    L: TaskRepository,
    R: TaskRepository,
{
    local: L,
    remote: R,
}

impl<L, R> ScopedTaskRepository<L, R>
where
    L: TaskRepository,
    R: TaskRepository,
{
    /// Creates a router over the two backends.
    #[must_use]
    pub const fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }

    /// Returns the local backend.
    #[must_use]
    pub const fn local(&self) -> &L {
        &self.local
    }

    /// Returns the remote backend.
    #[must_use]
    pub const fn remote(&self) -> &R {
        &self.remote
    }

    fn backend(&self, scope: &Scope) -> &dyn TaskRepository {
        match scope {
            Scope::Guest => &self.local,
            Scope::User(_) => &self.remote,
        }
    }
}

#[async_trait]
impl<L, R> TaskRepository for ScopedTaskRepository<L, R>
where
    L: TaskRepository,
    R: TaskRepository,
{
    async fn load_all(&self, scope: &Scope) -> TaskRepositoryResult<Vec<Task>> {
        self.backend(scope).load_all(scope).await
    }

    async fn upsert_all(&self, scope: &Scope, tasks: &[Task]) -> TaskRepositoryResult<()> {
        self.backend(scope).upsert_all(scope, tasks).await
    }

    async fn delete_one(&self, scope: &Scope, id: TaskId) -> TaskRepositoryResult<()> {
        self.backend(scope).delete_one(scope, id).await
    }

    async fn delete_many(&self, scope: &Scope, ids: &[TaskId]) -> TaskRepositoryResult<()> {
        self.backend(scope).delete_many(scope, ids).await
    }

    async fn delete_all_for_scope(&self, scope: &Scope) -> TaskRepositoryResult<()> {
        self.backend(scope).delete_all_for_scope(scope).await
    }
}
