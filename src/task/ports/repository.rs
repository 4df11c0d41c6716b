//! Repository port for scoped task list persistence.

use crate::task::domain::{Scope, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract, implemented once per backend kind.
///
/// Every operation is keyed by a [`Scope`]. Removing records that do not
/// exist is a no-op.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Loads the scope's tasks, top of stack first.
    ///
    /// Missing or empty storage yields an empty list.
    async fn load_all(&self, scope: &Scope) -> TaskRepositoryResult<Vec<Task>>;

    /// Persists the full ordered task list. Saving the same list twice must
    /// not duplicate records.
    async fn upsert_all(&self, scope: &Scope, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Deletes a single task record.
    async fn delete_one(&self, scope: &Scope, id: TaskId) -> TaskRepositoryResult<()>;

    /// Deletes the given task records.
    async fn delete_many(&self, scope: &Scope, ids: &[TaskId]) -> TaskRepositoryResult<()>;

    /// Deletes every task record in the scope.
    async fn delete_all_for_scope(&self, scope: &Scope) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The backend does not serve the scope.
    #[error("scope {0} is not served by this repository")]
    UnsupportedScope(Scope),

    /// A stored record could not be mapped to a task.
    #[error("invalid stored task record {id}: {reason}")]
    InvalidRecord {
        /// Identifier of the offending record, as stored.
        id: String,
        /// Why the record was rejected.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds an invalid-record error.
    pub fn invalid_record(id: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidRecord {
            id: id.into(),
            reason: reason.to_string(),
        }
    }
}
