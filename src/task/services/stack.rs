//! Service layer orchestrating the task stack, its history, and persistence.

use crate::task::{
    domain::{
        HistoryEffect, HistoryError, OperationHistory, PersistenceIntent, Scope, StackError, Task,
        TaskDomainError, TaskDraft, TaskId, TaskStack,
    },
    ports::{SessionContext, TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard};

use super::{Outcome, StackNotice, StackOperation};

/// What the service does with in-memory state when persistence fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistencePolicy {
    /// Keep the applied change; the in-memory list stays authoritative for
    /// the session.
    #[default]
    Optimistic,
    /// Restore the task list and history to their pre-operation state.
    RollbackOnFailure,
}

/// Service-level errors for task stack operations.
#[derive(Debug, Error)]
pub enum TaskStackError {
    /// Caller input was invalid.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The stack was empty or the task absent.
    #[error(transparent)]
    Stack(#[from] StackError),
    /// Nothing to undo or redo.
    #[error(transparent)]
    History(#[from] HistoryError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Neither a user session nor guest mode is active.
    #[error("no active session: sign in or continue as guest")]
    NoActiveSession,
}

impl TaskStackError {
    /// Returns whether the error is an expected condition to show as an
    /// informational message rather than a failure.
    #[must_use]
    pub const fn is_informational(&self) -> bool {
        matches!(self, Self::Stack(_) | Self::History(_))
    }
}

/// Result type for task stack service operations.
pub type TaskStackResult<T> = Result<T, TaskStackError>;

/// Result of completing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// The completed task.
    pub task: Task,
    /// Whether this completion emptied the stack.
    pub all_complete: bool,
}

impl Completion {
    /// Returns the notice shown after the completion notice, present only
    /// when the stack was emptied.
    #[must_use]
    pub const fn follow_up(&self) -> Option<StackNotice> {
        if self.all_complete {
            Some(StackNotice::AllComplete)
        } else {
            None
        }
    }
}

/// Snapshot of the stack for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackView {
    /// Tasks ordered top first.
    pub tasks: Vec<Task>,
    /// Whether an undo is available.
    pub can_undo: bool,
    /// Whether a redo is available.
    pub can_redo: bool,
}

#[derive(Debug, Clone, Default)]
struct StackState {
    scope: Option<Scope>,
    stack: TaskStack,
    history: OperationHistory,
}

#[derive(Debug, Clone)]
struct Checkpoint {
    stack: TaskStack,
    history: OperationHistory,
}

impl StackState {
    fn enter_scope(&mut self, scope: Scope, tasks: Vec<Task>) {
        self.scope = Some(scope);
        self.stack = TaskStack::from_tasks(tasks);
        self.history.reset();
    }

    fn checkpoint(&self, policy: PersistencePolicy) -> Option<Checkpoint> {
        match policy {
            PersistencePolicy::Optimistic => None,
            PersistencePolicy::RollbackOnFailure => Some(Checkpoint {
                stack: self.stack.clone(),
                history: self.history.clone(),
            }),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.stack = checkpoint.stack;
        self.history = checkpoint.history;
    }

    fn view(&self) -> StackView {
        StackView {
            tasks: self.stack.snapshot(),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
}

/// Task stack orchestration service.
///
/// Operations are serialized: each one holds the state lock until its
/// repository writes have completed, so a push never observes a stale
/// length. The active scope is read from the session at the start of every
/// operation; a change of scope reloads the list and drops the history.
#[derive(Clone)]
pub struct TaskStackService<R, S>
where
    R: TaskRepository,
    S: SessionContext,
{
    repository: Arc<R>,
    session: Arc<S>,
    policy: PersistencePolicy,
    state: Arc<Mutex<StackState>>,
}

impl<R, S> TaskStackService<R, S>
where
    R: TaskRepository,
    S: SessionContext,
{
    /// Creates a service with the [`PersistencePolicy::Optimistic`] policy.
    #[must_use]
    pub fn new(repository: Arc<R>, session: Arc<S>) -> Self {
        Self::with_policy(repository, session, PersistencePolicy::default())
    }

    /// Creates a service with an explicit persistence policy.
    #[must_use]
    pub fn with_policy(repository: Arc<R>, session: Arc<S>, policy: PersistencePolicy) -> Self {
        Self {
            repository,
            session,
            policy,
            state: Arc::new(Mutex::new(StackState::default())),
        }
    }

    /// Returns the persistence policy in effect.
    #[must_use]
    pub const fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    /// Reloads the active scope's tasks from the repository and drops the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::NoActiveSession`] without a scope, or
    /// [`TaskStackError::Repository`] when loading fails.
    pub async fn reload(&self) -> TaskStackResult<StackView> {
        let scope = self.active_scope()?;
        let mut state = self.state.lock().await;
        let tasks = self.repository.load_all(&scope).await?;
        tracing::debug!(scope = %scope, count = tasks.len(), "reloaded task stack");
        state.enter_scope(scope, tasks);
        Ok(state.view())
    }

    /// Returns the current tasks and undo/redo availability.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn view(&self) -> TaskStackResult<StackView> {
        let (state, _) = self.enter().await?;
        Ok(state.view())
    }

    /// Returns the number of tasks on the stack.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn task_count(&self) -> TaskStackResult<usize> {
        let (state, _) = self.enter().await?;
        Ok(state.stack.len())
    }

    /// Returns whether an undo is available.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn can_undo(&self) -> TaskStackResult<bool> {
        let (state, _) = self.enter().await?;
        Ok(state.history.can_undo())
    }

    /// Returns whether a redo is available.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn can_redo(&self) -> TaskStackResult<bool> {
        let (state, _) = self.enter().await?;
        Ok(state.history.can_redo())
    }

    /// Pushes a new task onto the stack and records it for undo.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Domain`] for a blank title (nothing
    /// changes), or [`TaskStackError::Repository`] when persisting fails.
    pub async fn push(&self, draft: TaskDraft) -> TaskStackResult<Outcome<Task>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let (task, intents) = state.stack.push(draft)?.into_parts();
        state.history.record_push(task.clone());
        self.persist(&mut state, scope, StackOperation::Push, checkpoint, &intents)
            .await?;

        let notice = StackNotice::Pushed {
            title: task.title().to_string(),
        };
        Ok(Outcome::new(task, notice))
    }

    /// Pops the top task and records it for undo.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Stack`] when the stack is empty (nothing
    /// changes), or [`TaskStackError::Repository`] when persisting fails.
    pub async fn pop(&self) -> TaskStackResult<Outcome<Task>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let (task, intents) = state.stack.pop()?.into_parts();
        state.history.record_pop(task.clone());
        self.persist(&mut state, scope, StackOperation::Pop, checkpoint, &intents)
            .await?;

        let notice = StackNotice::Popped {
            title: task.title().to_string(),
        };
        Ok(Outcome::new(task, notice))
    }

    /// Returns the top task without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Stack`] when the stack is empty.
    pub async fn peek(&self) -> TaskStackResult<Outcome<Task>> {
        let (state, _) = self.enter().await?;
        let task = state.stack.peek()?.clone();
        let notice = StackNotice::Peeked {
            title: task.title().to_string(),
        };
        Ok(Outcome::new(task, notice))
    }

    /// Returns every task, top first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn iterate(&self) -> TaskStackResult<Outcome<Vec<Task>>> {
        let (state, _) = self.enter().await?;
        let tasks = state.stack.snapshot();
        let notice = StackNotice::Iterated { count: tasks.len() };
        Ok(Outcome::new(tasks, notice))
    }

    /// Returns tasks whose title or description contains `query`, ignoring
    /// case, in stack order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError`] when the scope cannot be resolved or
    /// loaded.
    pub async fn search(&self, query: &str) -> TaskStackResult<Vec<Task>> {
        let (state, _) = self.enter().await?;
        Ok(state.stack.search(query))
    }

    /// Completes the task with `id`, wherever it sits on the stack.
    ///
    /// Completion is not recorded in the history.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Stack`] when no such task exists, or
    /// [`TaskStackError::Repository`] when persisting fails.
    pub async fn complete(&self, id: TaskId) -> TaskStackResult<Outcome<Completion>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let (task, intents) = state.stack.complete(id)?.into_parts();
        self.persist(&mut state, scope, StackOperation::Complete, checkpoint, &intents)
            .await?;

        let all_complete = state.stack.is_empty();
        if all_complete {
            tracing::info!(scope = %scope, "every task completed");
        }
        let notice = StackNotice::Completed {
            title: task.title().to_string(),
        };
        Ok(Outcome::new(Completion { task, all_complete }, notice))
    }

    /// Deletes every task whose identifier is in `ids`, returning how many
    /// were removed. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Repository`] when persisting fails.
    pub async fn delete_many(&self, ids: &HashSet<TaskId>) -> TaskStackResult<Outcome<usize>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let (removed, intents) = state.stack.delete_many(ids).into_parts();
        if !removed.is_empty() {
            self.persist(&mut state, scope, StackOperation::Delete, checkpoint, &intents)
                .await?;
        }

        let count = removed.len();
        Ok(Outcome::new(count, StackNotice::Deleted { count }))
    }

    /// Removes every task in the scope and drops the history.
    ///
    /// Clearing works even when the stored list cannot be loaded: the
    /// scope's records are deleted and the stack starts empty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::Repository`] when persisting fails.
    pub async fn clear(&self) -> TaskStackResult<Outcome<usize>> {
        let (mut state, scope) = match self.enter().await {
            Ok(entered) => entered,
            Err(TaskStackError::Repository(err)) => return self.clear_unreadable(&err).await,
            Err(err) => return Err(err),
        };
        let checkpoint = state.checkpoint(self.policy);

        let (removed, intents) = state.stack.clear().into_parts();
        state.history.reset();
        self.persist(&mut state, scope, StackOperation::Clear, checkpoint, &intents)
            .await?;

        tracing::info!(scope = %scope, count = removed, "cleared task stack");
        Ok(Outcome::new(removed, StackNotice::Cleared))
    }

    /// Reverts the latest recorded push or pop.
    ///
    /// The replay itself is not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::History`] when there is nothing to undo, or
    /// [`TaskStackError::Repository`] when persisting fails.
    pub async fn undo(&self) -> TaskStackResult<Outcome<HistoryEffect>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let effect = state.history.undo()?;
        let (_, intents) = effect.apply(&mut state.stack).into_parts();
        self.persist(&mut state, scope, StackOperation::Undo, checkpoint, &intents)
            .await?;

        Ok(Outcome::new(effect, StackNotice::Undone))
    }

    /// Re-applies the latest undone push or pop.
    ///
    /// The replay itself is not recorded.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStackError::History`] when there is nothing to redo, or
    /// [`TaskStackError::Repository`] when persisting fails.
    pub async fn redo(&self) -> TaskStackResult<Outcome<HistoryEffect>> {
        let (mut state, scope) = self.enter().await?;
        let checkpoint = state.checkpoint(self.policy);

        let effect = state.history.redo()?;
        let (_, intents) = effect.apply(&mut state.stack).into_parts();
        self.persist(&mut state, scope, StackOperation::Redo, checkpoint, &intents)
            .await?;

        Ok(Outcome::new(effect, StackNotice::Redone))
    }

    async fn clear_unreadable(
        &self,
        load_error: &TaskRepositoryError,
    ) -> TaskStackResult<Outcome<usize>> {
        let scope = self.active_scope()?;
        let mut state = self.state.lock().await;
        tracing::warn!(
            scope = %scope,
            error = %load_error,
            "stored task list unreadable, clearing scope"
        );
        self.repository.delete_all_for_scope(&scope).await?;
        state.enter_scope(scope, Vec::new());
        Ok(Outcome::new(0, StackNotice::Cleared))
    }

    fn active_scope(&self) -> TaskStackResult<Scope> {
        self.session.scope().ok_or(TaskStackError::NoActiveSession)
    }

    /// Locks the state, loading the session's scope first when it changed.
    async fn enter(&self) -> TaskStackResult<(MutexGuard<'_, StackState>, Scope)> {
        let scope = self.active_scope()?;
        let mut state = self.state.lock().await;
        if state.scope != Some(scope) {
            let tasks = self.repository.load_all(&scope).await?;
            match state.scope {
                Some(previous) => tracing::info!(
                    from = %previous,
                    to = %scope,
                    count = tasks.len(),
                    "scope changed, history reset"
                ),
                None => tracing::debug!(scope = %scope, count = tasks.len(), "loaded task stack"),
            }
            state.enter_scope(scope, tasks);
        }
        Ok((state, scope))
    }

    async fn persist(
        &self,
        state: &mut StackState,
        scope: Scope,
        operation: StackOperation,
        checkpoint: Option<Checkpoint>,
        intents: &[PersistenceIntent],
    ) -> TaskStackResult<()> {
        match self.execute(&scope, &state.stack, intents).await {
            Ok(()) => {
                tracing::debug!(
                    scope = %scope,
                    operation = %operation,
                    count = state.stack.len(),
                    "persisted stack transition"
                );
                Ok(())
            }
            Err(err) => {
                let rolled_back = checkpoint.is_some();
                if let Some(checkpoint) = checkpoint {
                    state.restore(checkpoint);
                }
                tracing::warn!(
                    scope = %scope,
                    operation = %operation,
                    rolled_back,
                    error = %err,
                    "failed to persist stack transition"
                );
                Err(err.into())
            }
        }
    }

    async fn execute(
        &self,
        scope: &Scope,
        stack: &TaskStack,
        intents: &[PersistenceIntent],
    ) -> TaskRepositoryResult<()> {
        for intent in intents {
            match intent {
                PersistenceIntent::UpsertAll => {
                    self.repository.upsert_all(scope, &stack.snapshot()).await?;
                }
                PersistenceIntent::DeleteOne(id) => {
                    self.repository.delete_one(scope, *id).await?;
                }
                PersistenceIntent::DeleteMany(ids) => {
                    self.repository.delete_many(scope, ids).await?;
                }
                PersistenceIntent::DeleteAll => {
                    self.repository.delete_all_for_scope(scope).await?;
                }
            }
        }
        Ok(())
    }
}
