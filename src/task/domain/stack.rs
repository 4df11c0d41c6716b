//! Ordered task stack and its state transitions.
//!
//! Index 0 is always the top of the stack. Every mutating operation returns a
//! [`Transition`] carrying the repository writes that make the new state
//! durable; the stack itself performs no I/O.

use super::{StackError, Task, TaskDomainError, TaskDraft, TaskId};
use std::collections::{HashSet, VecDeque};

/// Repository write required to persist a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceIntent {
    /// Persist the full post-transition snapshot.
    UpsertAll,
    /// Delete a single task record.
    DeleteOne(TaskId),
    /// Delete the given task records.
    DeleteMany(Vec<TaskId>),
    /// Delete every record in the active scope.
    DeleteAll,
}

/// Result of a mutating stack operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Transition<T> {
    value: T,
    intents: Vec<PersistenceIntent>,
}

impl<T> Transition<T> {
    const fn new(value: T, intents: Vec<PersistenceIntent>) -> Self {
        Self { value, intents }
    }

    /// Returns the operation result.
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns the repository writes, in execution order.
    pub fn intents(&self) -> &[PersistenceIntent] {
        &self.intents
    }

    /// Splits the transition into its value and writes.
    pub fn into_parts(self) -> (T, Vec<PersistenceIntent>) {
        (self.value, self.intents)
    }
}

impl Transition<()> {
    pub(crate) const fn from_intents(intents: Vec<PersistenceIntent>) -> Self {
        Self {
            value: (),
            intents,
        }
    }
}

/// In-memory ordered task collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStack {
    tasks: VecDeque<Task>,
}

impl TaskStack {
    /// Creates an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a stack from tasks ordered top first.
    ///
    /// Later duplicates of an identifier are dropped so ids stay unique.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut seen = HashSet::new();
        Self {
            tasks: tasks
                .into_iter()
                .filter(|task| seen.insert(task.id()))
                .collect(),
        }
    }

    /// Returns the number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns whether the stack has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns whether a task with the identifier is on the stack.
    #[must_use]
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|task| task.id() == id)
    }

    /// Pushes a new task built from `draft` onto the top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank. The
    /// stack is unchanged on error.
    pub fn push(&mut self, draft: TaskDraft) -> Result<Transition<Task>, TaskDomainError> {
        let task = Task::from_draft(draft, self.tasks.len())?;
        self.tasks.push_front(task.clone());
        Ok(Transition::new(task, vec![PersistenceIntent::UpsertAll]))
    }

    /// Removes and returns the top task.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] when there is nothing to pop.
    pub fn pop(&mut self) -> Result<Transition<Task>, StackError> {
        let task = self.tasks.pop_front().ok_or(StackError::Empty)?;
        let intents = vec![
            PersistenceIntent::DeleteOne(task.id()),
            PersistenceIntent::UpsertAll,
        ];
        Ok(Transition::new(task, intents))
    }

    /// Returns the top task without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] when the stack has no tasks.
    pub fn peek(&self) -> Result<&Task, StackError> {
        self.tasks.front().ok_or(StackError::Empty)
    }

    /// Iterates the stack from top to bottom.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Task> + DoubleEndedIterator + '_ {
        self.tasks.iter()
    }

    /// Returns a copy of the current order, top first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.iter().cloned().collect()
    }

    /// Returns tasks whose title or description contains `query`,
    /// ignoring case. An empty query matches every task.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Task> {
        let needle = query.to_lowercase();
        self.tasks
            .iter()
            .filter(|task| task.matches_lowercase(&needle))
            .cloned()
            .collect()
    }

    /// Removes the task with `id` from any position.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::NotFound`] when no task has the identifier.
    pub fn complete(&mut self, id: TaskId) -> Result<Transition<Task>, StackError> {
        let task = self.take(id).ok_or(StackError::NotFound(id))?;
        let intents = vec![PersistenceIntent::DeleteOne(id), PersistenceIntent::UpsertAll];
        Ok(Transition::new(task, intents))
    }

    /// Removes every task whose identifier is in `ids`, returning the removed
    /// tasks in stack order. Unknown identifiers are ignored.
    pub fn delete_many(&mut self, ids: &HashSet<TaskId>) -> Transition<Vec<Task>> {
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| ids.contains(&task.id()));
        self.tasks = VecDeque::from(kept);

        let removed_ids = removed.iter().map(Task::id).collect();
        let intents = vec![
            PersistenceIntent::DeleteMany(removed_ids),
            PersistenceIntent::UpsertAll,
        ];
        Transition::new(removed, intents)
    }

    /// Empties the stack, returning the number of removed tasks.
    pub fn clear(&mut self) -> Transition<usize> {
        let removed = self.tasks.len();
        self.tasks.clear();
        Transition::new(
            removed,
            vec![PersistenceIntent::DeleteAll, PersistenceIntent::UpsertAll],
        )
    }

    /// Places `task` on top of the stack.
    ///
    /// A task already on the stack with the same identifier is moved rather
    /// than duplicated.
    pub fn insert_top(&mut self, task: Task) -> Transition<()> {
        self.take(task.id());
        self.tasks.push_front(task);
        Transition::new((), vec![PersistenceIntent::UpsertAll])
    }

    /// Removes the task with `id` if present, returning it.
    ///
    /// Removing an absent task still yields the delete intent so the store
    /// converges with the in-memory list.
    pub fn remove(&mut self, id: TaskId) -> Transition<Option<Task>> {
        let task = self.take(id);
        Transition::new(
            task,
            vec![PersistenceIntent::DeleteOne(id), PersistenceIntent::UpsertAll],
        )
    }

    fn take(&mut self, id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id() == id)?;
        self.tasks.remove(index)
    }
}

impl<'a> IntoIterator for &'a TaskStack {
    type Item = &'a Task;
    type IntoIter = std::collections::vec_deque::Iter<'a, Task>;

    fn into_iter(self) -> Self::IntoIter {
        self.tasks.iter()
    }
}
