//! Task record and the user-supplied draft it is created from.

use super::{StackPosition, TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty, trimmed task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskTitle> for String {
    fn from(title: TaskTitle) -> Self {
        title.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User input for a push operation.
///
/// The title is validated when the draft is pushed, so an invalid draft
/// never changes the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: String,
    due_date: Option<String>,
    due_time: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date: None,
            due_time: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the raw due date text.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = non_blank(due_date.into());
        self
    }

    /// Sets the raw due time text.
    #[must_use]
    pub fn with_due_time(mut self, due_time: impl Into<String>) -> Self {
        self.due_time = non_blank(due_time.into());
        self
    }

    /// Returns the unvalidated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// A task on the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: String,
    due_date: Option<String>,
    due_time: Option<String>,
    completed: bool,
    stack_position: StackPosition,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title, validated on reconstruction.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted raw due date, if any.
    pub due_date: Option<String>,
    /// Persisted raw due time, if any.
    pub due_time: Option<String>,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted creation-time stack position.
    pub stack_position: i64,
}

impl Task {
    /// Creates a new task from a draft, recording the current stack length.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the draft title is blank,
    /// or [`TaskDomainError::InvalidStackPosition`] when the stack is too
    /// large to persist.
    pub fn from_draft(draft: TaskDraft, stack_len: usize) -> Result<Self, TaskDomainError> {
        let TaskDraft {
            title,
            description,
            due_date,
            due_time,
        } = draft;

        Ok(Self {
            id: TaskId::new(),
            title: TaskTitle::new(title)?,
            description,
            due_date,
            due_time,
            completed: false,
            stack_position: StackPosition::from_len(stack_len)?,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the stored title is blank or the
    /// stored position is negative.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        Ok(Self {
            id: data.id,
            title: TaskTitle::new(data.title)?,
            description: data.description,
            due_date: data.due_date.and_then(non_blank),
            due_time: data.due_time.and_then(non_blank),
            completed: data.completed,
            stack_position: StackPosition::from_persisted(data.stack_position)?,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, empty when none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the raw due date text, if any.
    #[must_use]
    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    /// Returns the raw due time text, if any.
    #[must_use]
    pub fn due_time(&self) -> Option<&str> {
        self.due_time.as_deref()
    }

    /// Returns whether the task is flagged as completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation-time stack position.
    #[must_use]
    pub const fn stack_position(&self) -> StackPosition {
        self.stack_position
    }

    /// Returns whether the title or description contains `needle`.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.as_str().to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
