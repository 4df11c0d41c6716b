//! User-facing notices describing the result of stack operations.

use std::fmt;

use super::TaskStackError;
use crate::task::domain::{StackError, TaskDomainError};

/// Stack operation requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackOperation {
    /// Push a new task.
    Push,
    /// Pop the top task.
    Pop,
    /// Show the top task.
    Peek,
    /// List every task.
    Iterate,
    /// Complete a task anywhere on the stack.
    Complete,
    /// Delete selected tasks.
    Delete,
    /// Remove every task.
    Clear,
    /// Undo the latest push or pop.
    Undo,
    /// Redo the latest undone push or pop.
    Redo,
}

impl StackOperation {
    /// Returns the lowercase operation name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Push => "push",
            Self::Pop => "pop",
            Self::Peek => "peek",
            Self::Iterate => "iterate",
            Self::Complete => "complete",
            Self::Delete => "delete",
            Self::Clear => "clear",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

impl fmt::Display for StackOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackNotice {
    /// A task was pushed.
    Pushed {
        /// Title of the pushed task.
        title: String,
    },
    /// The top task was popped.
    Popped {
        /// Title of the popped task.
        title: String,
    },
    /// The top task is being shown.
    Peeked {
        /// Title of the top task.
        title: String,
    },
    /// The full stack is being shown.
    Iterated {
        /// Number of tasks on the stack.
        count: usize,
    },
    /// A task was completed.
    Completed {
        /// Title of the completed task.
        title: String,
    },
    /// The last remaining task was completed.
    AllComplete,
    /// Selected tasks were deleted.
    Deleted {
        /// Number of tasks removed.
        count: usize,
    },
    /// Every task was removed.
    Cleared,
    /// The latest operation was undone.
    Undone,
    /// The latest undone operation was redone.
    Redone,
    /// Pop was requested on an empty stack.
    NothingToRemove,
    /// Peek was requested on an empty stack.
    StackEmpty,
    /// The task is no longer on the stack.
    TaskMissing,
    /// The pushed title was blank.
    TitleRequired,
}

impl StackNotice {
    /// Returns the notice for a recoverable error raised by `operation`.
    ///
    /// Infrastructure failures and history no-ops have no notice: the former
    /// are reported by the caller, the latter correspond to disabled
    /// controls.
    #[must_use]
    pub const fn for_error(operation: StackOperation, error: &TaskStackError) -> Option<Self> {
        match error {
            TaskStackError::Stack(StackError::Empty) => match operation {
                StackOperation::Pop => Some(Self::NothingToRemove),
                _ => Some(Self::StackEmpty),
            },
            TaskStackError::Stack(StackError::NotFound(_)) => Some(Self::TaskMissing),
            TaskStackError::Domain(TaskDomainError::EmptyTitle) => Some(Self::TitleRequired),
            _ => None,
        }
    }

    /// Returns whether the notice celebrates an emptied stack.
    #[must_use]
    pub const fn is_victory(&self) -> bool {
        matches!(self, Self::AllComplete)
    }
}

impl fmt::Display for StackNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pushed { title } => write!(f, "Task \"{title}\" added to stack."),
            Self::Popped { title } => write!(f, "Task \"{title}\" removed from stack."),
            Self::Peeked { title } => write!(f, "Current task: \"{title}\""),
            Self::Iterated { count } => {
                write!(f, "Viewing all {count} tasks in stack (top to bottom).")
            }
            Self::Completed { title } => write!(f, "Task \"{title}\" completed."),
            Self::AllComplete => f.write_str("You completed your tasks today!"),
            Self::Deleted { count } => write!(f, "{count} task(s) deleted."),
            Self::Cleared => f.write_str("All tasks cleared from stack."),
            Self::Undone => f.write_str("Operation undone."),
            Self::Redone => f.write_str("Operation redone."),
            Self::NothingToRemove => f.write_str("Stack is empty. No task to remove."),
            Self::StackEmpty => f.write_str("Stack is empty."),
            Self::TaskMissing => f.write_str("Task is no longer on the stack."),
            Self::TitleRequired => f.write_str("Task title must not be empty."),
        }
    }
}

/// Operation result paired with the notice to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Operation result.
    pub value: T,
    /// Notice describing the result.
    pub notice: StackNotice,
}

impl<T> Outcome<T> {
    pub(crate) const fn new(value: T, notice: StackNotice) -> Self {
        Self { value, notice }
    }
}
