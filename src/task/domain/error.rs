//! Error types for task stack validation and state transitions.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The stack position cannot be represented or is negative.
    #[error("invalid stack position {0}, expected a non-negative 32-bit integer")]
    InvalidStackPosition(i64),
}

/// Expected empty or absent conditions raised by stack operations.
///
/// These are informational: the stack is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StackError {
    /// The stack has no tasks.
    #[error("stack is empty")]
    Empty,

    /// No task with the identifier is on the stack.
    #[error("task not found: {0}")]
    NotFound(TaskId),
}

/// Undo or redo was requested with nothing recorded.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum HistoryError {
    /// The undo stack is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The redo stack is empty.
    #[error("nothing to redo")]
    NothingToRedo,
}
