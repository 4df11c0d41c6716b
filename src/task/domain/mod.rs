//! Domain model for the task stack.
//!
//! The domain owns the ordered task list, its stack transitions, and the
//! undo/redo history, while keeping storage and session concerns outside of
//! the domain boundary.

mod error;
mod history;
mod ids;
mod scope;
mod stack;
mod task;

pub use error::{HistoryError, StackError, TaskDomainError};
pub use history::{HistoryEffect, HistoryEntry, OperationHistory};
pub use ids::{StackPosition, TaskId, UserId};
pub use scope::Scope;
pub use stack::{PersistenceIntent, TaskStack, Transition};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskTitle};
