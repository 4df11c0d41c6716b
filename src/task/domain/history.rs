//! Undo and redo history for push and pop operations.

use super::{HistoryError, Task, TaskStack, Transition};

/// A recorded reversible stack operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    /// The task was pushed.
    Push(Task),
    /// The task was popped.
    Pop(Task),
}

impl HistoryEntry {
    /// Returns the task the entry refers to.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::Push(task) | Self::Pop(task) => task,
        }
    }

    fn inverse(self) -> HistoryEffect {
        match self {
            Self::Push(task) => HistoryEffect::Remove(task),
            Self::Pop(task) => HistoryEffect::InsertTop(task),
        }
    }

    fn forward(self) -> HistoryEffect {
        match self {
            Self::Push(task) => HistoryEffect::InsertTop(task),
            Self::Pop(task) => HistoryEffect::Remove(task),
        }
    }
}

/// Stack change produced by an undo or redo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEffect {
    /// Place the task back on top of the stack.
    InsertTop(Task),
    /// Remove the task from the stack, wherever it is.
    Remove(Task),
}

impl HistoryEffect {
    /// Returns the task the effect applies to.
    #[must_use]
    pub const fn task(&self) -> &Task {
        match self {
            Self::InsertTop(task) | Self::Remove(task) => task,
        }
    }

    /// Applies the effect to `stack` without touching any history.
    pub fn apply(&self, stack: &mut TaskStack) -> Transition<()> {
        match self {
            Self::InsertTop(task) => stack.insert_top(task.clone()),
            Self::Remove(task) => {
                let (_, intents) = stack.remove(task.id()).into_parts();
                Transition::from_intents(intents)
            }
        }
    }
}

/// Branching undo/redo history, kept in memory only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationHistory {
    undo: Vec<HistoryEntry>,
    redo: Vec<HistoryEntry>,
}

impl OperationHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a push and discards the redo branch.
    pub fn record_push(&mut self, task: Task) {
        self.record(HistoryEntry::Push(task));
    }

    /// Records a pop and discards the redo branch.
    pub fn record_pop(&mut self, task: Task) {
        self.record(HistoryEntry::Pop(task));
    }

    /// Moves the latest entry to the redo stack and returns its inverse.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToUndo`] when no entry is recorded.
    pub fn undo(&mut self) -> Result<HistoryEffect, HistoryError> {
        let entry = self.undo.pop().ok_or(HistoryError::NothingToUndo)?;
        self.redo.push(entry.clone());
        Ok(entry.inverse())
    }

    /// Moves the latest undone entry back to the undo stack and returns its
    /// forward effect.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NothingToRedo`] when nothing was undone.
    pub fn redo(&mut self) -> Result<HistoryEffect, HistoryError> {
        let entry = self.redo.pop().ok_or(HistoryError::NothingToRedo)?;
        self.undo.push(entry.clone());
        Ok(entry.forward())
    }

    /// Drops both stacks.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Returns whether an undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns whether a redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Returns recorded entries, oldest first.
    #[must_use]
    pub fn undo_entries(&self) -> &[HistoryEntry] {
        &self.undo
    }

    /// Returns undone entries, oldest first.
    #[must_use]
    pub fn redo_entries(&self) -> &[HistoryEntry] {
        &self.redo
    }

    fn record(&mut self, entry: HistoryEntry) {
        self.undo.push(entry);
        self.redo.clear();
    }
}
