//! Identifier and validated scalar types for the task stack domain.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task, generated once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an authenticated user, issued by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Wraps a user identifier issued by the identity provider.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stack length observed when a task was pushed.
///
/// Positions are never renumbered after removals, so they only hint at push
/// order. The live list order is canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StackPosition(u32);

impl StackPosition {
    /// Largest position representable in the remote `INTEGER` column.
    const MAX_PERSISTED_VALUE: u32 = i32::MAX.unsigned_abs();

    /// Creates a position from a stack length.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStackPosition`] when the length does
    /// not fit the persisted column.
    pub fn from_len(len: usize) -> Result<Self, TaskDomainError> {
        u32::try_from(len)
            .ok()
            .filter(|value| *value <= Self::MAX_PERSISTED_VALUE)
            .map(Self)
            .ok_or_else(|| {
                TaskDomainError::InvalidStackPosition(i64::try_from(len).unwrap_or(i64::MAX))
            })
    }

    /// Creates a position from a persisted integer.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStackPosition`] for negative values.
    pub fn from_persisted(value: i64) -> Result<Self, TaskDomainError> {
        u32::try_from(value)
            .ok()
            .filter(|position| *position <= Self::MAX_PERSISTED_VALUE)
            .map(Self)
            .ok_or(TaskDomainError::InvalidStackPosition(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StackPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
