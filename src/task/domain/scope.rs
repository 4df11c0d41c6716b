//! Persistence scope of a task list.

use super::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Boundary under which a task list is stored.
///
/// Guests persist to device-local storage, authenticated users to the remote
/// record store keyed by their user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Scope {
    /// Unauthenticated guest session backed by local storage.
    Guest,
    /// Authenticated user backed by the remote store.
    User(UserId),
}

impl Scope {
    /// Returns the user identifier for authenticated scopes.
    #[must_use]
    pub const fn user_id(self) -> Option<UserId> {
        match self {
            Self::Guest => None,
            Self::User(user_id) => Some(user_id),
        }
    }

    /// Returns whether this is the guest scope.
    #[must_use]
    pub const fn is_guest(self) -> bool {
        matches!(self, Self::Guest)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guest => f.write_str("guest"),
            Self::User(user_id) => write!(f, "user:{user_id}"),
        }
    }
}
