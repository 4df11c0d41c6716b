//! In-memory session holding the scope chosen by the identity provider.

use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Scope, UserId},
    ports::SessionContext,
};

/// Session whose scope is switched explicitly by the embedding application.
///
/// Clones share the same underlying session.
#[derive(Debug, Clone, Default)]
pub struct InMemorySession {
    scope: Arc<RwLock<Option<Scope>>>,
}

impl InMemorySession {
    /// Creates a signed-out session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session already in `scope`.
    #[must_use]
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope: Arc::new(RwLock::new(Some(scope))),
        }
    }

    /// Enters guest mode.
    pub fn continue_as_guest(&self) {
        self.set(Some(Scope::Guest));
    }

    /// Records a successful sign-in; it supersedes guest mode.
    pub fn sign_in(&self, user_id: UserId) {
        self.set(Some(Scope::User(user_id)));
    }

    /// Leaves both the user session and guest mode.
    pub fn sign_out(&self) {
        self.set(None);
    }

    fn set(&self, scope: Option<Scope>) {
        match self.scope.write() {
            Ok(mut current) => *current = scope,
            Err(poisoned) => *poisoned.into_inner() = scope,
        }
    }
}

impl SessionContext for InMemorySession {
    fn scope(&self) -> Option<Scope> {
        match self.scope.read() {
            Ok(current) => *current,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
