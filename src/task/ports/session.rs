//! Port through which the identity provider exposes the active scope.

use crate::task::domain::Scope;

/// Source of the active persistence scope.
///
/// Authentication itself stays with the identity provider; the stack service
/// only needs to know which scope is active.
pub trait SessionContext: Send + Sync {
    /// Returns the active scope, or `None` when nobody is signed in and
    /// guest mode is off.
    fn scope(&self) -> Option<Scope>;
}
