//! Shared test helpers for in-memory integration tests.

use std::sync::Arc;

use rstest::fixture;
use taskstack::task::{
    adapters::{
        ScopedTaskRepository,
        local::LocalTaskRepository,
        memory::{InMemoryKeyValueStore, InMemorySession, InMemoryTaskRepository},
    },
    domain::{Scope, Task},
    services::TaskStackService,
};

/// Guest backend over an in-memory key-value store.
pub type GuestRepository = LocalTaskRepository<InMemoryKeyValueStore>;

/// Router used by the service under test.
pub type TestRepository = ScopedTaskRepository<GuestRepository, InMemoryTaskRepository>;

/// Service type used by the integration tests.
pub type TestService = TaskStackService<TestRepository, InMemorySession>;

/// Service wired to inspectable backends.
pub struct StackHarness {
    pub service: TestService,
    pub session: InMemorySession,
    pub guest: GuestRepository,
    pub remote: InMemoryTaskRepository,
}

/// Provides a service with a guest session and empty backends.
#[fixture]
pub fn harness() -> StackHarness {
    let store = InMemoryKeyValueStore::new();
    let remote = InMemoryTaskRepository::new();
    let session = InMemorySession::with_scope(Scope::Guest);
    let repository = ScopedTaskRepository::new(LocalTaskRepository::new(store.clone()), remote.clone());
    StackHarness {
        service: TaskStackService::new(Arc::new(repository), Arc::new(session.clone())),
        session,
        guest: LocalTaskRepository::new(store),
        remote,
    }
}

/// Maps tasks to their titles, preserving order.
#[must_use]
pub fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title().as_str()).collect()
}
