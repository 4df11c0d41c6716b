//! Shared world state for task stack BDD scenarios.

use std::sync::Arc;

use taskstack::task::{
    adapters::{
        ScopedTaskRepository,
        local::LocalTaskRepository,
        memory::{InMemoryKeyValueStore, InMemorySession, InMemoryTaskRepository},
    },
    domain::Task,
    services::{
        Completion, Outcome, StackNotice, StackOperation, TaskStackError, TaskStackResult,
        TaskStackService,
    },
};
use rstest::fixture;

/// Repository routing guests to a key-value blob and users to memory.
pub type TestRepository =
    ScopedTaskRepository<LocalTaskRepository<InMemoryKeyValueStore>, InMemoryTaskRepository>;

/// Service type used by the BDD world.
pub type TestStackService = TaskStackService<TestRepository, InMemorySession>;

/// Scenario world for task stack behaviour tests.
pub struct TaskStackWorld {
    pub service: TestStackService,
    pub session: InMemorySession,
    pub guest_tasks: LocalTaskRepository<InMemoryKeyValueStore>,
    pub last_notice: Option<StackNotice>,
    pub last_error: Option<TaskStackError>,
    pub last_completion: Option<Completion>,
}

impl TaskStackWorld {
    /// Creates a signed-out world over empty backends.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryKeyValueStore::new();
        let session = InMemorySession::new();
        let repository = ScopedTaskRepository::new(
            LocalTaskRepository::new(store.clone()),
            InMemoryTaskRepository::new(),
        );
        let service = TaskStackService::new(Arc::new(repository), Arc::new(session.clone()));

        Self {
            service,
            session,
            guest_tasks: LocalTaskRepository::new(store),
            last_notice: None,
            last_error: None,
            last_completion: None,
        }
    }

    /// Records the notice or error produced by `operation`.
    pub fn record<T>(
        &mut self,
        operation: StackOperation,
        result: TaskStackResult<Outcome<T>>,
    ) -> Option<T> {
        match result {
            Ok(outcome) => {
                self.last_notice = Some(outcome.notice);
                self.last_error = None;
                Some(outcome.value)
            }
            Err(err) => {
                self.last_notice = StackNotice::for_error(operation, &err);
                self.last_error = Some(err);
                None
            }
        }
    }

    /// Returns the titles on the stack, top first.
    ///
    /// # Errors
    ///
    /// Returns an error when the service cannot produce a view.
    pub fn titles(&self) -> Result<Vec<String>, eyre::Report> {
        let view = run_async(self.service.view())?;
        Ok(titles_of(&view.tasks))
    }
}

impl Default for TaskStackWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskStackWorld {
    TaskStackWorld::default()
}

/// Maps tasks to their titles, preserving order.
pub fn titles_of(tasks: &[Task]) -> Vec<String> {
    tasks
        .iter()
        .map(|task| task.title().as_str().to_owned())
        .collect()
}

/// Splits a comma-separated title list from a step.
pub fn parse_titles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
