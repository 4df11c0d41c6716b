//! In-memory adapters for tests and ephemeral sessions.

mod key_value;
mod session;
mod task;

pub use key_value::InMemoryKeyValueStore;
pub use session::InMemorySession;
pub use task::InMemoryTaskRepository;
