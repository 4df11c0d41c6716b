//! Device-local adapters backing the guest scope.

mod file_store;
mod repository;

pub use file_store::FileKeyValueStore;
pub use repository::{DEFAULT_GUEST_KEY, LocalTaskRepository};
