//! Port contracts for the task stack.
//!
//! Ports define infrastructure-agnostic interfaces used by the stack service.

pub mod key_value;
pub mod repository;
pub mod session;

pub use key_value::{KeyValueResult, KeyValueStore, KeyValueStoreError, is_portable_key};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use session::SessionContext;
