//! Adapter implementations of the task stack ports.
//!
//! - [`memory`]: in-memory repository, key-value store, and session
//! - [`local`]: device-local guest storage
//! - [`postgres`]: remote, user-scoped storage
//! - [`scoped`]: routing between the local and remote backends

pub mod local;
pub mod memory;
pub mod postgres;
pub mod scoped;

pub use scoped::ScopedTaskRepository;
