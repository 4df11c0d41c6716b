//! Taskstack: a to-do list modelled as a stack.
//!
//! Tasks are pushed, popped, peeked, and iterated, with undo and redo over
//! pushes and pops. Guests keep their list in device-local storage; signed-in
//! users keep theirs in a remote store scoped by user id.
//!
//! # Architecture
//!
//! Taskstack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure stack and history logic with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for storage and session lookup
//! - **Adapters**: Concrete implementations of ports (local files,
//!   `PostgreSQL`, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task stack engine, history, persistence, and orchestration
//! - [`config`]: Backend configuration and wiring

pub mod config;
pub mod task;
