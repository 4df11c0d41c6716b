//! Stack-semantics task management.
//!
//! Tasks are pushed onto, popped from, and peeked at the top of an ordered
//! stack, with undo and redo over pushes and pops. Completion and bulk
//! deletion may remove tasks from any position. The list is persisted
//! write-through to device-local storage for guests and to the remote store
//! for signed-in users. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
