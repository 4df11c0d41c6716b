//! `PostgreSQL` adapter for the remote, user-scoped task store.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskRepository, TaskPgPool, build_pool};
