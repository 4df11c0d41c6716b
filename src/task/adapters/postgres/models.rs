//! Diesel row models for remote task persistence.

use super::schema::tasks;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Raw due date text.
    pub due_date: Option<String>,
    /// Raw due time text.
    pub due_time: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation-time stack position.
    pub stack_position: i32,
}

/// Insert model for task records.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub user_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Task description.
    pub description: Option<String>,
    /// Raw due date text; `NULL` when unset.
    pub due_date: Option<String>,
    /// Raw due time text; `NULL` when unset.
    pub due_time: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation-time stack position.
    pub stack_position: i32,
}
