//! `PostgreSQL` repository implementation for user-scoped task storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{PersistedTaskData, Scope, Task, TaskId, UserId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::query_builder::QueryFragment;
use diesel::query_dsl::methods::ExecuteDsl;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::upsert::excluded;

/// `PostgreSQL` connection pool type used by the task adapter.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when the pool cannot
/// establish its initial connections.
pub fn build_pool(database_url: &str, max_connections: u32) -> TaskRepositoryResult<TaskPgPool> {
    Pool::builder()
        .max_size(max_connections)
        .build(ConnectionManager::<PgConnection>::new(database_url))
        .map_err(TaskRepositoryError::persistence)
}

/// `PostgreSQL`-backed task repository serving authenticated scopes.
///
/// Records are keyed on task id and filtered by owning user. The load order
/// is descending stack position, which approximates push order.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

fn require_user(scope: &Scope) -> TaskRepositoryResult<UserId> {
    scope
        .user_id()
        .ok_or(TaskRepositoryError::UnsupportedScope(*scope))
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn load_all(&self, scope: &Scope) -> TaskRepositoryResult<Vec<Task>> {
        let user_id = require_user(scope)?;
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::user_id.eq(user_id.into_inner()))
                .order(tasks::stack_position.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter()
                .map(|row| row_to_task(user_id, row))
                .collect()
        })
        .await
    }

    async fn upsert_all(&self, scope: &Scope, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let user_id = require_user(scope)?;
        if tasks.is_empty() {
            return Ok(());
        }
        let rows = tasks
            .iter()
            .map(|task| to_new_row(user_id, task))
            .collect::<TaskRepositoryResult<Vec<_>>>()?;

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, DieselError, _>(|transaction| {
                    upsert_statement(&rows).execute(transaction)
                })
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_one(&self, scope: &Scope, id: TaskId) -> TaskRepositoryResult<()> {
        let user_id = require_user(scope)?;
        self.run_blocking(move |connection| {
            diesel::delete(
                tasks::table
                    .filter(tasks::user_id.eq(user_id.into_inner()))
                    .filter(tasks::id.eq(id.into_inner())),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_many(&self, scope: &Scope, ids: &[TaskId]) -> TaskRepositoryResult<()> {
        let user_id = require_user(scope)?;
        if ids.is_empty() {
            return Ok(());
        }
        let uuids: Vec<uuid::Uuid> = ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            diesel::delete(
                tasks::table
                    .filter(tasks::user_id.eq(user_id.into_inner()))
                    .filter(tasks::id.eq_any(uuids)),
            )
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn delete_all_for_scope(&self, scope: &Scope) -> TaskRepositoryResult<()> {
        let user_id = require_user(scope)?;
        self.run_blocking(move |connection| {
            diesel::delete(tasks::table.filter(tasks::user_id.eq(user_id.into_inner())))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            Ok(())
        })
        .await
    }
}

/// Inserts `rows`, updating existing records only when they belong to the
/// same user.
fn upsert_statement(
    rows: &[NewTaskRow],
) -> impl RunQueryDsl<PgConnection> + ExecuteDsl<PgConnection> + QueryFragment<Pg> + '_ {
    use diesel::query_dsl::methods::FilterDsl;

    diesel::insert_into(tasks::table)
        .values(rows)
        .on_conflict(tasks::id)
        .do_update()
        .set((
            tasks::title.eq(excluded(tasks::title)),
            tasks::description.eq(excluded(tasks::description)),
            tasks::due_date.eq(excluded(tasks::due_date)),
            tasks::due_time.eq(excluded(tasks::due_time)),
            tasks::completed.eq(excluded(tasks::completed)),
            tasks::stack_position.eq(excluded(tasks::stack_position)),
        ))
        .filter(tasks::user_id.eq(excluded(tasks::user_id)))
}

fn to_new_row(user_id: UserId, task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let stack_position = i32::try_from(task.stack_position().value())
        .map_err(|err| TaskRepositoryError::invalid_record(task.id().to_string(), err))?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        user_id: user_id.into_inner(),
        title: task.title().as_str().to_owned(),
        description: Some(task.description().to_owned()),
        due_date: task.due_date().map(str::to_owned),
        due_time: task.due_time().map(str::to_owned),
        completed: task.is_completed(),
        stack_position,
    })
}

fn row_to_task(owner: UserId, row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        user_id,
        title,
        description,
        due_date,
        due_time,
        completed,
        stack_position,
    } = row;
    if user_id != owner.into_inner() {
        return Err(TaskRepositoryError::invalid_record(
            id.to_string(),
            format!("owned by {user_id}, expected {owner}"),
        ));
    }

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description: description.unwrap_or_default(),
        due_date,
        due_time,
        completed,
        stack_position: i64::from(stack_position),
    };
    Task::from_persisted(data).map_err(|err| TaskRepositoryError::invalid_record(id.to_string(), err))
}
