use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::{CreateTodo, MeasurementTodo, UpdateTodo};
use super::errors::RepositoryError;
use super::storage::{encode_timestamp, now_timestamp, timestamp_column, uuid_column, Backend, DataStore};

const TODO_COLUMNS: &str = "id, measurement_id, title, completed, created_at, updated_at";

/// Repository trait for measurement todos
#[async_trait]
pub trait TodoRepositoryTrait: Send + Sync {
    async fn create(&self, request: CreateTodo) -> Result<MeasurementTodo, RepositoryError>;

    /// Apply a partial update, returning `None` when the todo does not exist
    async fn update(&self, id: Uuid, changes: UpdateTodo) -> Result<Option<MeasurementTodo>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MeasurementTodo>, RepositoryError>;

    /// Todos of one measurement, oldest first
    async fn list_for_measurement(&self, measurement_id: Uuid) -> Result<Vec<MeasurementTodo>, RepositoryError>;

    /// Every todo, oldest first
    async fn get_all(&self) -> Result<Vec<MeasurementTodo>, RepositoryError>;
}

/// Repository for measurement todos
#[derive(Debug, Clone)]
pub struct TodoRepository {
    store: DataStore,
}

impl TodoRepository {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }

    fn list(&self, measurement_id: Option<Uuid>) -> Result<Vec<MeasurementTodo>, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.list_todos(measurement_id.as_ref()),
        };

        let conn = pool.get()?;

        let todos = match measurement_id {
            Some(id) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM measurement_todos WHERE measurement_id = ?1
                     ORDER BY created_at ASC, id ASC",
                    TODO_COLUMNS
                ))?;
                let rows = stmt.query_map([id.to_string()], todo_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            },
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM measurement_todos ORDER BY created_at ASC, id ASC",
                    TODO_COLUMNS
                ))?;
                let rows = stmt.query_map([], todo_from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            },
        };

        Ok(todos)
    }
}

fn todo_from_row(row: &Row<'_>) -> rusqlite::Result<MeasurementTodo> {
    Ok(MeasurementTodo {
        id: uuid_column(row, 0)?,
        measurement_id: uuid_column(row, 1)?,
        title: row.get(2)?,
        completed: row.get(3)?,
        created_at: timestamp_column(row, 4)?,
        updated_at: timestamp_column(row, 5)?,
    })
}

fn select_todo(conn: &rusqlite::Connection, id: &Uuid) -> Result<Option<MeasurementTodo>, RepositoryError> {
    let todo = conn
        .query_row(
            &format!("SELECT {} FROM measurement_todos WHERE id = ?1", TODO_COLUMNS),
            [id.to_string()],
            todo_from_row,
        )
        .optional()?;

    Ok(todo)
}

#[async_trait]
impl TodoRepositoryTrait for TodoRepository {
    async fn create(&self, request: CreateTodo) -> Result<MeasurementTodo, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.create_todo(request),
        };

        let now = now_timestamp();
        let todo = MeasurementTodo {
            id: Uuid::new_v4(),
            measurement_id: request.measurement_id,
            title: request.title,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        debug!("Storing todo in database: id={}", todo.id);
        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO measurement_todos (id, measurement_id, title, completed, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                todo.id.to_string(),
                todo.measurement_id.to_string(),
                &todo.title,
                todo.completed,
                encode_timestamp(&todo.created_at),
                encode_timestamp(&todo.updated_at),
            ),
        )?;

        Ok(todo)
    }

    async fn update(&self, id: Uuid, changes: UpdateTodo) -> Result<Option<MeasurementTodo>, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.update_todo(&id, changes),
        };

        debug!("Updating todo in database: id={}", id);
        let conn = pool.get()?;

        let Some(mut todo) = select_todo(&conn, &id)? else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        todo.updated_at = now_timestamp();

        conn.execute(
            "UPDATE measurement_todos SET title = ?1, completed = ?2, updated_at = ?3 WHERE id = ?4",
            (&todo.title, todo.completed, encode_timestamp(&todo.updated_at), id.to_string()),
        )?;

        Ok(Some(todo))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Deleting todo from database: id={}", id);
                let conn = pool.get()?;
                let removed = conn.execute("DELETE FROM measurement_todos WHERE id = ?1", [id.to_string()])?;
                Ok(removed > 0)
            },
            Backend::Memory(storage) => storage.delete_todo(&id),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MeasurementTodo>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                let conn = pool.get()?;
                select_todo(&conn, &id)
            },
            Backend::Memory(storage) => storage.get_todo(&id),
        }
    }

    async fn list_for_measurement(&self, measurement_id: Uuid) -> Result<Vec<MeasurementTodo>, RepositoryError> {
        self.list(Some(measurement_id))
    }

    async fn get_all(&self) -> Result<Vec<MeasurementTodo>, RepositoryError> {
        self.list(None)
    }
}
