use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::{CreateNote, MarkerNote};
use super::errors::RepositoryError;
use super::storage::{encode_timestamp, now_timestamp, timestamp_column, uuid_column, Backend, DataStore};

const NOTE_COLUMNS: &str = "id, marker_id, content, created_at, updated_at";

/// Repository trait for marker notes
#[async_trait]
pub trait NoteRepositoryTrait: Send + Sync {
    async fn create(&self, request: CreateNote) -> Result<MarkerNote, RepositoryError>;

    /// Replace the note content, returning `None` when the note does not exist
    async fn update(&self, id: Uuid, content: String) -> Result<Option<MarkerNote>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MarkerNote>, RepositoryError>;

    /// Notes of one marker, newest first
    async fn list_for_marker(&self, marker_id: Uuid) -> Result<Vec<MarkerNote>, RepositoryError>;
}

/// Repository for marker notes
#[derive(Debug, Clone)]
pub struct NoteRepository {
    store: DataStore,
}

impl NoteRepository {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<MarkerNote> {
    Ok(MarkerNote {
        id: uuid_column(row, 0)?,
        marker_id: uuid_column(row, 1)?,
        content: row.get(2)?,
        created_at: timestamp_column(row, 3)?,
        updated_at: timestamp_column(row, 4)?,
    })
}

fn select_note(conn: &rusqlite::Connection, id: &Uuid) -> Result<Option<MarkerNote>, RepositoryError> {
    let note = conn
        .query_row(
            &format!("SELECT {} FROM marker_notes WHERE id = ?1", NOTE_COLUMNS),
            [id.to_string()],
            note_from_row,
        )
        .optional()?;

    Ok(note)
}

#[async_trait]
impl NoteRepositoryTrait for NoteRepository {
    async fn create(&self, request: CreateNote) -> Result<MarkerNote, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.create_note(request),
        };

        let now = now_timestamp();
        let note = MarkerNote {
            id: Uuid::new_v4(),
            marker_id: request.marker_id,
            content: request.content,
            created_at: now,
            updated_at: now,
        };

        debug!("Storing note in database: id={}", note.id);
        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO marker_notes (id, marker_id, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                note.id.to_string(),
                note.marker_id.to_string(),
                &note.content,
                encode_timestamp(&note.created_at),
                encode_timestamp(&note.updated_at),
            ),
        )?;

        Ok(note)
    }

    async fn update(&self, id: Uuid, content: String) -> Result<Option<MarkerNote>, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.update_note(&id, content),
        };

        debug!("Updating note in database: id={}", id);
        let conn = pool.get()?;

        let changed = conn.execute(
            "UPDATE marker_notes SET content = ?1, updated_at = ?2 WHERE id = ?3",
            (&content, encode_timestamp(&now_timestamp()), id.to_string()),
        )?;

        if changed == 0 {
            return Ok(None);
        }

        select_note(&conn, &id)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Deleting note from database: id={}", id);
                let conn = pool.get()?;
                let removed = conn.execute("DELETE FROM marker_notes WHERE id = ?1", [id.to_string()])?;
                Ok(removed > 0)
            },
            Backend::Memory(storage) => storage.delete_note(&id),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<MarkerNote>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                let conn = pool.get()?;
                select_note(&conn, &id)
            },
            Backend::Memory(storage) => storage.get_note(&id),
        }
    }

    async fn list_for_marker(&self, marker_id: Uuid) -> Result<Vec<MarkerNote>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Listing notes for marker {}", marker_id);
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM marker_notes WHERE marker_id = ?1
                     ORDER BY created_at DESC, id DESC",
                    NOTE_COLUMNS
                ))?;

                let notes = stmt
                    .query_map([marker_id.to_string()], note_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(notes)
            },
            Backend::Memory(storage) => storage.list_notes(&marker_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabasePool;
    use crate::models::catalog::marker_id_for_name;

    #[tokio::test]
    async fn test_note_lifecycle_in_both_backends() {
        let stores = [
            DataStore::database(DatabasePool::in_memory().unwrap()),
            DataStore::in_memory(),
        ];

        for store in stores {
            let repo = NoteRepository::new(store);
            let marker_id = marker_id_for_name("TSH");

            let first = repo.create(CreateNote {
                marker_id,
                content: "Retest in spring".to_string(),
            }).await.unwrap();
            let second = repo.create(CreateNote {
                marker_id,
                content: "Ask about selenium".to_string(),
            }).await.unwrap();

            let notes = repo.list_for_marker(marker_id).await.unwrap();
            assert_eq!(notes.len(), 2);
            assert!(notes[0].created_at >= notes[1].created_at);

            let updated = repo.update(first.id, "Retest in May".to_string()).await.unwrap().unwrap();
            assert_eq!(updated.content, "Retest in May");
            assert_eq!(updated.created_at, first.created_at);

            assert!(repo.delete(second.id).await.unwrap());
            assert!(repo.get_by_id(second.id).await.unwrap().is_none());
            assert!(repo.update(second.id, "gone".to_string()).await.unwrap().is_none());
            assert_eq!(repo.list_for_marker(marker_id).await.unwrap().len(), 1);
        }
    }
}
