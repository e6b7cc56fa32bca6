use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use crate::models::BloodMarker;
use super::errors::RepositoryError;
use super::storage::{uuid_column, Backend, DataStore};

const MARKER_COLUMNS: &str = "id, name, category, unit, description, min_value, max_value";

/// Repository trait for the biomarker catalog
#[async_trait]
pub trait MarkerRepositoryTrait: Send + Sync {
    /// Get all markers ordered by name
    async fn get_all(&self) -> Result<Vec<BloodMarker>, RepositoryError>;

    /// Get a marker by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<BloodMarker>, RepositoryError>;
}

/// Read-only repository over the seeded marker catalog
#[derive(Debug, Clone)]
pub struct MarkerRepository {
    store: DataStore,
}

impl MarkerRepository {
    /// Create a new repository on top of a shared store
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

fn marker_from_row(row: &Row<'_>) -> rusqlite::Result<BloodMarker> {
    Ok(BloodMarker {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        category: row.get(2)?,
        unit: row.get(3)?,
        description: row.get(4)?,
        min_value: row.get(5)?,
        max_value: row.get(6)?,
    })
}

#[async_trait]
impl MarkerRepositoryTrait for MarkerRepository {
    async fn get_all(&self) -> Result<Vec<BloodMarker>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Getting all markers from database");
                let conn = pool.get()?;

                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM blood_markers ORDER BY name ASC", MARKER_COLUMNS
                ))?;

                let markers = stmt
                    .query_map([], marker_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(markers)
            },
            Backend::Memory(storage) => storage.list_markers(),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<BloodMarker>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Getting marker by ID from database: {}", id);
                let conn = pool.get()?;

                let marker = conn
                    .query_row(
                        &format!("SELECT {} FROM blood_markers WHERE id = ?1", MARKER_COLUMNS),
                        [id.to_string()],
                        marker_from_row,
                    )
                    .optional()?;

                Ok(marker)
            },
            Backend::Memory(storage) => storage.get_marker(&id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabasePool;
    use crate::models::catalog::{marker_id_for_name, MARKER_CATALOG};

    #[tokio::test]
    async fn test_database_and_memory_catalogs_agree() {
        let db_repo = MarkerRepository::new(DataStore::database(DatabasePool::in_memory().unwrap()));
        let mem_repo = MarkerRepository::new(DataStore::in_memory());

        let from_db = db_repo.get_all().await.unwrap();
        let from_memory = mem_repo.get_all().await.unwrap();

        assert_eq!(from_db.len(), MARKER_CATALOG.len());
        assert_eq!(from_db, from_memory);
    }

    #[tokio::test]
    async fn test_get_marker_by_id() {
        let repo = MarkerRepository::new(DataStore::database(DatabasePool::in_memory().unwrap()));

        let hdl = repo.get_by_id(marker_id_for_name("HDL Cholesterol")).await.unwrap().unwrap();
        assert_eq!(hdl.min_value, Some(40.0));
        assert_eq!(hdl.max_value, None);

        assert!(repo.get_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
