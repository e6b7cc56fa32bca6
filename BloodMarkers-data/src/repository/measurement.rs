use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, ToSql};
use tracing::debug;
use uuid::Uuid;

use crate::models::{CreateMeasurement, Measurement, MeasurementFilter, UpdateMeasurement};
use super::errors::RepositoryError;
use super::storage::{
    date_column, encode_date, encode_timestamp, now_timestamp, timestamp_column, uuid_column,
    Backend, DataStore,
};

const MEASUREMENT_COLUMNS: &str = "id, marker_id, value, measured_at, notes, created_at, updated_at";

/// Repository trait for measurements
#[async_trait]
pub trait MeasurementRepositoryTrait: Send + Sync {
    /// Create a new measurement from a request
    async fn create(&self, request: CreateMeasurement) -> Result<Measurement, RepositoryError>;

    /// Apply a partial update, returning `None` when the measurement does not exist
    async fn update(&self, id: Uuid, changes: UpdateMeasurement) -> Result<Option<Measurement>, RepositoryError>;

    /// Delete a measurement and its todos, returning whether a row was removed
    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Get a measurement by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Measurement>, RepositoryError>;

    /// Get one page of filtered measurements plus the total match count
    async fn get_filtered(&self, filter: &MeasurementFilter) -> Result<(Vec<Measurement>, usize), RepositoryError>;
}

/// Repository for measurements
#[derive(Debug, Clone)]
pub struct MeasurementRepository {
    store: DataStore,
}

impl MeasurementRepository {
    /// Create a new repository on top of a shared store
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

fn measurement_from_row(row: &Row<'_>) -> rusqlite::Result<Measurement> {
    Ok(Measurement {
        id: uuid_column(row, 0)?,
        marker_id: uuid_column(row, 1)?,
        value: row.get(2)?,
        measured_at: date_column(row, 3)?,
        notes: row.get(4)?,
        created_at: timestamp_column(row, 5)?,
        updated_at: timestamp_column(row, 6)?,
    })
}

fn select_measurement(conn: &rusqlite::Connection, id: &Uuid) -> Result<Option<Measurement>, RepositoryError> {
    let measurement = conn
        .query_row(
            &format!("SELECT {} FROM measurements WHERE id = ?1", MEASUREMENT_COLUMNS),
            [id.to_string()],
            measurement_from_row,
        )
        .optional()?;

    Ok(measurement)
}

#[async_trait]
impl MeasurementRepositoryTrait for MeasurementRepository {
    async fn create(&self, request: CreateMeasurement) -> Result<Measurement, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.create_measurement(request),
        };

        let now = now_timestamp();
        let measurement = Measurement {
            id: Uuid::new_v4(),
            marker_id: request.marker_id,
            value: request.value,
            measured_at: request.measured_at,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        debug!("Storing measurement in database: id={}", measurement.id);
        let conn = pool.get()?;

        conn.execute(
            "INSERT INTO measurements
             (id, marker_id, value, measured_at, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            (
                measurement.id.to_string(),
                measurement.marker_id.to_string(),
                measurement.value,
                encode_date(&measurement.measured_at),
                &measurement.notes,
                encode_timestamp(&measurement.created_at),
                encode_timestamp(&measurement.updated_at),
            ),
        )?;

        Ok(measurement)
    }

    async fn update(&self, id: Uuid, changes: UpdateMeasurement) -> Result<Option<Measurement>, RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.update_measurement(&id, changes),
        };

        debug!("Updating measurement in database: id={}", id);
        let conn = pool.get()?;

        let Some(mut measurement) = select_measurement(&conn, &id)? else {
            return Ok(None);
        };

        if let Some(value) = changes.value {
            measurement.value = value;
        }
        if let Some(measured_at) = changes.measured_at {
            measurement.measured_at = measured_at;
        }
        if let Some(notes) = changes.notes {
            measurement.notes = notes;
        }
        measurement.updated_at = now_timestamp();

        conn.execute(
            "UPDATE measurements SET value = ?1, measured_at = ?2, notes = ?3, updated_at = ?4
             WHERE id = ?5",
            (
                measurement.value,
                encode_date(&measurement.measured_at),
                &measurement.notes,
                encode_timestamp(&measurement.updated_at),
                id.to_string(),
            ),
        )?;

        Ok(Some(measurement))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Deleting measurement from database: id={}", id);
                let conn = pool.get()?;
                let removed = conn.execute("DELETE FROM measurements WHERE id = ?1", [id.to_string()])?;
                Ok(removed > 0)
            },
            Backend::Memory(storage) => storage.delete_measurement(&id),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Measurement>, RepositoryError> {
        match self.store.backend() {
            Backend::Database(pool) => {
                debug!("Getting measurement by ID from database: id={}", id);
                let conn = pool.get()?;
                select_measurement(&conn, &id)
            },
            Backend::Memory(storage) => storage.get_measurement(&id),
        }
    }

    async fn get_filtered(&self, filter: &MeasurementFilter) -> Result<(Vec<Measurement>, usize), RepositoryError> {
        let pool = match self.store.backend() {
            Backend::Database(pool) => pool,
            Backend::Memory(storage) => return storage.filter_measurements(filter),
        };

        debug!("Getting filtered measurements from database: {:?}", filter);
        let conn = pool.get()?;

        let sort_direction = if filter.sort_desc.unwrap_or(true) { "DESC" } else { "ASC" };

        let mut where_clauses = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(marker_id) = filter.marker_id {
            params.push(marker_id.to_string());
            where_clauses.push(format!("marker_id = ?{}", params.len()));
        }

        if let Some(start) = filter.start_date {
            params.push(encode_date(&start));
            where_clauses.push(format!("measured_at >= ?{}", params.len()));
        }

        if let Some(end) = filter.end_date {
            params.push(encode_date(&end));
            where_clauses.push(format!("measured_at <= ?{}", params.len()));
        }

        let where_sql = if where_clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", where_clauses.join(" AND "))
        };

        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        // LIMIT -1 means no limit in SQLite; a negative OFFSET would be read as 0
        let limit = filter.limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let offset = i64::try_from(filter.offset.unwrap_or(0)).unwrap_or(i64::MAX);

        let query = format!(
            "SELECT {} FROM measurements{} ORDER BY measured_at {dir}, created_at {dir}, id {dir} LIMIT {} OFFSET {}",
            MEASUREMENT_COLUMNS, where_sql, limit, offset, dir = sort_direction
        );

        let mut stmt = conn.prepare(&query)?;
        let measurements = stmt
            .query_map(param_refs.as_slice(), measurement_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM measurements{}", where_sql),
            param_refs.as_slice(),
            |row| row.get(0),
        )?;

        Ok((measurements, total as usize))
    }
}
