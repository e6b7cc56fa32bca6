use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use tracing::debug;
use uuid::Uuid;

use crate::database::{get_db_pool, DatabasePool};
use super::in_memory::InMemoryStorage;

/// Where repository calls are sent
#[derive(Debug, Clone)]
pub(crate) enum Backend {
    /// Pooled SQLite connections
    Database(DatabasePool),
    /// Process-local tables, used when no database was initialized
    Memory(InMemoryStorage),
}

/// Storage handle shared by all repositories.
///
/// Cloning is cheap and clones see the same data, so the marker, measurement,
/// note and todo repositories built from one store stay consistent with each
/// other in both backends.
#[derive(Debug, Clone)]
pub struct DataStore {
    backend: Backend,
}

impl DataStore {
    /// Use the global database pool if one was initialized, in-memory tables otherwise
    pub fn from_global_pool() -> Self {
        match get_db_pool() {
            Ok(pool) => {
                debug!("Repositories will use the database pool");
                Self::database(pool)
            },
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                Self::in_memory()
            }
        }
    }

    /// Store backed by an explicit database pool
    pub fn database(pool: DatabasePool) -> Self {
        Self { backend: Backend::Database(pool) }
    }

    /// Store backed by fresh in-memory tables seeded with the marker catalog
    pub fn in_memory() -> Self {
        Self { backend: Backend::Memory(InMemoryStorage::new()) }
    }

    pub(crate) fn backend(&self) -> &Backend {
        &self.backend
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::from_global_pool()
    }
}

/// Current time at the precision stored in the database
pub(crate) fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Encode a timestamp so that text ordering matches time ordering
pub(crate) fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Encode a calendar date as YYYY-MM-DD
pub(crate) fn encode_date(value: &NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}

fn conversion_failure<E>(idx: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(error))
}

/// Read a UUID stored as text
pub(crate) fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_failure(idx, e))
}

/// Read an RFC 3339 timestamp stored as text
pub(crate) fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, e))
}

/// Read a YYYY-MM-DD date stored as text
pub(crate) fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| conversion_failure(idx, e))
}
