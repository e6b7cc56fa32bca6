use rusqlite::{params, Connection};
use tracing::info;

use crate::database::DatabaseError;
use crate::models::catalog::MARKER_CATALOG;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_tables(conn)?;
    create_indexes(conn)?;
    seed_marker_catalog(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create all tables if they do not exist yet
fn create_tables(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating tables if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS blood_markers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            category TEXT NOT NULL,
            unit TEXT NOT NULL,
            description TEXT,
            min_value REAL,
            max_value REAL
        );

        CREATE TABLE IF NOT EXISTS measurements (
            id TEXT PRIMARY KEY,
            marker_id TEXT NOT NULL REFERENCES blood_markers(id) ON DELETE CASCADE,
            value REAL NOT NULL,
            measured_at TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS marker_notes (
            id TEXT PRIMARY KEY,
            marker_id TEXT NOT NULL REFERENCES blood_markers(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS measurement_todos (
            id TEXT PRIMARY KEY,
            measurement_id TEXT NOT NULL REFERENCES measurements(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
    ).map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(())
}

/// Create indexes used by the list queries
fn create_indexes(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating indexes");

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_measurements_marker_date
            ON measurements (marker_id, measured_at);
        CREATE INDEX IF NOT EXISTS idx_marker_notes_marker
            ON marker_notes (marker_id);
        CREATE INDEX IF NOT EXISTS idx_measurement_todos_measurement
            ON measurement_todos (measurement_id);",
    ).map_err(|e| DatabaseError::MigrationError(format!("Failed to create index: {}", e)))?;

    Ok(())
}

/// Insert the predefined markers, leaving existing rows alone
fn seed_marker_catalog(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Seeding {} predefined markers", MARKER_CATALOG.len());

    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO blood_markers
         (id, name, category, unit, description, min_value, max_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for definition in MARKER_CATALOG {
        stmt.execute(params![
            definition.id().to_string(),
            definition.name,
            definition.category,
            definition.unit,
            definition.description,
            definition.min_value,
            definition.max_value,
        ]).map_err(|e| DatabaseError::MigrationError(
            format!("Failed to seed marker {}: {}", definition.name, e)
        ))?;
    }

    Ok(())
}
