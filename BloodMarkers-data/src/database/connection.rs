//! Database connection module for the Blood Markers application
//!
//! This module provides SQLite connectivity with two modes:
//! - file-backed SQLite (default)
//! - in-memory SQLite (`DB_TYPE=memory`), mostly useful for tests and demos

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use once_cell::sync::OnceCell;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// Default location of the SQLite file
pub const DEFAULT_SQLITE_PATH: &str = "data/blood_markers.db";

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
    /// SQLite database held in memory
    InMemory,
}

impl DatabaseType {
    /// Convert from string to database type
    pub fn parse(s: &str) -> Result<Self, DatabaseError> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            "memory" | "in-memory" | "inmemory" => Ok(DatabaseType::InMemory),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),

    /// SQLite connection pool error
    #[error("SQLite connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    /// Filesystem error while preparing the database location
    #[error("Database file error: {0}")]
    IoError(#[from] std::io::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Invalid configuration value
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    MigrationError(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type (sqlite, memory)
    pub db_type: DatabaseType,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some(DEFAULT_SQLITE_PATH.to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            db_type: DatabaseType::InMemory,
            sqlite_path: None,
            max_connections: 1,
            timeout_seconds: 5,
        }
    }

    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let db_type_str = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());
        let db_type = DatabaseType::parse(&db_type_str)?;

        let sqlite_path = env::var("DB_SQLITE_PATH").ok();

        match db_type {
            DatabaseType::Sqlite => match sqlite_path {
                Some(ref path) => info!("Using SQLite database at: {}", path),
                None => info!("No DB_SQLITE_PATH provided, will use default path: {}", DEFAULT_SQLITE_PATH),
            },
            DatabaseType::InMemory => info!("Using in-memory SQLite database"),
        }

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", 10u32)?;
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", 30u64)?;

        if max_connections == 0 {
            return Err(DatabaseError::ConfigError(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }

        info!("Database configuration: max_connections={}, timeout={}s",
            max_connections, timeout_seconds);

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

/// Read a numeric environment variable, falling back to a default when unset
fn parse_env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, DatabaseError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            DatabaseError::ConfigError(format!("{} must be a number, got '{}'", name, raw))
        }),
        Err(_) => Ok(default),
    }
}

/// Pooled SQLite connections shared by all repositories
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<r2d2::Pool<SqliteConnectionManager>>,
    db_type: DatabaseType,
}

impl DatabasePool {
    /// Open a pool for the given configuration and run migrations on it
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let pool = match config.db_type {
            DatabaseType::Sqlite => open_sqlite_pool(config)?,
            DatabaseType::InMemory => open_in_memory_pool(config)?,
        };

        let conn = pool.get()?;
        run_sqlite_migrations(&conn)?;

        Ok(pool)
    }

    /// Fresh in-memory database with the schema applied
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::connect(&DatabaseConfig::in_memory())
    }

    /// Borrow a connection from the pool
    pub fn get(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, r2d2::Error> {
        self.pool.get()
    }

    /// Which kind of database backs this pool
    pub fn db_type(&self) -> DatabaseType {
        self.db_type
    }

    /// Current pool occupancy as (connections, idle connections)
    pub fn state(&self) -> (u32, u32) {
        let state = self.pool.state();
        (state.connections, state.idle_connections)
    }
}

/// Initialize the global database connection pool
pub fn initialize_database_pool() -> Result<(), DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;

    info!("Initializing database pool with type: {:?}", config.db_type);

    let pool = DatabasePool::connect(&config)?;

    DB_POOL.set(pool).map_err(|_| DatabaseError::PoolAlreadyInitialized)?;

    info!("Database pool initialized");
    Ok(())
}

/// Get the global database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get()
        .cloned()
        .ok_or(DatabaseError::PoolNotInitialized)
}

/// Every connection enforces foreign keys so deletes cascade
fn connection_manager(manager: SqliteConnectionManager) -> SqliteConnectionManager {
    manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"))
}

/// Initialize SQLite connection pool
fn open_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let sqlite_path = config.sqlite_path.clone()
        .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string());

    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(&sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent).map_err(|e| {
                error!("Failed to create directory {:?}: {}", parent, e);
                DatabaseError::IoError(e)
            })?;
        }
    }

    let manager = connection_manager(
        SqliteConnectionManager::file(&sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE),
    );

    let pool = r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
        .map_err(|e| {
            error!("Failed to create SQLite connection pool: {}", e);
            DatabaseError::PoolError(e)
        })?;

    info!("SQLite connection pool created successfully");
    Ok(DatabasePool {
        pool: Arc::new(pool),
        db_type: DatabaseType::Sqlite,
    })
}

/// Initialize an in-memory SQLite database
fn open_in_memory_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    // Each in-memory connection is its own database, so the pool holds exactly one.
    if config.max_connections > 1 {
        warn!("In-memory SQLite ignores DB_MAX_CONNECTIONS={}, using 1", config.max_connections);
    }

    let manager = connection_manager(SqliteConnectionManager::memory());

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    Ok(DatabasePool {
        pool: Arc::new(pool),
        db_type: DatabaseType::InMemory,
    })
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    let pool = DB_POOL.get()?;
    Some(describe_pool(pool))
}

/// Human-readable description of a pool, used by health checks
pub fn describe_pool(pool: &DatabasePool) -> String {
    let conn = match pool.get() {
        Ok(conn) => conn,
        Err(e) => {
            error!("Failed to get SQLite connection: {}", e);
            return format!("SQLite connection error: {}", e);
        }
    };

    let location = match conn.query_row("PRAGMA database_list", [], |row| row.get::<_, String>(2)) {
        Ok(path) if path.is_empty() || path == ":memory:" => "SQLite in-memory database".to_string(),
        Ok(path) => format!("SQLite database at {}", path),
        Err(_) => "SQLite database (path unknown)".to_string(),
    };
    drop(conn);

    let (connections, idle) = pool.state();
    format!("{} (connections: active={}, idle={})", location, connections, idle)
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert_eq!(config.db_type, DatabaseType::Sqlite);
        assert!(config.sqlite_path.is_some());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_database_type_parse() {
        assert_eq!(DatabaseType::parse("sqlite").unwrap(), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::parse("SQLite").unwrap(), DatabaseType::Sqlite);
        assert_eq!(DatabaseType::parse("memory").unwrap(), DatabaseType::InMemory);
        assert!(DatabaseType::parse("postgres").is_err());
    }

    #[test]
    fn test_in_memory_pool_is_migrated() {
        let pool = DatabasePool::in_memory().unwrap();
        assert_eq!(pool.db_type(), DatabaseType::InMemory);

        let conn = pool.get().unwrap();
        let markers: i64 = conn
            .query_row("SELECT COUNT(*) FROM blood_markers", [], |row| row.get(0))
            .unwrap();
        assert!(markers > 0);
    }

    #[test]
    fn test_describe_in_memory_pool() {
        let pool = DatabasePool::in_memory().unwrap();
        let description = describe_pool(&pool);
        assert!(description.contains("in-memory"), "unexpected description: {}", description);
    }
}
