use std::sync::PoisonError;
use thiserror::Error;

/// Error type for repository operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Referenced row does not exist or a uniqueness rule was broken
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::SqliteFailure(ref failure, ref message)
                if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                RepositoryError::Constraint(
                    message.clone().unwrap_or_else(|| failure.to_string()),
                )
            }
            other => RepositoryError::Sqlite(other),
        }
    }
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_failures_are_classified() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (id TEXT PRIMARY KEY);").unwrap();
        conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap();

        let err = conn.execute("INSERT INTO t (id) VALUES ('a')", []).unwrap_err();
        let repo_err = RepositoryError::from(err);

        assert!(matches!(repo_err, RepositoryError::Constraint(_)), "got {:?}", repo_err);
    }

    #[test]
    fn test_poisoned_lock_becomes_lock_error() {
        let mutex = std::sync::Arc::new(std::sync::Mutex::new(0));
        let poisoner = mutex.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        let err: RepositoryError = mutex.lock().unwrap_err().into();
        assert!(matches!(err, RepositoryError::Lock(_)));
    }
}
