//! Application configuration read from the environment

use std::env;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// File name of the SQLite database inside `DATA_DIR`
pub const DATABASE_FILE: &str = "blood_markers.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number, got {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Server settings
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// `PORT`, default 3000
    pub port: u16,
    /// `DATA_DIR`, default `data`
    pub data_dir: PathBuf,
    /// `APP_ENV`, default `development`
    pub environment: String,
    /// `CORS_ALLOWED_ORIGINS`, comma separated; empty allows any origin
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from("data"),
            environment: "development".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            environment: env::var("APP_ENV").unwrap_or(defaults.environment),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
        })
    }

    /// Default SQLite location inside the data directory
    pub fn sqlite_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.sqlite_path(), PathBuf::from("data").join("blood_markers.db"));
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://localhost:5173, https://markers.example ,,"),
            vec!["http://localhost:5173".to_string(), "https://markers.example".to_string()]
        );
        assert!(parse_origins("*").is_empty());
    }
}
