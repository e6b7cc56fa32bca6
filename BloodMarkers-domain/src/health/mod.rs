//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use blood_markers_data::database::{self, DatabasePool};

/// System health status
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Check the storage backend
    ///
    /// Returns a description of the backend when it answers, an error otherwise.
    async fn check_database_status(&self) -> Result<String, String>;
}

/// Health checks against the storage the services run on
#[derive(Debug, Clone)]
pub struct HealthService {
    pool: Option<DatabasePool>,
}

impl HealthService {
    /// Health of a specific pool; `None` means in-memory storage
    pub fn new(pool: Option<DatabasePool>) -> Self {
        Self { pool }
    }

    /// Health of the global pool, if one was initialized
    pub fn from_global_pool() -> Self {
        Self::new(database::get_db_pool().ok())
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let database = match self.check_database_status().await {
            Ok(details) => HealthComponent {
                status: ComponentStatus::Healthy,
                details: Some(details),
            },
            Err(e) => {
                warn!("Database health check failed: {}", e);
                HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                }
            },
        };

        SystemHealth {
            status: overall_status(std::iter::once(database.status)),
            components: HashMap::from([("database".to_string(), database)]),
        }
    }

    async fn check_database_status(&self) -> Result<String, String> {
        let Some(pool) = &self.pool else {
            return Ok("In-memory storage".to_string());
        };

        pool.get().map_err(|e| format!("Database connection error: {}", e))?;
        Ok(database::describe_pool(pool))
    }
}

/// Worst component status wins
fn overall_status(statuses: impl Iterator<Item = ComponentStatus>) -> SystemStatus {
    statuses.fold(SystemStatus::Healthy, |acc, status| match (acc, status) {
        (SystemStatus::Unhealthy, _) | (_, ComponentStatus::Unhealthy) => SystemStatus::Unhealthy,
        (SystemStatus::Degraded, _) | (_, ComponentStatus::Degraded) => SystemStatus::Degraded,
        _ => SystemStatus::Healthy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_storage_is_healthy() {
        let health = HealthService::new(None).get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert!(health.components.contains_key("database"));
    }

    #[tokio::test]
    async fn test_sqlite_pool_is_described() {
        let service = HealthService::new(Some(DatabasePool::in_memory().unwrap()));
        let details = service.check_database_status().await.unwrap();
        assert!(details.contains("in-memory"), "got {}", details);
    }

    #[test]
    fn test_overall_status_takes_worst() {
        let statuses = [ComponentStatus::Healthy, ComponentStatus::Degraded];
        assert_eq!(overall_status(statuses.into_iter()), SystemStatus::Degraded);

        let statuses = [ComponentStatus::Degraded, ComponentStatus::Unhealthy];
        assert_eq!(overall_status(statuses.into_iter()), SystemStatus::Unhealthy);
    }
}
