use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::State, http::StatusCode, Json};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;

use blood_markers_domain::health::{ComponentStatus as DomainComponentStatus, HealthServiceTrait, SystemStatus};

use crate::config::AppConfig;

pub type SharedHealthService = Arc<dyn HealthServiceTrait>;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", "degraded" or "error"
    pub status: String,
    /// Application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of the response
    pub timestamp: u64,
    /// Seconds since the server started
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<u64>,
    pub components: ComponentStatus,
    pub environment: String,
}

/// Status of individual system components
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    pub database: ComponentHealthStatus,
    pub api: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// "ok", "degraded" or "error"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

static SERVER_START_TIME: OnceCell<u64> = OnceCell::new();

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Record the server start time; later calls are no-ops
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.set(unix_now());
}

/// Health check endpoint to verify the API is running
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "API is not healthy", body = HealthResponse),
        (status = 503, description = "API is degraded", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(health_service, config))]
pub async fn health_check(
    State(health_service): State<SharedHealthService>,
    State(config): State<Arc<AppConfig>>,
) -> (StatusCode, Json<HealthResponse>) {
    info!("Health check requested");

    let now = unix_now();
    let uptime = SERVER_START_TIME.get().map(|&start| now.saturating_sub(start));
    let system_health = health_service.get_system_health().await;

    let database = system_health
        .components
        .get("database")
        .map(|c| ComponentHealthStatus {
            status: map_component_status(c.status),
            message: c.details.clone(),
        })
        .unwrap_or_else(|| ComponentHealthStatus {
            status: map_component_status(DomainComponentStatus::Unhealthy),
            message: Some("Database status unknown".to_string()),
        });

    let (status_code, overall_status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Degraded => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
        SystemStatus::Unhealthy => (StatusCode::INTERNAL_SERVER_ERROR, "error"),
    };

    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            database,
            api: ComponentHealthStatus {
                status: map_component_status(DomainComponentStatus::Healthy),
                message: None,
            },
        },
        environment: config.environment.clone(),
    };

    (status_code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Degraded => "degraded",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use blood_markers_domain::health::{HealthComponent, HealthService, SystemHealth};
    use std::collections::HashMap;

    #[derive(Debug)]
    struct DegradedHealthService;

    #[async_trait]
    impl HealthServiceTrait for DegradedHealthService {
        async fn get_system_health(&self) -> SystemHealth {
            SystemHealth {
                status: SystemStatus::Degraded,
                components: HashMap::from([(
                    "database".to_string(),
                    HealthComponent {
                        status: DomainComponentStatus::Degraded,
                        details: Some("Slow queries".to_string()),
                    },
                )]),
            }
        }

        async fn check_database_status(&self) -> Result<String, String> {
            Ok("slow".to_string())
        }
    }

    #[tokio::test]
    async fn test_health_check_response() {
        initialize_server_start_time();
        let service: SharedHealthService = Arc::new(HealthService::new(None));

        let (status, Json(body)) = health_check(State(service), State(Arc::new(AppConfig::default()))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.components.database.status, "ok");
        assert_eq!(body.environment, "development");
        assert!(body.uptime.is_some());
    }

    #[tokio::test]
    async fn test_degraded_database_returns_503() {
        let service: SharedHealthService = Arc::new(DegradedHealthService);

        let (status, Json(body)) = health_check(State(service), State(Arc::new(AppConfig::default()))).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.components.database.status, "degraded");
        assert_eq!(body.components.database.message.as_deref(), Some("Slow queries"));
    }
}
