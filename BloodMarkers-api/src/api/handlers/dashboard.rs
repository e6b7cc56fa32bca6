use axum::{extract::State, Json};
use tracing::instrument;

use blood_markers_domain::entities::{DashboardOverview, OptimizationEvent};

use super::markers::SharedMarkerService;
use crate::entities::ErrorResponse;

/// Optimization events across all markers, newest first
#[utoipa::path(
    get,
    path = "/api/v1/optimizations",
    responses(
        (status = 200, description = "Optimization events", body = [OptimizationEvent]),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn list_optimizations(
    State(service): State<SharedMarkerService>,
) -> Result<Json<Vec<OptimizationEvent>>, ErrorResponse> {
    Ok(Json(service.optimization_events().await?))
}

/// Headline counts and recent optimizations
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard overview", body = DashboardOverview),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "dashboard"
)]
#[instrument(skip(service))]
pub async fn get_dashboard(
    State(service): State<SharedMarkerService>,
) -> Result<Json<DashboardOverview>, ErrorResponse> {
    Ok(Json(service.dashboard().await?))
}
