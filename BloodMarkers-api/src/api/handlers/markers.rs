use std::sync::Arc;

use axum::{
    extract::{rejection::{PathRejection, QueryRejection}, Path, Query, State},
    Json,
};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use blood_markers_domain::entities::{MarkerGroup, MarkerSummary, MarkerTrend};
use blood_markers_domain::services::MarkerServiceTrait;

use crate::entities::{ErrorResponse, MarkerListParams};

/// Service type for dependency injection
pub type SharedMarkerService = Arc<dyn MarkerServiceTrait>;

/// List marker summaries
#[utoipa::path(
    get,
    path = "/api/v1/markers",
    params(MarkerListParams),
    responses(
        (status = 200, description = "Marker summaries", body = [MarkerSummary]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "markers"
)]
#[instrument(skip(service))]
pub async fn list_markers(
    State(service): State<SharedMarkerService>,
    params: Result<Query<MarkerListParams>, QueryRejection>,
) -> Result<Json<Vec<MarkerSummary>>, ErrorResponse> {
    let Query(params) = params?;

    let summaries = service.list_summaries(&params.filter(), params.sort()).await?;
    debug!("Returning {} marker summaries", summaries.len());

    Ok(Json(summaries))
}

/// List marker summaries grouped by category
#[utoipa::path(
    get,
    path = "/api/v1/markers/grouped",
    params(MarkerListParams),
    responses(
        (status = 200, description = "Summaries grouped by category", body = [MarkerGroup]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "markers"
)]
#[instrument(skip(service))]
pub async fn list_grouped_markers(
    State(service): State<SharedMarkerService>,
    params: Result<Query<MarkerListParams>, QueryRejection>,
) -> Result<Json<Vec<MarkerGroup>>, ErrorResponse> {
    let Query(params) = params?;
    let groups = service.grouped_summaries(&params.filter(), params.sort()).await?;
    Ok(Json(groups))
}

/// Get the summary of one marker
#[utoipa::path(
    get,
    path = "/api/v1/markers/{id}",
    params(("id" = Uuid, Path, description = "Marker ID")),
    responses(
        (status = 200, description = "Marker summary", body = MarkerSummary),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "markers"
)]
#[instrument(skip(service))]
pub async fn get_marker(
    State(service): State<SharedMarkerService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MarkerSummary>, ErrorResponse> {
    let Path(id) = id?;
    Ok(Json(service.get_summary(id).await?))
}

/// Get the full trend of one marker
#[utoipa::path(
    get,
    path = "/api/v1/markers/{id}/trend",
    params(("id" = Uuid, Path, description = "Marker ID")),
    responses(
        (status = 200, description = "Chronological series with optimization events", body = MarkerTrend),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "markers"
)]
#[instrument(skip(service))]
pub async fn get_marker_trend(
    State(service): State<SharedMarkerService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MarkerTrend>, ErrorResponse> {
    let Path(id) = id?;
    let trend = service.get_trend(id).await?;
    info!("Trend for {}: {} points", trend.marker.name, trend.points.len());
    Ok(Json(trend))
}
