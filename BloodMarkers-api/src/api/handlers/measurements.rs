use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use blood_markers_domain::entities::{AssessedMeasurement, CreateMeasurementRequest, UpdateMeasurementRequest};
use blood_markers_domain::services::MeasurementServiceTrait;

use crate::entities::{ErrorResponse, MeasurementListParams, MeasurementPage, PaginatedResponse};

/// Service type for dependency injection
pub type SharedMeasurementService = Arc<dyn MeasurementServiceTrait>;

const MEASUREMENTS_PATH: &str = "/api/v1/measurements";

/// Record a new measurement
#[utoipa::path(
    post,
    path = "/api/v1/measurements",
    request_body = CreateMeasurementRequest,
    responses(
        (status = 201, description = "Measurement recorded", body = AssessedMeasurement),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "measurements"
)]
#[instrument(skip(service, payload))]
pub async fn create_measurement(
    State(service): State<SharedMeasurementService>,
    payload: Result<Json<CreateMeasurementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AssessedMeasurement>), ErrorResponse> {
    let Json(request) = payload?;

    let measurement = service.create_measurement(request).await?;
    info!("Measurement created with ID: {}", measurement.id);

    Ok((StatusCode::CREATED, Json(measurement)))
}

/// Get paginated measurement history
#[utoipa::path(
    get,
    path = "/api/v1/measurements",
    params(MeasurementListParams),
    responses(
        (status = 200, description = "Measurement history", body = MeasurementPage),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "measurements"
)]
#[instrument(skip(service))]
pub async fn list_measurements(
    State(service): State<SharedMeasurementService>,
    params: Result<Query<MeasurementListParams>, QueryRejection>,
) -> Result<Json<PaginatedResponse<AssessedMeasurement>>, ErrorResponse> {
    let Query(params) = params?;
    let limit = params.limit();
    let offset = params.offset();

    let (data, total_count) = service.list_measurements(&params.to_query()).await?;
    let (next, previous) = generate_pagination_links(total_count, limit, offset, MEASUREMENTS_PATH, &params);

    Ok(Json(PaginatedResponse {
        total_count,
        offset,
        limit,
        next,
        previous,
        data,
    }))
}

/// Get a single measurement by ID
#[utoipa::path(
    get,
    path = "/api/v1/measurements/{id}",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    responses(
        (status = 200, description = "Measurement found", body = AssessedMeasurement),
        (status = 404, description = "Measurement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "measurements"
)]
#[instrument(skip(service))]
pub async fn get_measurement(
    State(service): State<SharedMeasurementService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<AssessedMeasurement>, ErrorResponse> {
    let Path(id) = id?;
    Ok(Json(service.get_measurement(id).await?))
}

/// Update value, date or notes of a measurement
#[utoipa::path(
    put,
    path = "/api/v1/measurements/{id}",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    request_body = UpdateMeasurementRequest,
    responses(
        (status = 200, description = "Measurement updated", body = AssessedMeasurement),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Measurement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "measurements"
)]
#[instrument(skip(service, payload))]
pub async fn update_measurement(
    State(service): State<SharedMeasurementService>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateMeasurementRequest>, JsonRejection>,
) -> Result<Json<AssessedMeasurement>, ErrorResponse> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(Json(service.update_measurement(id, request).await?))
}

/// Delete a measurement and its todos
#[utoipa::path(
    delete,
    path = "/api/v1/measurements/{id}",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    responses(
        (status = 204, description = "Measurement deleted"),
        (status = 404, description = "Measurement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "measurements"
)]
#[instrument(skip(service))]
pub async fn delete_measurement(
    State(service): State<SharedMeasurementService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ErrorResponse> {
    let Path(id) = id?;
    service.delete_measurement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate pagination links from the current request
fn generate_pagination_links(
    total_count: usize,
    limit: usize,
    offset: usize,
    base_url: &str,
    params: &MeasurementListParams,
) -> (Option<String>, Option<String>) {
    let link = |page_offset: usize| {
        let mut query_parts = Vec::new();

        if let Some(marker_id) = params.marker_id {
            query_parts.push(format!("marker_id={}", marker_id));
        }
        if let Some(start) = params.start_date {
            query_parts.push(format!("start_date={}", start));
        }
        if let Some(end) = params.end_date {
            query_parts.push(format!("end_date={}", end));
        }
        query_parts.push(format!("limit={}", limit));
        query_parts.push(format!("offset={}", page_offset));
        if let Some(sort) = params.sort {
            query_parts.push(format!("sort={}", sort.as_str()));
        }

        format!("{}?{}", base_url, query_parts.join("&"))
    };

    let next = offset
        .checked_add(limit)
        .filter(|next_offset| *next_offset < total_count)
        .map(link);
    let previous = (offset > 0).then(|| link(offset.saturating_sub(limit)));

    (next, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use blood_markers_domain::entities::SortOrder;

    #[test]
    fn test_pagination_link_generation() {
        let params = MeasurementListParams {
            marker_id: None,
            start_date: Some("2024-01-01".parse().unwrap()),
            end_date: Some("2024-06-30".parse().unwrap()),
            limit: Some(10),
            offset: Some(20),
            sort: Some(SortOrder::Desc),
        };

        let (next, prev) = generate_pagination_links(50, 10, 20, MEASUREMENTS_PATH, &params);
        let next_url = next.unwrap();
        let prev_url = prev.unwrap();

        assert!(next_url.contains("offset=30"));
        assert!(next_url.contains("start_date=2024-01-01"));
        assert!(next_url.contains("sort=desc"));
        assert!(prev_url.contains("offset=10"));

        // First page
        let (next, prev) = generate_pagination_links(50, 10, 0, MEASUREMENTS_PATH, &params);
        assert!(next.is_some());
        assert!(prev.is_none());

        // Last page
        let (next, prev) = generate_pagination_links(50, 10, 40, MEASUREMENTS_PATH, &params);
        assert!(next.is_none());
        assert!(prev.is_some());
    }

    #[test]
    fn test_pagination_links_with_offset_at_usize_max() {
        let params = MeasurementListParams {
            offset: Some(usize::MAX),
            ..MeasurementListParams::default()
        };

        let (next, prev) = generate_pagination_links(3, 100, usize::MAX, MEASUREMENTS_PATH, &params);
        assert!(next.is_none());
        assert!(prev.unwrap().contains(&format!("offset={}", usize::MAX - 100)));
    }
}
