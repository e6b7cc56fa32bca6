use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use blood_markers_domain::entities::{CreateTodoRequest, MeasurementTodo, UpdateTodoRequest};
use blood_markers_domain::services::TodoServiceTrait;

use crate::entities::ErrorResponse;

pub type SharedTodoService = Arc<dyn TodoServiceTrait>;

/// Todos of a measurement, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/measurements/{id}/todos",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    responses(
        (status = 200, description = "Todos of the measurement", body = [MeasurementTodo]),
        (status = 404, description = "Measurement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[instrument(skip(service))]
pub async fn list_measurement_todos(
    State(service): State<SharedTodoService>,
    measurement_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<MeasurementTodo>>, ErrorResponse> {
    let Path(measurement_id) = measurement_id?;
    Ok(Json(service.list_todos(measurement_id).await?))
}

/// Attach a follow-up todo to a measurement
#[utoipa::path(
    post,
    path = "/api/v1/measurements/{id}/todos",
    params(("id" = Uuid, Path, description = "Measurement ID")),
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = MeasurementTodo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Measurement not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[instrument(skip(service, payload))]
pub async fn create_measurement_todo(
    State(service): State<SharedTodoService>,
    measurement_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MeasurementTodo>), ErrorResponse> {
    let Path(measurement_id) = measurement_id?;
    let Json(request) = payload?;
    let todo = service.create_todo(measurement_id, request).await?;
    info!("Todo {} added to measurement {}", todo.id, measurement_id);
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Rename or complete a todo
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = MeasurementTodo),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[instrument(skip(service, payload))]
pub async fn update_todo(
    State(service): State<SharedTodoService>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateTodoRequest>, JsonRejection>,
) -> Result<Json<MeasurementTodo>, ErrorResponse> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(Json(service.update_todo(id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    params(("id" = Uuid, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "todos"
)]
#[instrument(skip(service))]
pub async fn delete_todo(
    State(service): State<SharedTodoService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ErrorResponse> {
    let Path(id) = id?;
    service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
