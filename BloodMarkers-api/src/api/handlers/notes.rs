use std::sync::Arc;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use blood_markers_domain::entities::{CreateNoteRequest, MarkerNote, UpdateNoteRequest};
use blood_markers_domain::services::NoteServiceTrait;

use crate::entities::ErrorResponse;

pub type SharedNoteService = Arc<dyn NoteServiceTrait>;

/// Notes of a marker, newest first
#[utoipa::path(
    get,
    path = "/api/v1/markers/{id}/notes",
    params(("id" = Uuid, Path, description = "Marker ID")),
    responses(
        (status = 200, description = "Notes of the marker", body = [MarkerNote]),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "notes"
)]
#[instrument(skip(service))]
pub async fn list_marker_notes(
    State(service): State<SharedNoteService>,
    marker_id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Vec<MarkerNote>>, ErrorResponse> {
    let Path(marker_id) = marker_id?;
    Ok(Json(service.list_notes(marker_id).await?))
}

/// Add a note to a marker
#[utoipa::path(
    post,
    path = "/api/v1/markers/{id}/notes",
    params(("id" = Uuid, Path, description = "Marker ID")),
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created", body = MarkerNote),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Marker not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "notes"
)]
#[instrument(skip(service, payload))]
pub async fn create_marker_note(
    State(service): State<SharedNoteService>,
    marker_id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MarkerNote>), ErrorResponse> {
    let Path(marker_id) = marker_id?;
    let Json(request) = payload?;
    let note = service.create_note(marker_id, request).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Replace the content of a note
#[utoipa::path(
    put,
    path = "/api/v1/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated", body = MarkerNote),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "notes"
)]
#[instrument(skip(service, payload))]
pub async fn update_note(
    State(service): State<SharedNoteService>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> Result<Json<MarkerNote>, ErrorResponse> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(Json(service.update_note(id, request).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notes/{id}",
    params(("id" = Uuid, Path, description = "Note ID")),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "notes"
)]
#[instrument(skip(service))]
pub async fn delete_note(
    State(service): State<SharedNoteService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, ErrorResponse> {
    let Path(id) = id?;
    service.delete_note(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
