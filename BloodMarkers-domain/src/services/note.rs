use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use blood_markers_data::models::CreateNote;

use crate::entities::conversions::convert_to_domain_note;
use crate::entities::{CreateNoteRequest, MarkerNote, UpdateNoteRequest};
use crate::services::errors::ServiceError;
use crate::services::Repositories;

/// Trait for marker note operations
#[async_trait]
pub trait NoteServiceTrait: Send + Sync {
    async fn create_note(&self, marker_id: Uuid, request: CreateNoteRequest) -> Result<MarkerNote, ServiceError>;

    async fn update_note(&self, id: Uuid, request: UpdateNoteRequest) -> Result<MarkerNote, ServiceError>;

    async fn delete_note(&self, id: Uuid) -> Result<(), ServiceError>;

    async fn get_note(&self, id: Uuid) -> Result<MarkerNote, ServiceError>;

    /// Notes of a marker, newest first
    async fn list_notes(&self, marker_id: Uuid) -> Result<Vec<MarkerNote>, ServiceError>;
}

pub struct NoteService {
    repositories: Repositories,
}

impl NoteService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    async fn ensure_marker(&self, marker_id: Uuid) -> Result<(), ServiceError> {
        match self.repositories.markers.get_by_id(marker_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("Marker", marker_id)),
        }
    }
}

#[async_trait]
impl NoteServiceTrait for NoteService {
    async fn create_note(&self, marker_id: Uuid, request: CreateNoteRequest) -> Result<MarkerNote, ServiceError> {
        request.validate()?;
        self.ensure_marker(marker_id).await?;

        let note = self
            .repositories
            .notes
            .create(CreateNote {
                marker_id,
                content: request.content.trim().to_string(),
            })
            .await?;

        debug!("Added note {} to marker {}", note.id, marker_id);
        Ok(convert_to_domain_note(note))
    }

    async fn update_note(&self, id: Uuid, request: UpdateNoteRequest) -> Result<MarkerNote, ServiceError> {
        request.validate()?;

        self.repositories
            .notes
            .update(id, request.content.trim().to_string())
            .await?
            .map(convert_to_domain_note)
            .ok_or_else(|| ServiceError::not_found("Note", id))
    }

    async fn delete_note(&self, id: Uuid) -> Result<(), ServiceError> {
        if self.repositories.notes.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::not_found("Note", id))
        }
    }

    async fn get_note(&self, id: Uuid) -> Result<MarkerNote, ServiceError> {
        self.repositories
            .notes
            .get_by_id(id)
            .await?
            .map(convert_to_domain_note)
            .ok_or_else(|| ServiceError::not_found("Note", id))
    }

    async fn list_notes(&self, marker_id: Uuid) -> Result<Vec<MarkerNote>, ServiceError> {
        self.ensure_marker(marker_id).await?;
        let notes = self.repositories.notes.list_for_marker(marker_id).await?;
        Ok(notes.into_iter().map(convert_to_domain_note).collect())
    }
}
