// Domain services
// This module contains business logic implementations.

pub mod errors;
pub mod marker;
pub mod measurement;
pub mod note;
pub mod overview;
pub mod status;
pub mod todo;
pub mod trends;

use std::sync::Arc;

use blood_markers_data::repository::{
    DataStore, MarkerRepository, MarkerRepositoryTrait, MeasurementRepository, MeasurementRepositoryTrait,
    NoteRepository, NoteRepositoryTrait, TodoRepository, TodoRepositoryTrait,
};

// Re-export service traits
pub use errors::ServiceError;
pub use marker::{MarkerService, MarkerServiceTrait};
pub use measurement::{MeasurementService, MeasurementServiceTrait};
pub use note::{NoteService, NoteServiceTrait};
pub use todo::{TodoService, TodoServiceTrait};

/// Repository handles shared by the services
#[derive(Clone)]
pub struct Repositories {
    pub markers: Arc<dyn MarkerRepositoryTrait>,
    pub measurements: Arc<dyn MeasurementRepositoryTrait>,
    pub notes: Arc<dyn NoteRepositoryTrait>,
    pub todos: Arc<dyn TodoRepositoryTrait>,
}

impl Repositories {
    /// All repositories on top of one store
    pub fn from_store(store: DataStore) -> Self {
        Self {
            markers: Arc::new(MarkerRepository::new(store.clone())),
            measurements: Arc::new(MeasurementRepository::new(store.clone())),
            notes: Arc::new(NoteRepository::new(store.clone())),
            todos: Arc::new(TodoRepository::new(store)),
        }
    }

    /// Isolated in-memory repositories
    pub fn in_memory() -> Self {
        Self::from_store(DataStore::in_memory())
    }
}
