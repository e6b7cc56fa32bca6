// Repository module structure
pub mod errors;
mod in_memory;
mod marker;
mod measurement;
mod note;
mod storage;
mod todo;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use marker::{MarkerRepository, MarkerRepositoryTrait};
pub use measurement::{MeasurementRepository, MeasurementRepositoryTrait};
pub use note::{NoteRepository, NoteRepositoryTrait};
pub use storage::DataStore;
pub use todo::{TodoRepository, TodoRepositoryTrait};
