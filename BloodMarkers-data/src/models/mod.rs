// Storage models, one module per table
pub mod catalog;
pub mod marker;
pub mod measurement;
pub mod note;
pub mod todo;

pub use marker::BloodMarker;
pub use measurement::{CreateMeasurement, Measurement, MeasurementFilter, UpdateMeasurement};
pub use note::{CreateNote, MarkerNote};
pub use todo::{CreateTodo, MeasurementTodo, UpdateTodo};
