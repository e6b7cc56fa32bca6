pub mod dashboard;
pub mod errors;
pub mod health;
pub mod markers;
pub mod measurements;
pub mod notes;
pub mod todos;

// Re-export handlers for easier imports
pub use dashboard::{get_dashboard, list_optimizations};
pub use health::health_check;
pub use markers::{get_marker, get_marker_trend, list_grouped_markers, list_markers};
pub use measurements::{create_measurement, delete_measurement, get_measurement, list_measurements, update_measurement};
pub use notes::{create_marker_note, delete_note, list_marker_notes, update_note};
pub use todos::{create_measurement_todo, delete_todo, list_measurement_todos, update_todo};
