// Domain entities and value objects
pub mod analytics;
pub mod conversions;
pub mod marker;
pub mod measurement;
pub mod note;
pub mod todo;

// Re-export common types for easier imports
pub use analytics::{
    DashboardOverview, MarkerGroup, MarkerSummary, MarkerTrend, MeasurementDelta, OptimizationEvent,
    SortOrder, StatusFilter, SummaryFilter, SummarySort, SummarySortKey, TrendDirection, TrendPoint,
    TrendStatistics,
};
pub use marker::{BloodMarker, MarkerStatus, ReferenceRange};
pub use measurement::{
    AssessedMeasurement, CreateMeasurementRequest, Measurement, MeasurementQuery, UpdateMeasurementRequest,
};
pub use note::{CreateNoteRequest, MarkerNote, UpdateNoteRequest};
pub use todo::{CreateTodoRequest, MeasurementTodo, UpdateTodoRequest};

use std::borrow::Cow;
use validator::ValidationError;

/// Rejects text that is empty after trimming
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Value cannot be blank"));
        return Err(error);
    }
    Ok(())
}
