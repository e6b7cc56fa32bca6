// Public entities for the Blood Markers API
// Request and response bodies come from the domain crate; this module holds
// the HTTP-only shapes: query parameters, pagination and errors.

pub mod common;
pub mod markers;
pub mod measurements;

pub use common::{ErrorResponse, MeasurementPage, PaginatedResponse};
pub use markers::MarkerListParams;
pub use measurements::MeasurementListParams;
