use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use blood_markers_domain::entities::{
    AssessedMeasurement, BloodMarker, CreateMeasurementRequest, CreateNoteRequest, CreateTodoRequest,
    DashboardOverview, MarkerGroup, MarkerNote, MarkerStatus, MarkerSummary, MarkerTrend, Measurement,
    MeasurementDelta, MeasurementTodo, OptimizationEvent, ReferenceRange, SortOrder, StatusFilter,
    SummarySortKey, TrendDirection, TrendPoint, TrendStatistics, UpdateMeasurementRequest, UpdateNoteRequest,
    UpdateTodoRequest,
};

use crate::api::handlers;
use crate::entities::{ErrorResponse, MeasurementPage};

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,

        handlers::markers::list_markers,
        handlers::markers::list_grouped_markers,
        handlers::markers::get_marker,
        handlers::markers::get_marker_trend,

        handlers::notes::list_marker_notes,
        handlers::notes::create_marker_note,
        handlers::notes::update_note,
        handlers::notes::delete_note,

        handlers::measurements::list_measurements,
        handlers::measurements::create_measurement,
        handlers::measurements::get_measurement,
        handlers::measurements::update_measurement,
        handlers::measurements::delete_measurement,

        handlers::todos::list_measurement_todos,
        handlers::todos::create_measurement_todo,
        handlers::todos::update_todo,
        handlers::todos::delete_todo,

        handlers::dashboard::list_optimizations,
        handlers::dashboard::get_dashboard
    ),
    components(
        schemas(
            // Catalog and derived state
            BloodMarker,
            ReferenceRange,
            MarkerStatus,
            MarkerSummary,
            MarkerGroup,
            MarkerTrend,
            MeasurementDelta,
            TrendDirection,
            TrendPoint,
            TrendStatistics,
            OptimizationEvent,
            DashboardOverview,
            StatusFilter,
            SummarySortKey,
            SortOrder,

            // Measurements
            Measurement,
            AssessedMeasurement,
            CreateMeasurementRequest,
            UpdateMeasurementRequest,
            MeasurementPage,

            // Notes and todos
            MarkerNote,
            CreateNoteRequest,
            UpdateNoteRequest,
            MeasurementTodo,
            CreateTodoRequest,
            UpdateTodoRequest,

            // Common
            ErrorResponse,
            handlers::health::HealthResponse,
            handlers::health::ComponentStatus,
            handlers::health::ComponentHealthStatus
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "markers", description = "Biomarker catalog with current status and trends"),
        (name = "measurements", description = "Recorded blood test values"),
        (name = "notes", description = "Free-text notes on markers"),
        (name = "todos", description = "Follow-up goals on measurements"),
        (name = "dashboard", description = "Overview and optimization feed")
    ),
    info(
        title = "Blood Markers API",
        version = "0.1.0",
        description = "API for tracking blood test biomarkers against their reference ranges",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        ),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;
