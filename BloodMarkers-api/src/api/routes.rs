use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, warn};

use blood_markers_data::repository::DataStore;
use blood_markers_domain::health::HealthService;
use blood_markers_domain::services::{MarkerService, MeasurementService, NoteService, Repositories, TodoService};

use crate::api::handlers::{
    self,
    health::SharedHealthService,
    markers::SharedMarkerService,
    measurements::SharedMeasurementService,
    notes::SharedNoteService,
    todos::SharedTodoService,
};
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Shared state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub markers: SharedMarkerService,
    pub measurements: SharedMeasurementService,
    pub notes: SharedNoteService,
    pub todos: SharedTodoService,
    pub health: SharedHealthService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Services on top of one store
    pub fn from_store(store: DataStore, health: SharedHealthService, config: AppConfig) -> Self {
        let repositories = Repositories::from_store(store);

        Self {
            markers: Arc::new(MarkerService::new(repositories.clone())),
            measurements: Arc::new(MeasurementService::new(repositories.clone())),
            notes: Arc::new(NoteService::new(repositories.clone())),
            todos: Arc::new(TodoService::new(repositories)),
            health,
            config: Arc::new(config),
        }
    }

    /// Services on the global database pool
    pub fn from_global_pool(config: AppConfig) -> Self {
        Self::from_store(
            DataStore::from_global_pool(),
            Arc::new(HealthService::from_global_pool()),
            config,
        )
    }

    /// Isolated in-memory state, used by tests and demos
    pub fn in_memory() -> Self {
        Self::from_store(DataStore::in_memory(), Arc::new(HealthService::new(None)), AppConfig::default())
    }
}

/// Create the application router
pub fn create_app(state: AppState) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        // Define specific routes before parametrized routes to avoid conflicts
        .route("/markers", get(handlers::list_markers))
        .route("/markers/grouped", get(handlers::list_grouped_markers))
        .route("/markers/:id", get(handlers::get_marker))
        .route("/markers/:id/trend", get(handlers::get_marker_trend))
        .route(
            "/markers/:id/notes",
            get(handlers::list_marker_notes).post(handlers::create_marker_note),
        )
        .route("/notes/:id", put(handlers::update_note).delete(handlers::delete_note))
        .route(
            "/measurements",
            get(handlers::list_measurements).post(handlers::create_measurement),
        )
        .route(
            "/measurements/:id",
            get(handlers::get_measurement)
                .put(handlers::update_measurement)
                .delete(handlers::delete_measurement),
        )
        .route(
            "/measurements/:id/todos",
            get(handlers::list_measurement_todos).post(handlers::create_measurement_todo),
        )
        .route("/todos/:id", put(handlers::update_todo).delete(handlers::delete_todo))
        .route("/optimizations", get(handlers::list_optimizations))
        .route("/dashboard", get(handlers::get_dashboard));

    debug!("API routes configured");

    let cors = cors_layer(&state.config.cors_allowed_origins);

    handlers::health::initialize_server_start_time();

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .merge(configure_swagger_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origins, or any origin when none are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    if allowed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(allowed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode}};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = create_app(AppState::in_memory());

        let response = app
            .oneshot(Request::builder().uri("/api/v1/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_configured_cors_origin_is_echoed() {
        let mut state = AppState::in_memory();
        state.config = Arc::new(AppConfig {
            cors_allowed_origins: vec!["http://localhost:5173".to_string()],
            ..AppConfig::default()
        });
        let app = create_app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("origin", "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
