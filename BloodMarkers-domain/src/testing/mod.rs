// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

pub use blood_markers_data::models::catalog::marker_id_for_name;
use blood_markers_data::models::CreateMeasurement;

use crate::entities::{
    BloodMarker, DashboardOverview, MarkerGroup, MarkerSummary, MarkerTrend,
    OptimizationEvent, SummaryFilter, SummarySort,
};
use crate::services::{MarkerServiceTrait, Repositories, ServiceError};

fn parse_date(date: &str) -> NaiveDate {
    date.parse().unwrap_or_else(|e| panic!("invalid fixture date {}: {}", date, e))
}

/// Store `(marker name, date, value)` rows directly, bypassing validation
pub async fn seed_measurements(repositories: &Repositories, rows: &[(&str, &str, f64)]) -> Vec<Uuid> {
    let mut ids = Vec::with_capacity(rows.len());
    for (marker, date, value) in rows {
        let created = repositories
            .measurements
            .create(CreateMeasurement {
                marker_id: marker_id_for_name(marker),
                value: *value,
                measured_at: parse_date(date),
                notes: None,
            })
            .await
            .unwrap_or_else(|e| panic!("failed to seed {} measurement: {}", marker, e));
        ids.push(created.id);
    }
    ids
}

/// Marker service whose storage is always down
#[derive(Debug, Default)]
pub struct UnavailableMarkerService;

impl UnavailableMarkerService {
    fn failure<T>() -> Result<T, ServiceError> {
        Err(ServiceError::RepositoryError("storage unavailable".to_string()))
    }
}

#[async_trait]
impl MarkerServiceTrait for UnavailableMarkerService {
    async fn list_markers(&self) -> Result<Vec<BloodMarker>, ServiceError> {
        Self::failure()
    }

    async fn get_marker(&self, _id: Uuid) -> Result<BloodMarker, ServiceError> {
        Self::failure()
    }

    async fn list_summaries(&self, _filter: &SummaryFilter, _sort: SummarySort)
        -> Result<Vec<MarkerSummary>, ServiceError>
    {
        Self::failure()
    }

    async fn grouped_summaries(&self, _filter: &SummaryFilter, _sort: SummarySort)
        -> Result<Vec<MarkerGroup>, ServiceError>
    {
        Self::failure()
    }

    async fn get_summary(&self, _id: Uuid) -> Result<MarkerSummary, ServiceError> {
        Self::failure()
    }

    async fn get_trend(&self, _id: Uuid) -> Result<MarkerTrend, ServiceError> {
        Self::failure()
    }

    async fn optimization_events(&self) -> Result<Vec<OptimizationEvent>, ServiceError> {
        Self::failure()
    }

    async fn dashboard(&self) -> Result<DashboardOverview, ServiceError> {
        Self::failure()
    }
}
