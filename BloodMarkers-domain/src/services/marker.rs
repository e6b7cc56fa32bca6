use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use blood_markers_data::models::MeasurementFilter;

use crate::entities::conversions::{convert_to_domain_marker, convert_to_domain_measurement};
use crate::entities::{
    BloodMarker, DashboardOverview, MarkerGroup, MarkerSummary, MarkerTrend, Measurement, OptimizationEvent,
    SummaryFilter, SummarySort,
};
use crate::services::errors::ServiceError;
use crate::services::overview::{
    build_dashboard, build_summaries, build_summary, filter_summaries, group_by_category, index_by_marker,
    sort_summaries,
};
use crate::services::trends::{build_trend, detect_optimization_events, sort_events_newest_first};
use crate::services::Repositories;

/// Read side of the marker catalog and everything derived from measurements
#[async_trait]
pub trait MarkerServiceTrait: Send + Sync {
    /// All catalog markers ordered by name
    async fn list_markers(&self) -> Result<Vec<BloodMarker>, ServiceError>;

    async fn get_marker(&self, id: Uuid) -> Result<BloodMarker, ServiceError>;

    /// Filtered and sorted summaries of every marker
    async fn list_summaries(&self, filter: &SummaryFilter, sort: SummarySort)
        -> Result<Vec<MarkerSummary>, ServiceError>;

    /// Same as `list_summaries`, grouped by category
    async fn grouped_summaries(&self, filter: &SummaryFilter, sort: SummarySort)
        -> Result<Vec<MarkerGroup>, ServiceError>;

    async fn get_summary(&self, id: Uuid) -> Result<MarkerSummary, ServiceError>;

    /// Chronological series of one marker with statistics and optimization events
    async fn get_trend(&self, id: Uuid) -> Result<MarkerTrend, ServiceError>;

    /// Optimization events across all markers, newest first
    async fn optimization_events(&self) -> Result<Vec<OptimizationEvent>, ServiceError>;

    async fn dashboard(&self) -> Result<DashboardOverview, ServiceError>;
}

pub struct MarkerService {
    repositories: Repositories,
}

impl MarkerService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    async fn all_markers(&self) -> Result<Vec<BloodMarker>, ServiceError> {
        let markers = self.repositories.markers.get_all().await?;
        Ok(markers.into_iter().map(convert_to_domain_marker).collect())
    }

    async fn measurements_matching(&self, filter: MeasurementFilter) -> Result<Vec<Measurement>, ServiceError> {
        let (measurements, _) = self.repositories.measurements.get_filtered(&filter).await?;
        Ok(measurements.into_iter().map(convert_to_domain_measurement).collect())
    }

    async fn all_summaries(&self) -> Result<Vec<MarkerSummary>, ServiceError> {
        let markers = self.all_markers().await?;
        let index = index_by_marker(self.measurements_matching(MeasurementFilter::default()).await?);
        Ok(build_summaries(markers, &index))
    }

    async fn all_events(&self) -> Result<Vec<OptimizationEvent>, ServiceError> {
        let markers = self.all_markers().await?;
        let index = index_by_marker(self.measurements_matching(MeasurementFilter::default()).await?);

        let mut events: Vec<OptimizationEvent> = markers
            .iter()
            .filter_map(|marker| index.get(&marker.id).map(|series| detect_optimization_events(marker, series)))
            .flatten()
            .collect();
        sort_events_newest_first(&mut events);

        Ok(events)
    }
}

#[async_trait]
impl MarkerServiceTrait for MarkerService {
    async fn list_markers(&self) -> Result<Vec<BloodMarker>, ServiceError> {
        self.all_markers().await
    }

    async fn get_marker(&self, id: Uuid) -> Result<BloodMarker, ServiceError> {
        self.repositories
            .markers
            .get_by_id(id)
            .await?
            .map(convert_to_domain_marker)
            .ok_or_else(|| ServiceError::not_found("Marker", id))
    }

    async fn list_summaries(&self, filter: &SummaryFilter, sort: SummarySort)
        -> Result<Vec<MarkerSummary>, ServiceError>
    {
        debug!("Listing marker summaries: filter={:?}, sort={:?}", filter, sort);
        let mut summaries = filter_summaries(self.all_summaries().await?, filter);
        sort_summaries(&mut summaries, sort);
        Ok(summaries)
    }

    async fn grouped_summaries(&self, filter: &SummaryFilter, sort: SummarySort)
        -> Result<Vec<MarkerGroup>, ServiceError>
    {
        let summaries = self.list_summaries(filter, sort).await?;
        Ok(group_by_category(summaries))
    }

    async fn get_summary(&self, id: Uuid) -> Result<MarkerSummary, ServiceError> {
        let marker = self.get_marker(id).await?;
        let index = index_by_marker(self.measurements_matching(MeasurementFilter::for_marker(id)).await?);
        let series = index.get(&id).map(Vec::as_slice).unwrap_or(&[]);
        Ok(build_summary(marker, series))
    }

    async fn get_trend(&self, id: Uuid) -> Result<MarkerTrend, ServiceError> {
        let marker = self.get_marker(id).await?;
        let series = self.measurements_matching(MeasurementFilter::for_marker(id)).await?;
        Ok(build_trend(marker, series))
    }

    async fn optimization_events(&self) -> Result<Vec<OptimizationEvent>, ServiceError> {
        self.all_events().await
    }

    async fn dashboard(&self) -> Result<DashboardOverview, ServiceError> {
        let summaries = self.all_summaries().await?;
        let events = self.all_events().await?;
        let open_todos = self
            .repositories
            .todos
            .get_all()
            .await?
            .iter()
            .filter(|todo| !todo.completed)
            .count();

        let overview = build_dashboard(&summaries, &events, open_todos);
        info!(
            "Dashboard: {} of {} markers measured, {} open todos",
            overview.measured_markers, overview.total_markers, open_todos
        );
        Ok(overview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MarkerStatus, SortOrder, StatusFilter, SummarySortKey};
    use blood_markers_data::models::catalog::{marker_id_for_name, MARKER_CATALOG};
    use blood_markers_data::models::{CreateMeasurement, CreateTodo};

    async fn seeded() -> (MarkerService, Repositories) {
        let repos = Repositories::in_memory();
        let glucose = marker_id_for_name("Glucose");
        let ferritin = marker_id_for_name("Ferritin");

        for (marker_id, date, value) in [
            (glucose, "2024-01-05", 108.0),
            (glucose, "2024-04-05", 94.0),
            (ferritin, "2024-02-01", 22.0),
        ] {
            repos.measurements.create(CreateMeasurement {
                marker_id,
                value,
                measured_at: date.parse().unwrap(),
                notes: None,
            }).await.unwrap();
        }

        (MarkerService::new(repos.clone()), repos)
    }

    #[tokio::test]
    async fn test_list_markers_returns_catalog() {
        let (service, _) = seeded().await;
        assert_eq!(service.list_markers().await.unwrap().len(), MARKER_CATALOG.len());
    }

    #[tokio::test]
    async fn test_unknown_marker_is_not_found() {
        let (service, _) = seeded().await;
        let id = Uuid::new_v4();

        assert!(matches!(service.get_marker(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.get_trend(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.get_summary(id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_summaries_filtered_by_status() {
        let (service, _) = seeded().await;

        let low = service.list_summaries(
            &SummaryFilter { status: Some(StatusFilter::Low), ..SummaryFilter::default() },
            SummarySort::default(),
        ).await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].marker.name, "Ferritin");

        let measured = service.list_summaries(
            &SummaryFilter { measured_only: true, ..SummaryFilter::default() },
            SummarySort { key: SummarySortKey::Status, order: SortOrder::Asc },
        ).await.unwrap();
        let names: Vec<&str> = measured.iter().map(|s| s.marker.name.as_str()).collect();
        assert_eq!(names, vec!["Ferritin", "Glucose"]);
    }

    #[tokio::test]
    async fn test_trend_and_optimization_feed() {
        let (service, _) = seeded().await;
        let glucose = marker_id_for_name("Glucose");

        let trend = service.get_trend(glucose).await.unwrap();
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].status, MarkerStatus::High);
        assert_eq!(trend.optimization_events.len(), 1);

        let events = service.optimization_events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].marker_name, "Glucose");

        let summary = service.get_summary(glucose).await.unwrap();
        assert_eq!(summary.status, Some(MarkerStatus::Normal));
        assert_eq!(summary.delta.unwrap().change, -14.0);
    }

    #[tokio::test]
    async fn test_grouped_summaries_cover_all_categories() {
        let (service, _) = seeded().await;
        let groups = service.grouped_summaries(&SummaryFilter::default(), SummarySort::default()).await.unwrap();

        let total: usize = groups.iter().map(|g| g.markers.len()).sum();
        assert_eq!(total, MARKER_CATALOG.len());
        assert!(groups.windows(2).all(|w| w[0].category < w[1].category));
    }

    #[tokio::test]
    async fn test_dashboard() {
        let (service, repos) = seeded().await;
        let (measurements, _) = repos.measurements.get_filtered(&MeasurementFilter::default()).await.unwrap();
        repos.todos.create(CreateTodo {
            measurement_id: measurements[0].id,
            title: "Retest".into(),
        }).await.unwrap();

        let dashboard = service.dashboard().await.unwrap();
        assert_eq!(dashboard.total_markers, MARKER_CATALOG.len());
        assert_eq!(dashboard.measured_markers, 2);
        assert_eq!(dashboard.normal_count, 1);
        assert_eq!(dashboard.low_count, 1);
        assert_eq!(dashboard.total_measurements, 3);
        assert_eq!(dashboard.open_todos, 1);
        assert_eq!(dashboard.recent_optimizations.len(), 1);
    }
}
