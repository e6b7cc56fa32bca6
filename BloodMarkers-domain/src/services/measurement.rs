use async_trait::async_trait;
use tracing::{debug, error, info};
use uuid::Uuid;
use validator::Validate;

use crate::entities::conversions::{
    convert_to_data_create_measurement, convert_to_data_measurement_filter, convert_to_data_update_measurement,
    convert_to_domain_marker, convert_to_domain_measurement,
};
use crate::entities::{
    AssessedMeasurement, BloodMarker, CreateMeasurementRequest, MeasurementQuery, UpdateMeasurementRequest,
};
use crate::services::errors::ServiceError;
use crate::services::Repositories;

/// Trait for measurement operations
#[async_trait]
pub trait MeasurementServiceTrait: Send + Sync {
    /// Validate a create request without storing anything
    fn validate_create_request(&self, request: &CreateMeasurementRequest) -> Result<(), ServiceError>;

    async fn create_measurement(&self, request: CreateMeasurementRequest)
        -> Result<AssessedMeasurement, ServiceError>;

    async fn update_measurement(&self, id: Uuid, request: UpdateMeasurementRequest)
        -> Result<AssessedMeasurement, ServiceError>;

    /// Delete a measurement together with its todos
    async fn delete_measurement(&self, id: Uuid) -> Result<(), ServiceError>;

    async fn get_measurement(&self, id: Uuid) -> Result<AssessedMeasurement, ServiceError>;

    /// One page of measurements plus the total number of matches
    async fn list_measurements(&self, query: &MeasurementQuery)
        -> Result<(Vec<AssessedMeasurement>, usize), ServiceError>;
}

pub struct MeasurementService {
    repositories: Repositories,
}

impl MeasurementService {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    async fn marker(&self, id: Uuid) -> Result<BloodMarker, ServiceError> {
        self.repositories
            .markers
            .get_by_id(id)
            .await?
            .map(convert_to_domain_marker)
            .ok_or_else(|| ServiceError::not_found("Marker", id))
    }
}

#[async_trait]
impl MeasurementServiceTrait for MeasurementService {
    fn validate_create_request(&self, request: &CreateMeasurementRequest) -> Result<(), ServiceError> {
        request.validate()?;
        Ok(())
    }

    async fn create_measurement(&self, request: CreateMeasurementRequest)
        -> Result<AssessedMeasurement, ServiceError>
    {
        self.validate_create_request(&request)?;
        let marker = self.marker(request.marker_id).await?;

        let created = self
            .repositories
            .measurements
            .create(convert_to_data_create_measurement(request))
            .await
            .map_err(|e| {
                error!("Failed to store measurement: {}", e);
                ServiceError::from(e)
            })?;

        info!("Recorded {} = {} {} on {}", marker.name, created.value, marker.unit, created.measured_at);
        Ok(AssessedMeasurement::assess(convert_to_domain_measurement(created), &marker))
    }

    async fn update_measurement(&self, id: Uuid, request: UpdateMeasurementRequest)
        -> Result<AssessedMeasurement, ServiceError>
    {
        request.validate()?;
        if request.is_empty() {
            return Err(ServiceError::ValidationError("No fields to update".to_string()));
        }

        let updated = self
            .repositories
            .measurements
            .update(id, convert_to_data_update_measurement(request))
            .await?
            .ok_or_else(|| ServiceError::not_found("Measurement", id))?;

        let marker = self.marker(updated.marker_id).await?;
        debug!("Updated measurement {}", id);
        Ok(AssessedMeasurement::assess(convert_to_domain_measurement(updated), &marker))
    }

    async fn delete_measurement(&self, id: Uuid) -> Result<(), ServiceError> {
        if !self.repositories.measurements.delete(id).await? {
            return Err(ServiceError::not_found("Measurement", id));
        }
        info!("Deleted measurement {}", id);
        Ok(())
    }

    async fn get_measurement(&self, id: Uuid) -> Result<AssessedMeasurement, ServiceError> {
        let measurement = self
            .repositories
            .measurements
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Measurement", id))?;

        let marker = self.marker(measurement.marker_id).await?;
        Ok(AssessedMeasurement::assess(convert_to_domain_measurement(measurement), &marker))
    }

    async fn list_measurements(&self, query: &MeasurementQuery)
        -> Result<(Vec<AssessedMeasurement>, usize), ServiceError>
    {
        if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
            if start > end {
                return Err(ServiceError::ValidationError(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }

        if let Some(marker_id) = query.marker_id {
            self.marker(marker_id).await?;
        }

        let (measurements, total) = self
            .repositories
            .measurements
            .get_filtered(&convert_to_data_measurement_filter(query))
            .await?;

        let markers: Vec<BloodMarker> = self
            .repositories
            .markers
            .get_all()
            .await?
            .into_iter()
            .map(convert_to_domain_marker)
            .collect();

        let assessed = measurements
            .into_iter()
            .map(|m| {
                let marker = markers
                    .iter()
                    .find(|marker| marker.id == m.marker_id)
                    .ok_or_else(|| ServiceError::not_found("Marker", m.marker_id))?;
                Ok(AssessedMeasurement::assess(convert_to_domain_measurement(m), marker))
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        Ok((assessed, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MarkerStatus;
    use blood_markers_data::models::catalog::marker_id_for_name;
    use chrono::{Duration, NaiveDate, Utc};

    fn service() -> MeasurementService {
        MeasurementService::new(Repositories::in_memory())
    }

    fn request(marker: &str, date: &str, value: f64) -> CreateMeasurementRequest {
        CreateMeasurementRequest {
            marker_id: marker_id_for_name(marker),
            value,
            measured_at: date.parse::<NaiveDate>().unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_create_assesses_status() {
        let service = service();

        let created = service.create_measurement(request("LDL Cholesterol", "2024-02-10", 131.0)).await.unwrap();
        assert_eq!(created.status, MarkerStatus::High);
        assert_eq!(created.unit, "mg/dL");
        assert_eq!(created.marker_name, "LDL Cholesterol");

        let fetched = service.get_measurement(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let service = service();

        let negative = service.create_measurement(request("Glucose", "2024-01-01", -3.0)).await;
        assert!(matches!(negative, Err(ServiceError::ValidationError(_))));

        let future = Utc::now().date_naive() + Duration::days(2);
        let mut ahead = request("Glucose", "2024-01-01", 90.0);
        ahead.measured_at = future;
        assert!(matches!(service.create_measurement(ahead).await, Err(ServiceError::ValidationError(_))));

        let mut unknown = request("Glucose", "2024-01-01", 90.0);
        unknown.marker_id = Uuid::new_v4();
        assert!(matches!(service.create_measurement(unknown).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_recomputes_status() {
        let service = service();
        let created = service.create_measurement(request("Vitamin D", "2024-01-01", 18.0)).await.unwrap();
        assert_eq!(created.status, MarkerStatus::Low);

        let updated = service.update_measurement(created.id, UpdateMeasurementRequest {
            value: Some(41.0),
            ..UpdateMeasurementRequest::default()
        }).await.unwrap();
        assert_eq!(updated.status, MarkerStatus::Normal);
        assert_eq!(updated.measured_at, created.measured_at);

        let empty = service.update_measurement(created.id, UpdateMeasurementRequest::default()).await;
        assert!(matches!(empty, Err(ServiceError::ValidationError(_))));

        let missing = service.update_measurement(Uuid::new_v4(), UpdateMeasurementRequest {
            value: Some(1.0),
            ..UpdateMeasurementRequest::default()
        }).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = service();
        let created = service.create_measurement(request("TSH", "2024-01-01", 2.1)).await.unwrap();

        service.delete_measurement(created.id).await.unwrap();
        assert!(matches!(service.delete_measurement(created.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.get_measurement(created.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_pagination_and_range_checks() {
        let service = service();
        for (date, value) in [("2024-01-01", 101.0), ("2024-02-01", 97.0), ("2024-03-01", 93.0)] {
            service.create_measurement(request("Glucose", date, value)).await.unwrap();
        }
        service.create_measurement(request("Ferritin", "2024-03-01", 60.0)).await.unwrap();

        let query = MeasurementQuery {
            marker_id: Some(marker_id_for_name("Glucose")),
            limit: Some(2),
            ..MeasurementQuery::default()
        };
        let (page, total) = service.list_measurements(&query).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].value, 93.0, "newest first by default");

        let inverted = MeasurementQuery {
            start_date: Some("2024-03-01".parse().unwrap()),
            end_date: Some("2024-01-01".parse().unwrap()),
            ..MeasurementQuery::default()
        };
        assert!(matches!(service.list_measurements(&inverted).await, Err(ServiceError::ValidationError(_))));

        let unknown = MeasurementQuery { marker_id: Some(Uuid::new_v4()), ..MeasurementQuery::default() };
        assert!(matches!(service.list_measurements(&unknown).await, Err(ServiceError::NotFound(_))));
    }
}
