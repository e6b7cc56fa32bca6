use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::marker::{BloodMarker, MarkerStatus};
use crate::services::status::classify_status;

/// A recorded value of one biomarker on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Measurement {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub value: f64,
    /// Date the blood sample was taken
    pub measured_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for recording a new measurement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct CreateMeasurementRequest {
    /// Marker the value belongs to
    pub marker_id: Uuid,

    #[validate(custom = "validate_measurement_value")]
    pub value: f64,

    /// Sample date, must not lie in the future
    #[validate(custom = "validate_not_in_future")]
    pub measured_at: NaiveDate,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Partial update of a measurement
///
/// An empty `notes` string clears the stored notes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct UpdateMeasurementRequest {
    #[validate(custom = "validate_measurement_value")]
    pub value: Option<f64>,

    #[validate(custom = "validate_not_in_future")]
    pub measured_at: Option<NaiveDate>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl UpdateMeasurementRequest {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.measured_at.is_none() && self.notes.is_none()
    }
}

/// Listing criteria for measurements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementQuery {
    pub marker_id: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Newest first unless explicitly `false`
    pub sort_desc: Option<bool>,
}

/// A measurement enriched with its marker's unit and the computed status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct AssessedMeasurement {
    pub id: Uuid,
    pub marker_id: Uuid,
    pub marker_name: String,
    pub value: f64,
    pub unit: String,
    pub status: MarkerStatus,
    pub measured_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssessedMeasurement {
    pub fn assess(measurement: Measurement, marker: &BloodMarker) -> Self {
        Self {
            status: classify_status(measurement.value, &marker.range),
            id: measurement.id,
            marker_id: measurement.marker_id,
            marker_name: marker.name.clone(),
            value: measurement.value,
            unit: marker.unit.clone(),
            measured_at: measurement.measured_at,
            notes: measurement.notes,
            created_at: measurement.created_at,
            updated_at: measurement.updated_at,
        }
    }
}

fn validation_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

pub(crate) fn validate_measurement_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(validation_error("not_finite", "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(validation_error("negative", "Value cannot be negative"));
    }
    Ok(())
}

pub(crate) fn validate_not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        return Err(validation_error("future_date", "Measurement date cannot be in the future"));
    }
    Ok(())
}
