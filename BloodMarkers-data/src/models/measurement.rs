use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Storage model for a measurement recorded against a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique identifier for the measurement
    pub id: Uuid,

    /// Marker the value belongs to
    pub marker_id: Uuid,

    /// Measured value in the marker's unit
    pub value: f64,

    /// Date the blood sample was taken
    pub measured_at: NaiveDate,

    /// Optional free-text notes
    pub notes: Option<String>,

    /// When the row was created
    pub created_at: DateTime<Utc>,

    /// When the row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMeasurement {
    pub marker_id: Uuid,
    pub value: f64,
    pub measured_at: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update of a measurement. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMeasurement {
    pub value: Option<f64>,
    pub measured_at: Option<NaiveDate>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

/// Filter and pagination options for listing measurements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementFilter {
    /// Only measurements of this marker
    pub marker_id: Option<Uuid>,

    /// Inclusive lower date bound
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper date bound
    pub end_date: Option<NaiveDate>,

    /// Maximum number of rows to return
    pub limit: Option<usize>,

    /// Number of rows to skip
    pub offset: Option<usize>,

    /// Newest first when true (default)
    pub sort_desc: Option<bool>,
}

impl MeasurementFilter {
    /// Filter matching every measurement of one marker
    pub fn for_marker(marker_id: Uuid) -> Self {
        Self {
            marker_id: Some(marker_id),
            ..Self::default()
        }
    }

    /// Check whether a measurement passes the marker and date constraints
    pub fn matches(&self, measurement: &Measurement) -> bool {
        if let Some(marker_id) = self.marker_id {
            if measurement.marker_id != marker_id {
                return false;
            }
        }

        if let Some(start) = self.start_date {
            if measurement.measured_at < start {
                return false;
            }
        }

        if let Some(end) = self.end_date {
            if measurement.measured_at > end {
                return false;
            }
        }

        true
    }
}
