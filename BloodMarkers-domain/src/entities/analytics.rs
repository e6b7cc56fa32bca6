use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use super::marker::{BloodMarker, MarkerStatus};
use super::measurement::Measurement;

/// Direction of change between two consecutive measurements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Unchanged,
}

/// Change between two consecutive measurements of the same marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MeasurementDelta {
    pub previous_value: f64,
    pub current_value: f64,
    /// `current_value - previous_value`
    pub change: f64,
    /// Relative change in percent; absent when the previous value is zero
    pub percent_change: Option<f64>,
    pub direction: TrendDirection,
    pub previous_status: MarkerStatus,
    pub current_status: MarkerStatus,
}

/// One point of a marker's chronological series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TrendPoint {
    pub measurement_id: Uuid,
    pub measured_at: NaiveDate,
    pub value: f64,
    pub status: MarkerStatus,
    /// Change from the previous point; absent for the first one
    pub change: Option<f64>,
    pub direction: Option<TrendDirection>,
}

/// Aggregate figures over a marker's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct TrendStatistics {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub first_value: f64,
    pub latest_value: f64,
    pub net_change: f64,
}

/// An out-of-range value followed directly by a normal one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct OptimizationEvent {
    pub marker_id: Uuid,
    pub marker_name: String,
    pub category: String,
    pub previous_measurement_id: Uuid,
    pub previous_value: f64,
    pub previous_status: MarkerStatus,
    pub previous_measured_at: NaiveDate,
    pub measurement_id: Uuid,
    pub value: f64,
    /// Date of the first normal measurement
    pub achieved_at: NaiveDate,
}

/// Full history of one marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MarkerTrend {
    pub marker: BloodMarker,
    pub points: Vec<TrendPoint>,
    /// Absent when the marker has no measurements
    pub statistics: Option<TrendStatistics>,
    pub optimization_events: Vec<OptimizationEvent>,
}

/// Current state of one marker: latest value, status and last change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MarkerSummary {
    pub marker: BloodMarker,
    pub latest: Option<Measurement>,
    pub status: Option<MarkerStatus>,
    pub delta: Option<MeasurementDelta>,
    pub measurement_count: usize,
}

impl MarkerSummary {
    pub fn is_measured(&self) -> bool {
        self.latest.is_some()
    }
}

/// Markers of one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct MarkerGroup {
    pub category: String,
    pub markers: Vec<MarkerSummary>,
}

/// Status filter accepted by marker listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    Normal,
    High,
    Low,
    OutOfRange,
    Unmeasured,
}

impl StatusFilter {
    pub fn matches(&self, status: Option<MarkerStatus>) -> bool {
        match (self, status) {
            (StatusFilter::Normal, Some(MarkerStatus::Normal)) => true,
            (StatusFilter::High, Some(MarkerStatus::High)) => true,
            (StatusFilter::Low, Some(MarkerStatus::Low)) => true,
            (StatusFilter::OutOfRange, Some(status)) => status.is_out_of_range(),
            (StatusFilter::Unmeasured, None) => true,
            _ => false,
        }
    }
}

/// Criteria for narrowing a list of marker summaries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFilter {
    pub status: Option<StatusFilter>,
    /// Case-insensitive exact category match
    pub category: Option<String>,
    /// Case-insensitive substring over name, category and description
    pub search: Option<String>,
    pub measured_only: bool,
}

impl SummaryFilter {
    pub fn matches(&self, summary: &MarkerSummary) -> bool {
        if self.measured_only && !summary.is_measured() {
            return false;
        }

        if let Some(status) = self.status {
            if !status.matches(summary.status) {
                return false;
            }
        }

        let marker = &summary.marker;

        if let Some(category) = self.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            if !marker.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let found = marker.name.to_lowercase().contains(&needle)
                || marker.category.to_lowercase().contains(&needle)
                || marker
                    .description
                    .as_deref()
                    .map_or(false, |d| d.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SummarySortKey {
    #[default]
    Name,
    Category,
    Status,
    LastMeasured,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummarySort {
    pub key: SummarySortKey,
    pub order: SortOrder,
}

/// Headline numbers for the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct DashboardOverview {
    pub total_markers: usize,
    pub measured_markers: usize,
    pub normal_count: usize,
    pub high_count: usize,
    pub low_count: usize,
    pub unmeasured_count: usize,
    pub total_measurements: usize,
    pub open_todos: usize,
    /// Newest first
    pub recent_optimizations: Vec<OptimizationEvent>,
}
