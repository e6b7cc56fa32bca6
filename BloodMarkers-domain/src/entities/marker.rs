use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// Inclusive reference range of a biomarker; either side may be open
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ReferenceRange {
    /// Lowest value still considered normal
    pub min: Option<f64>,
    /// Highest value still considered normal
    pub max: Option<f64>,
}

impl ReferenceRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// A biomarker from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct BloodMarker {
    pub id: Uuid,
    pub name: String,
    /// Grouping category, e.g. "Lipids"
    pub category: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub range: ReferenceRange,
}

/// Status of a value against its marker's reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MarkerStatus {
    Low,
    Normal,
    High,
}

impl MarkerStatus {
    /// Low and High are both outside the reference range
    pub fn is_out_of_range(&self) -> bool {
        !matches!(self, MarkerStatus::Normal)
    }
}

impl fmt::Display for MarkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MarkerStatus::Low => "low",
            MarkerStatus::Normal => "normal",
            MarkerStatus::High => "high",
        };
        write!(f, "{}", label)
    }
}
