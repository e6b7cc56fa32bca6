use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage model for a predefined biomarker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodMarker {
    /// Unique identifier for the marker
    pub id: Uuid,

    /// Display name, unique across the catalog
    pub name: String,

    /// Panel the marker belongs to (e.g., Lipids)
    pub category: String,

    /// Unit the values are recorded in
    pub unit: String,

    /// Optional short description
    pub description: Option<String>,

    /// Lower bound of the reference range
    pub min_value: Option<f64>,

    /// Upper bound of the reference range
    pub max_value: Option<f64>,
}
