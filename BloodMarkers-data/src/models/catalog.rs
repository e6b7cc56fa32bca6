//! Predefined biomarker catalog
//!
//! Every database (and the in-memory backend) is seeded with these markers.
//! Ids are UUID v5 values derived from the marker name, so a marker keeps
//! the same id across installs.

use uuid::Uuid;

use super::marker::BloodMarker;

/// Static definition of a catalog marker
#[derive(Debug, Clone, Copy)]
pub struct MarkerDefinition {
    pub name: &'static str,
    pub category: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl MarkerDefinition {
    /// Stable identifier for this definition
    pub fn id(&self) -> Uuid {
        marker_id_for_name(self.name)
    }

    /// Build the storage model
    pub fn to_marker(&self) -> BloodMarker {
        BloodMarker {
            id: self.id(),
            name: self.name.to_string(),
            category: self.category.to_string(),
            unit: self.unit.to_string(),
            description: Some(self.description.to_string()),
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }
}

/// Derive the catalog id for a marker name
pub fn marker_id_for_name(name: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("blood-marker:{}", name).as_bytes())
}

/// All predefined markers
pub fn predefined_markers() -> Vec<BloodMarker> {
    MARKER_CATALOG.iter().map(MarkerDefinition::to_marker).collect()
}

pub const MARKER_CATALOG: &[MarkerDefinition] = &[
    MarkerDefinition {
        name: "Glucose",
        category: "Metabolic",
        unit: "mg/dL",
        description: "Fasting blood sugar",
        min_value: Some(70.0),
        max_value: Some(99.0),
    },
    MarkerDefinition {
        name: "HbA1c",
        category: "Metabolic",
        unit: "%",
        description: "Average blood sugar over roughly three months",
        min_value: Some(4.0),
        max_value: Some(5.6),
    },
    MarkerDefinition {
        name: "Insulin",
        category: "Metabolic",
        unit: "µIU/mL",
        description: "Fasting insulin",
        min_value: Some(2.6),
        max_value: Some(24.9),
    },
    MarkerDefinition {
        name: "Total Cholesterol",
        category: "Lipids",
        unit: "mg/dL",
        description: "Sum of all cholesterol fractions",
        min_value: Some(125.0),
        max_value: Some(200.0),
    },
    MarkerDefinition {
        name: "LDL Cholesterol",
        category: "Lipids",
        unit: "mg/dL",
        description: "Low-density lipoprotein",
        min_value: None,
        max_value: Some(100.0),
    },
    MarkerDefinition {
        name: "HDL Cholesterol",
        category: "Lipids",
        unit: "mg/dL",
        description: "High-density lipoprotein",
        min_value: Some(40.0),
        max_value: None,
    },
    MarkerDefinition {
        name: "Triglycerides",
        category: "Lipids",
        unit: "mg/dL",
        description: "Fat circulating in the blood",
        min_value: None,
        max_value: Some(150.0),
    },
    MarkerDefinition {
        name: "Hemoglobin",
        category: "Blood Count",
        unit: "g/dL",
        description: "Oxygen-carrying protein in red blood cells",
        min_value: Some(12.0),
        max_value: Some(17.5),
    },
    MarkerDefinition {
        name: "Ferritin",
        category: "Iron",
        unit: "ng/mL",
        description: "Stored iron",
        min_value: Some(30.0),
        max_value: Some(400.0),
    },
    MarkerDefinition {
        name: "Iron",
        category: "Iron",
        unit: "µg/dL",
        description: "Serum iron",
        min_value: Some(60.0),
        max_value: Some(170.0),
    },
    MarkerDefinition {
        name: "Vitamin D",
        category: "Vitamins",
        unit: "ng/mL",
        description: "25-hydroxy vitamin D",
        min_value: Some(30.0),
        max_value: Some(100.0),
    },
    MarkerDefinition {
        name: "Vitamin B12",
        category: "Vitamins",
        unit: "pg/mL",
        description: "Cobalamin",
        min_value: Some(200.0),
        max_value: Some(900.0),
    },
    MarkerDefinition {
        name: "Magnesium",
        category: "Minerals",
        unit: "mg/dL",
        description: "Serum magnesium",
        min_value: Some(1.7),
        max_value: Some(2.2),
    },
    MarkerDefinition {
        name: "TSH",
        category: "Thyroid",
        unit: "mIU/L",
        description: "Thyroid-stimulating hormone",
        min_value: Some(0.4),
        max_value: Some(4.0),
    },
    MarkerDefinition {
        name: "Free T4",
        category: "Thyroid",
        unit: "ng/dL",
        description: "Unbound thyroxine",
        min_value: Some(0.8),
        max_value: Some(1.8),
    },
    MarkerDefinition {
        name: "Testosterone",
        category: "Hormones",
        unit: "ng/dL",
        description: "Total testosterone",
        min_value: Some(300.0),
        max_value: Some(1000.0),
    },
    MarkerDefinition {
        name: "Cortisol",
        category: "Hormones",
        unit: "µg/dL",
        description: "Morning cortisol",
        min_value: Some(6.0),
        max_value: Some(23.0),
    },
    MarkerDefinition {
        name: "hs-CRP",
        category: "Inflammation",
        unit: "mg/L",
        description: "High-sensitivity C-reactive protein",
        min_value: None,
        max_value: Some(3.0),
    },
    MarkerDefinition {
        name: "ALT",
        category: "Liver",
        unit: "U/L",
        description: "Alanine aminotransferase",
        min_value: Some(7.0),
        max_value: Some(56.0),
    },
    MarkerDefinition {
        name: "AST",
        category: "Liver",
        unit: "U/L",
        description: "Aspartate aminotransferase",
        min_value: Some(10.0),
        max_value: Some(40.0),
    },
    MarkerDefinition {
        name: "Creatinine",
        category: "Kidney",
        unit: "mg/dL",
        description: "Waste product filtered by the kidneys",
        min_value: Some(0.7),
        max_value: Some(1.3),
    },
    MarkerDefinition {
        name: "Uric Acid",
        category: "Kidney",
        unit: "mg/dL",
        description: "Purine breakdown product",
        min_value: Some(3.5),
        max_value: Some(7.2),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_and_ids_are_unique() {
        let names: HashSet<_> = MARKER_CATALOG.iter().map(|d| d.name).collect();
        let ids: HashSet<_> = MARKER_CATALOG.iter().map(|d| d.id()).collect();

        assert_eq!(names.len(), MARKER_CATALOG.len());
        assert_eq!(ids.len(), MARKER_CATALOG.len());
    }

    #[test]
    fn test_marker_ids_are_stable() {
        assert_eq!(marker_id_for_name("Glucose"), marker_id_for_name("Glucose"));
        assert_ne!(marker_id_for_name("Glucose"), marker_id_for_name("HbA1c"));
    }

    #[test]
    fn test_ranges_are_ordered() {
        for definition in MARKER_CATALOG {
            if let (Some(min), Some(max)) = (definition.min_value, definition.max_value) {
                assert!(min < max, "{} has an inverted range", definition.name);
            }
        }
    }
}
