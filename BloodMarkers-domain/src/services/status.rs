use crate::entities::{MarkerStatus, ReferenceRange};

/// Classify a value against a reference range.
///
/// Both bounds are inclusive and a missing bound never triggers its side, so
/// a marker without any bounds reports every value as normal.
pub fn classify_status(value: f64, range: &ReferenceRange) -> MarkerStatus {
    if let Some(min) = range.min {
        if value < min {
            return MarkerStatus::Low;
        }
    }

    if let Some(max) = range.max {
        if value > max {
            return MarkerStatus::High;
        }
    }

    MarkerStatus::Normal
}
