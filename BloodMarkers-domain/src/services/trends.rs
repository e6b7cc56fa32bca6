use std::cmp::Ordering;

use crate::entities::{
    BloodMarker, MarkerTrend, Measurement, MeasurementDelta, OptimizationEvent, ReferenceRange,
    TrendDirection, TrendPoint, TrendStatistics,
};
use crate::services::status::classify_status;

/// Chronological order: sample date, then insertion time, then id
pub fn chronological_cmp(a: &Measurement, b: &Measurement) -> Ordering {
    a.measured_at
        .cmp(&b.measured_at)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_chronologically(measurements: &mut [Measurement]) {
    measurements.sort_by(chronological_cmp);
}

fn direction_of(change: f64) -> TrendDirection {
    if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Unchanged
    }
}

/// Change from `previous` to `current`, classified against `range`
pub fn compute_delta(previous: &Measurement, current: &Measurement, range: &ReferenceRange) -> MeasurementDelta {
    let change = current.value - previous.value;
    let percent_change = if previous.value == 0.0 {
        None
    } else {
        Some(change / previous.value.abs() * 100.0)
    };

    MeasurementDelta {
        previous_value: previous.value,
        current_value: current.value,
        change,
        percent_change,
        direction: direction_of(change),
        previous_status: classify_status(previous.value, range),
        current_status: classify_status(current.value, range),
    }
}

/// Optimization events of one marker, oldest first
///
/// `measurements` must already be in chronological order.
pub fn detect_optimization_events(marker: &BloodMarker, measurements: &[Measurement]) -> Vec<OptimizationEvent> {
    measurements
        .windows(2)
        .filter_map(|pair| {
            let (previous, current) = (&pair[0], &pair[1]);
            let previous_status = classify_status(previous.value, &marker.range);
            let current_status = classify_status(current.value, &marker.range);

            if !previous_status.is_out_of_range() || current_status.is_out_of_range() {
                return None;
            }

            Some(OptimizationEvent {
                marker_id: marker.id,
                marker_name: marker.name.clone(),
                category: marker.category.clone(),
                previous_measurement_id: previous.id,
                previous_value: previous.value,
                previous_status,
                previous_measured_at: previous.measured_at,
                measurement_id: current.id,
                value: current.value,
                achieved_at: current.measured_at,
            })
        })
        .collect()
}

/// Newest first; same-day events fall back to marker name
pub fn sort_events_newest_first(events: &mut [OptimizationEvent]) {
    events.sort_by(|a, b| {
        b.achieved_at
            .cmp(&a.achieved_at)
            .then_with(|| a.marker_name.to_lowercase().cmp(&b.marker_name.to_lowercase()))
    });
}

fn statistics(measurements: &[Measurement]) -> Option<TrendStatistics> {
    let first = measurements.first()?;
    let latest = measurements.last()?;

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for m in measurements {
        min = min.min(m.value);
        max = max.max(m.value);
        sum += m.value;
    }

    Some(TrendStatistics {
        count: measurements.len(),
        min,
        max,
        average: sum / measurements.len() as f64,
        first_value: first.value,
        latest_value: latest.value,
        net_change: latest.value - first.value,
    })
}

/// Full chronological series of a marker with per-point changes
pub fn build_trend(marker: BloodMarker, mut measurements: Vec<Measurement>) -> MarkerTrend {
    sort_chronologically(&mut measurements);

    let points = measurements
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let change = i.checked_sub(1).map(|p| m.value - measurements[p].value);
            TrendPoint {
                measurement_id: m.id,
                measured_at: m.measured_at,
                value: m.value,
                status: classify_status(m.value, &marker.range),
                change,
                direction: change.map(direction_of),
            }
        })
        .collect();

    let optimization_events = detect_optimization_events(&marker, &measurements);

    MarkerTrend {
        statistics: statistics(&measurements),
        points,
        optimization_events,
        marker,
    }
}
