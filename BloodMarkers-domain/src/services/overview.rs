use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use uuid::Uuid;

use crate::entities::{
    BloodMarker, DashboardOverview, MarkerGroup, MarkerStatus, MarkerSummary, Measurement,
    OptimizationEvent, SortOrder, SummaryFilter, SummarySort, SummarySortKey,
};
use crate::services::status::classify_status;
use crate::services::trends::{compute_delta, sort_chronologically};

/// Maximum number of optimization events shown on the dashboard
pub const DASHBOARD_RECENT_EVENTS: usize = 5;

/// Bucket measurements per marker, each bucket in chronological order
pub fn index_by_marker(measurements: Vec<Measurement>) -> HashMap<Uuid, Vec<Measurement>> {
    let mut index: HashMap<Uuid, Vec<Measurement>> = HashMap::new();
    for measurement in measurements {
        index.entry(measurement.marker_id).or_default().push(measurement);
    }
    for series in index.values_mut() {
        sort_chronologically(series);
    }
    index
}

/// Summary of one marker from its chronologically ordered series
pub fn build_summary(marker: BloodMarker, series: &[Measurement]) -> MarkerSummary {
    let latest = series.last().cloned();
    let status = latest.as_ref().map(|m| classify_status(m.value, &marker.range));
    let delta = match series {
        [.., previous, current] => Some(compute_delta(previous, current, &marker.range)),
        _ => None,
    };

    MarkerSummary {
        marker,
        latest,
        status,
        delta,
        measurement_count: series.len(),
    }
}

pub fn build_summaries(
    markers: Vec<BloodMarker>,
    index: &HashMap<Uuid, Vec<Measurement>>,
) -> Vec<MarkerSummary> {
    markers
        .into_iter()
        .map(|marker| {
            let series = index.get(&marker.id).map(Vec::as_slice).unwrap_or(&[]);
            build_summary(marker, series)
        })
        .collect()
}

pub fn filter_summaries(summaries: Vec<MarkerSummary>, filter: &SummaryFilter) -> Vec<MarkerSummary> {
    summaries.into_iter().filter(|s| filter.matches(s)).collect()
}

fn name_cmp(a: &MarkerSummary, b: &MarkerSummary) -> Ordering {
    a.marker.name.to_lowercase().cmp(&b.marker.name.to_lowercase())
}

/// Out-of-range first, then normal, then unmeasured
fn status_rank(status: Option<MarkerStatus>) -> u8 {
    match status {
        Some(MarkerStatus::Low) | Some(MarkerStatus::High) => 0,
        Some(MarkerStatus::Normal) => 1,
        None => 2,
    }
}

fn apply_order(ordering: Ordering, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Stable sort; ties always fall back to the marker name ascending
pub fn sort_summaries(summaries: &mut [MarkerSummary], sort: SummarySort) {
    summaries.sort_by(|a, b| {
        let primary = match sort.key {
            SummarySortKey::Name => apply_order(name_cmp(a, b), sort.order),
            SummarySortKey::Category => apply_order(
                a.marker.category.to_lowercase().cmp(&b.marker.category.to_lowercase()),
                sort.order,
            ),
            SummarySortKey::Status => {
                apply_order(status_rank(a.status).cmp(&status_rank(b.status)), sort.order)
            },
            // Unmeasured markers trail in both directions
            SummarySortKey::LastMeasured => match (&a.latest, &b.latest) {
                (Some(x), Some(y)) => apply_order(x.measured_at.cmp(&y.measured_at), sort.order),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };

        primary.then_with(|| name_cmp(a, b))
    });
}

/// Categories alphabetically; members keep the incoming order
pub fn group_by_category(summaries: Vec<MarkerSummary>) -> Vec<MarkerGroup> {
    let mut groups: BTreeMap<String, Vec<MarkerSummary>> = BTreeMap::new();
    for summary in summaries {
        groups.entry(summary.marker.category.clone()).or_default().push(summary);
    }

    groups
        .into_iter()
        .map(|(category, markers)| MarkerGroup { category, markers })
        .collect()
}

/// `events` must already be newest first
pub fn build_dashboard(
    summaries: &[MarkerSummary],
    events: &[OptimizationEvent],
    open_todos: usize,
) -> DashboardOverview {
    let count = |status: MarkerStatus| summaries.iter().filter(|s| s.status == Some(status)).count();
    let measured_markers = summaries.iter().filter(|s| s.is_measured()).count();

    DashboardOverview {
        total_markers: summaries.len(),
        measured_markers,
        normal_count: count(MarkerStatus::Normal),
        high_count: count(MarkerStatus::High),
        low_count: count(MarkerStatus::Low),
        unmeasured_count: summaries.len() - measured_markers,
        total_measurements: summaries.iter().map(|s| s.measurement_count).sum(),
        open_todos,
        recent_optimizations: events.iter().take(DASHBOARD_RECENT_EVENTS).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ReferenceRange, StatusFilter};
    use chrono::{NaiveDate, Utc};

    fn marker(name: &str, category: &str, min: Option<f64>, max: Option<f64>) -> BloodMarker {
        BloodMarker {
            id: Uuid::new_v4(),
            name: name.into(),
            category: category.into(),
            unit: "u".into(),
            description: Some(format!("{} test", name)),
            range: ReferenceRange::new(min, max),
        }
    }

    fn measurement(marker: &BloodMarker, date: &str, value: f64) -> Measurement {
        let now = Utc::now();
        Measurement {
            id: Uuid::new_v4(),
            marker_id: marker.id,
            value,
            measured_at: date.parse::<NaiveDate>().unwrap(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Glucose high, Ferritin normal, TSH unmeasured, HDL low
    fn fixture() -> Vec<MarkerSummary> {
        let glucose = marker("Glucose", "Metabolic", Some(70.0), Some(99.0));
        let ferritin = marker("Ferritin", "Iron", Some(30.0), Some(400.0));
        let tsh = marker("TSH", "Thyroid", Some(0.4), Some(4.0));
        let hdl = marker("HDL Cholesterol", "Lipids", Some(40.0), None);

        let measurements = vec![
            measurement(&glucose, "2024-01-01", 95.0),
            measurement(&glucose, "2024-03-01", 104.0),
            measurement(&ferritin, "2024-02-01", 80.0),
            measurement(&hdl, "2024-04-01", 35.0),
        ];

        let index = index_by_marker(measurements);
        build_summaries(vec![glucose, ferritin, tsh, hdl], &index)
    }

    fn names(summaries: &[MarkerSummary]) -> Vec<&str> {
        summaries.iter().map(|s| s.marker.name.as_str()).collect()
    }

    #[test]
    fn test_summary_uses_latest_and_delta() {
        let summaries = fixture();
        let glucose = &summaries[0];

        assert_eq!(glucose.measurement_count, 2);
        assert_eq!(glucose.latest.as_ref().unwrap().value, 104.0);
        assert_eq!(glucose.status, Some(MarkerStatus::High));
        assert_eq!(glucose.delta.as_ref().unwrap().change, 9.0);

        let ferritin = &summaries[1];
        assert!(ferritin.delta.is_none());

        let tsh = &summaries[2];
        assert!(!tsh.is_measured());
        assert_eq!(tsh.status, None);
    }

    #[test]
    fn test_filters() {
        let out = filter_summaries(fixture(), &SummaryFilter {
            status: Some(StatusFilter::OutOfRange),
            ..SummaryFilter::default()
        });
        assert_eq!(names(&out), vec!["Glucose", "HDL Cholesterol"]);

        let unmeasured = filter_summaries(fixture(), &SummaryFilter {
            status: Some(StatusFilter::Unmeasured),
            ..SummaryFilter::default()
        });
        assert_eq!(names(&unmeasured), vec!["TSH"]);

        let by_category = filter_summaries(fixture(), &SummaryFilter {
            category: Some("lipids".into()),
            ..SummaryFilter::default()
        });
        assert_eq!(names(&by_category), vec!["HDL Cholesterol"]);

        let search = filter_summaries(fixture(), &SummaryFilter {
            search: Some("IRON".into()),
            ..SummaryFilter::default()
        });
        assert_eq!(names(&search), vec!["Ferritin"]);

        let measured = filter_summaries(fixture(), &SummaryFilter {
            measured_only: true,
            ..SummaryFilter::default()
        });
        assert_eq!(measured.len(), 3);
    }

    #[test]
    fn test_sort_by_status_then_name() {
        let mut summaries = fixture();
        sort_summaries(&mut summaries, SummarySort { key: SummarySortKey::Status, order: SortOrder::Asc });
        assert_eq!(names(&summaries), vec!["Glucose", "HDL Cholesterol", "Ferritin", "TSH"]);

        sort_summaries(&mut summaries, SummarySort { key: SummarySortKey::Status, order: SortOrder::Desc });
        assert_eq!(names(&summaries), vec!["TSH", "Ferritin", "Glucose", "HDL Cholesterol"]);
    }

    #[test]
    fn test_sort_by_last_measured_keeps_unmeasured_last() {
        let mut summaries = fixture();

        sort_summaries(&mut summaries, SummarySort { key: SummarySortKey::LastMeasured, order: SortOrder::Desc });
        assert_eq!(names(&summaries), vec!["HDL Cholesterol", "Glucose", "Ferritin", "TSH"]);

        sort_summaries(&mut summaries, SummarySort { key: SummarySortKey::LastMeasured, order: SortOrder::Asc });
        assert_eq!(names(&summaries), vec!["Ferritin", "Glucose", "HDL Cholesterol", "TSH"]);
    }

    #[test]
    fn test_group_by_category_preserves_member_order() {
        let mut summaries = fixture();
        summaries.push(build_summary(marker("LDL Cholesterol", "Lipids", None, Some(100.0)), &[]));
        sort_summaries(&mut summaries, SummarySort { key: SummarySortKey::Name, order: SortOrder::Desc });

        let groups = group_by_category(summaries);
        let categories: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(categories, vec!["Iron", "Lipids", "Metabolic", "Thyroid"]);
        assert_eq!(names(&groups[1].markers), vec!["LDL Cholesterol", "HDL Cholesterol"]);
    }

    #[test]
    fn test_dashboard_counts() {
        let dashboard = build_dashboard(&fixture(), &[], 3);

        assert_eq!(dashboard.total_markers, 4);
        assert_eq!(dashboard.measured_markers, 3);
        assert_eq!(dashboard.normal_count, 1);
        assert_eq!(dashboard.high_count, 1);
        assert_eq!(dashboard.low_count, 1);
        assert_eq!(dashboard.unmeasured_count, 1);
        assert_eq!(dashboard.total_measurements, 4);
        assert_eq!(dashboard.open_todos, 3);
        assert!(dashboard.recent_optimizations.is_empty());
    }

    fn event(name: &str, achieved_at: &str) -> OptimizationEvent {
        OptimizationEvent {
            marker_id: Uuid::new_v4(),
            marker_name: name.into(),
            category: "Test".into(),
            previous_measurement_id: Uuid::new_v4(),
            previous_value: 120.0,
            previous_status: MarkerStatus::High,
            previous_measured_at: "2023-12-01".parse().unwrap(),
            measurement_id: Uuid::new_v4(),
            value: 90.0,
            achieved_at: achieved_at.parse().unwrap(),
        }
    }

    #[test]
    fn test_dashboard_keeps_only_the_newest_events() {
        let mut events = vec![
            event("Iron", "2024-02-01"),
            event("Zinc", "2024-07-01"),
            event("TSH", "2024-03-01"),
            event("Ferritin", "2024-01-01"),
            event("Albumin", "2024-07-01"),
            event("Glucose", "2024-05-01"),
            event("Sodium", "2024-06-01"),
        ];
        crate::services::trends::sort_events_newest_first(&mut events);

        let dashboard = build_dashboard(&fixture(), &events, 0);
        let shown: Vec<&str> = dashboard
            .recent_optimizations
            .iter()
            .map(|e| e.marker_name.as_str())
            .collect();

        assert_eq!(shown.len(), DASHBOARD_RECENT_EVENTS);
        assert_eq!(shown, vec!["Albumin", "Zinc", "Sodium", "Glucose", "TSH"]);
    }
}
