use serde::Deserialize;
use utoipa::IntoParams;

use blood_markers_domain::entities::{
    SortOrder, StatusFilter, SummaryFilter, SummarySort, SummarySortKey,
};

/// Query parameters for marker listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MarkerListParams {
    /// normal, high, low, out_of_range or unmeasured
    pub status: Option<StatusFilter>,

    /// Exact category, case-insensitive
    pub category: Option<String>,

    /// Substring of name, category or description
    pub search: Option<String>,

    /// name (default), category, status or last_measured
    pub sort: Option<SummarySortKey>,

    /// asc (default) or desc
    pub order: Option<SortOrder>,

    /// Only markers with at least one measurement
    pub measured_only: Option<bool>,
}

impl MarkerListParams {
    pub fn filter(&self) -> SummaryFilter {
        SummaryFilter {
            status: self.status,
            category: self.category.clone(),
            search: self.search.clone(),
            measured_only: self.measured_only.unwrap_or(false),
        }
    }

    pub fn sort(&self) -> SummarySort {
        SummarySort {
            key: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        }
    }
}
