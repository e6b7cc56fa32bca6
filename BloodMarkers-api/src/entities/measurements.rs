use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

use blood_markers_domain::entities::{MeasurementQuery, SortOrder};

/// Page size when `limit` is omitted
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Largest accepted `limit`
pub const MAX_PAGE_SIZE: usize = 1000;

/// Query parameters for measurement history
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeasurementListParams {
    /// Only measurements of this marker
    pub marker_id: Option<Uuid>,

    /// Inclusive lower bound, YYYY-MM-DD
    pub start_date: Option<NaiveDate>,

    /// Inclusive upper bound, YYYY-MM-DD
    pub end_date: Option<NaiveDate>,

    /// Maximum number of results (default: 100, max: 1000)
    pub limit: Option<usize>,

    /// Pagination offset (default: 0)
    pub offset: Option<usize>,

    /// Sort direction by date (asc/desc, default: desc)
    pub sort: Option<SortOrder>,
}

impl MeasurementListParams {
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    pub fn to_query(&self) -> MeasurementQuery {
        MeasurementQuery {
            marker_id: self.marker_id,
            start_date: self.start_date,
            end_date: self.end_date,
            limit: Some(self.limit()),
            offset: Some(self.offset()),
            sort_desc: Some(self.sort != Some(SortOrder::Asc)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_is_clamped() {
        let params = MeasurementListParams { limit: Some(5000), ..MeasurementListParams::default() };
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = MeasurementListParams { limit: Some(0), ..MeasurementListParams::default() };
        assert_eq!(params.limit(), 1);

        assert_eq!(MeasurementListParams::default().limit(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_query_defaults_to_newest_first() {
        assert_eq!(MeasurementListParams::default().to_query().sort_desc, Some(true));

        let ascending = MeasurementListParams { sort: Some(SortOrder::Asc), ..MeasurementListParams::default() };
        assert_eq!(ascending.to_query().sort_desc, Some(false));
    }
}
