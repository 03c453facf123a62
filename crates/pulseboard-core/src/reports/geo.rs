use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery, ReportRow};

use super::LAST_30_DAYS;

const PRECISION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryUsers {
    pub country: String,
    pub country_code: String,
    pub users: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoReport {
    pub countries: Vec<CountryUsers>,
    pub source: DataSource,
}

pub fn query() -> ReportQuery {
    ReportQuery::new()
        .date_range(LAST_30_DAYS.0, LAST_30_DAYS.1)
        .dimension("country")
        .dimension("countryId")
        .metric("totalUsers")
        .order_by_metric_desc("totalUsers")
}

pub fn reduce_rows(rows: &[ReportRow]) -> Vec<CountryUsers> {
    let categories = aggregate::reduce_rows(rows, "Unknown", PRECISION, str::to_string);
    rows.iter()
        .zip(categories)
        .map(|(row, c)| CountryUsers {
            country: c.label,
            country_code: row.dimension(1).unwrap_or("").to_string(),
            users: c.count,
            percentage: c.percentage,
        })
        .collect()
}

pub fn reduce(resolution: Resolution) -> GeoReport {
    let source = resolution.source();
    let countries = match resolution {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_rows(&rows),
        Resolution::Fallback => fixtures::countries(),
    };
    GeoReport { countries, source }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str) -> GeoReport {
    reduce(fallback::resolve(client, property_id, &query(), None).await)
}
