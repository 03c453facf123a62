use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery, ReportRow};

use super::LAST_30_DAYS;

const PRECISION: u32 = 1;
const ROW_LIMIT: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageViews {
    pub page_path: String,
    pub page_title: String,
    pub pageviews: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagesReport {
    pub pages: Vec<PageViews>,
    pub source: DataSource,
}

pub fn query() -> ReportQuery {
    ReportQuery::new()
        .date_range(LAST_30_DAYS.0, LAST_30_DAYS.1)
        .dimension("pagePath")
        .dimension("pageTitle")
        .metric("screenPageViews")
        .order_by_metric_desc("screenPageViews")
        .limit(ROW_LIMIT)
}

pub fn reduce_rows(rows: &[ReportRow]) -> Vec<PageViews> {
    let categories = aggregate::reduce_rows(rows, "", PRECISION, str::to_string);
    rows.iter()
        .zip(categories)
        .map(|(row, c)| PageViews {
            page_path: c.label,
            page_title: row.dimension(1).unwrap_or("Unknown Page").to_string(),
            pageviews: c.count,
            percentage: c.percentage,
        })
        .collect()
}

pub fn reduce(resolution: Resolution) -> PagesReport {
    let source = resolution.source();
    let pages = match resolution {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_rows(&rows),
        Resolution::Fallback => fixtures::pages(),
    };
    PagesReport { pages, source }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str) -> PagesReport {
    reduce(fallback::resolve(client, property_id, &query(), None).await)
}
