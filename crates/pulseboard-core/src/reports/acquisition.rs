use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery, ReportRow};

use super::LAST_30_DAYS;

const PRECISION: u32 = 0;
const ROW_LIMIT: u32 = 6;
const OTHER: &str = "(other)";
const OTHER_COLOR: &str = "#94a3b8";

const CHANNEL_COLORS: &[(&str, &str)] = &[
    ("organic_search", "#4ade80"),
    ("direct", "#60a5fa"),
    ("social", "#f472b6"),
    ("referral", "#fbbf24"),
    ("email", "#a78bfa"),
    ("paid_search", "#f97316"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUsers {
    pub source: String,
    pub users: u64,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionReport {
    pub sources: Vec<SourceUsers>,
    pub source: DataSource,
}

pub fn primary_query() -> ReportQuery {
    by_dimension("sessionDefaultChannelGroup")
}

pub fn alternate_query() -> ReportQuery {
    by_dimension("sessionSource")
}

fn by_dimension(dimension: &str) -> ReportQuery {
    ReportQuery::new()
        .date_range(LAST_30_DAYS.0, LAST_30_DAYS.1)
        .dimension(dimension)
        .metric("totalUsers")
        .order_by_metric_desc("totalUsers")
        .limit(ROW_LIMIT)
}

/// Chart colour for a raw channel name. `Organic Search` and
/// `organic_search` map to the same entry.
pub fn channel_color(raw: &str) -> &'static str {
    let key = raw
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    CHANNEL_COLORS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, color)| *color)
        .unwrap_or(OTHER_COLOR)
}

pub fn reduce_rows(rows: &[ReportRow]) -> Vec<SourceUsers> {
    let categories = aggregate::reduce_rows(rows, OTHER, PRECISION, aggregate::title_case);
    rows.iter()
        .zip(categories)
        .map(|(row, c)| SourceUsers {
            color: channel_color(row.dimension(0).unwrap_or(OTHER)).to_string(),
            source: c.label,
            users: c.count,
            percentage: c.percentage,
        })
        .collect()
}

pub fn reduce(resolution: Resolution) -> AcquisitionReport {
    let source = resolution.source();
    let sources = match resolution {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_rows(&rows),
        Resolution::Fallback => fixtures::sources(),
    };
    AcquisitionReport { sources, source }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str) -> AcquisitionReport {
    let resolution = fallback::resolve(
        client,
        property_id,
        &primary_query(),
        Some(&alternate_query()),
    )
    .await;
    reduce(resolution)
}
