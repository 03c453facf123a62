//! Monthly revenue split across plan tiers.
//!
//! The analytics property only reports total revenue per month; the plan
//! split is a fixed 40/30/30 estimate applied to that total.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery, ReportRow};

/// Months shown, the current one included.
pub const MONTHS: u32 = 7;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const FREE_SHARE: f64 = 0.4;
const BUSINESS_SHARE: f64 = 0.3;
const CUSTOM_SHARE: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenue {
    pub month: String,
    pub free_plan_revenue: i64,
    pub business_plan_revenue: i64,
    pub custom_plan_revenue: i64,
}

impl MonthlyRevenue {
    fn split(month: &str, total: f64) -> Self {
        Self {
            month: month.to_string(),
            free_plan_revenue: (total * FREE_SHARE).round() as i64,
            business_plan_revenue: (total * BUSINESS_SHARE).round() as i64,
            custom_plan_revenue: (total * CUSTOM_SHARE).round() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueReport {
    pub months: Vec<MonthlyRevenue>,
    pub source: DataSource,
}

/// `(year, month)` pairs for the window ending at `today`'s month, oldest first.
fn window(today: NaiveDate) -> Vec<(i32, u32)> {
    let current = today.year() * 12 + today.month0() as i32;
    (0..MONTHS as i32)
        .rev()
        .map(|back| {
            let index = current - back;
            (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
        })
        .collect()
}

pub fn query(today: NaiveDate) -> ReportQuery {
    let (year, month) = window(today)[0];
    ReportQuery::new()
        .date_range(format!("{year:04}-{month:02}-01"), "today")
        .dimension("yearMonth")
        .metric("totalRevenue")
        .order_by_dimension("yearMonth")
}

/// One entry per month of the window. Rows for the same month are summed;
/// months without rows are zero and rows outside the window are ignored.
pub fn reduce_rows(rows: &[ReportRow], today: NaiveDate) -> Vec<MonthlyRevenue> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for row in rows {
        if let Some(key) = row.dimension(0) {
            *totals.entry(key.trim()).or_default() += row.metric_f64(0);
        }
    }

    window(today)
        .into_iter()
        .map(|(year, month)| {
            let key = format!("{year:04}{month:02}");
            let total = totals.get(key.as_str()).copied().unwrap_or(0.0);
            MonthlyRevenue::split(MONTH_NAMES[(month - 1) as usize], total)
        })
        .collect()
}

pub fn reduce(resolution: Resolution, today: NaiveDate) -> RevenueReport {
    let source = resolution.source();
    let months = match resolution {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_rows(&rows, today),
        Resolution::Fallback => fixtures::revenue(),
    };
    RevenueReport { months, source }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str, today: NaiveDate) -> RevenueReport {
    reduce(
        fallback::resolve(client, property_id, &query(today), None).await,
        today,
    )
}
