//! Composite overview: daily users, period-over-period cards and engagement.
//!
//! The three sections come from independent queries issued concurrently.
//! Each degrades on its own: the series to empty, the cards to zeros and the
//! engagement rate to its fixture.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{avg_session_duration, change_percent};
use crate::fallback::{self, DataSource, Resolution};
use crate::fixtures;
use crate::report::{ReportClient, ReportQuery, ReportRow};

use super::LAST_30_DAYS;

const CURRENT_PERIOD: &str = "date_range_0";
const PREVIOUS_PERIOD: &str = "date_range_1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsers {
    pub date: String,
    pub active_users: u64,
    pub new_users: u64,
}

/// A value for the current and previous period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current: f64,
    pub previous: f64,
    pub change_percent: f64,
}

impl PeriodComparison {
    pub fn new(current: f64, previous: f64) -> Self {
        Self {
            current,
            previous,
            change_percent: change_percent(current, previous),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayMetrics {
    pub total_users: PeriodComparison,
    pub active_users: PeriodComparison,
    pub avg_session_duration: PeriodComparison,
    pub transactions: PeriodComparison,
}

pub type EngagementRate = PeriodComparison;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSources {
    pub daily_users: DataSource,
    pub today_metrics: DataSource,
    pub engagement_rate: DataSource,
}

impl SectionSources {
    pub fn overall(&self) -> DataSource {
        self.daily_users
            .merge(self.today_metrics)
            .merge(self.engagement_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewReport {
    pub daily_users: Vec<DailyUsers>,
    pub today_metrics: TodayMetrics,
    pub engagement_rate: EngagementRate,
    pub sources: SectionSources,
}

pub fn daily_query() -> ReportQuery {
    ReportQuery::new()
        .date_range(LAST_30_DAYS.0, LAST_30_DAYS.1)
        .dimension("date")
        .metric("activeUsers")
        .metric("newUsers")
        .order_by_dimension("date")
}

/// Last 7 days against the 7 days before.
pub fn overall_query() -> ReportQuery {
    ReportQuery::new()
        .date_range("7daysAgo", "today")
        .date_range("14daysAgo", "8daysAgo")
        .metric("totalUsers")
        .metric("activeUsers")
        .metric("userEngagementDuration")
        .metric("sessions")
        .metric("conversions")
}

/// Last 30 days against the 30 days before.
pub fn engagement_query() -> ReportQuery {
    ReportQuery::new()
        .date_range("30daysAgo", "today")
        .date_range("60daysAgo", "31daysAgo")
        .metric("engagementRate")
}

/// GA reports `20250301`; anything else is passed through unchanged.
fn format_date(raw: &str) -> String {
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub fn reduce_daily(rows: &[ReportRow]) -> Vec<DailyUsers> {
    rows.iter()
        .map(|row| DailyUsers {
            date: format_date(row.dimension(0).unwrap_or("")),
            active_users: row.metric_count(0),
            new_users: row.metric_count(1),
        })
        .collect()
}

/// Pick the current and previous period rows.
///
/// Multi-range reports tag rows with a `dateRange` dimension; when no row
/// carries one, rows are taken positionally.
pub fn split_periods(rows: &[ReportRow]) -> (Option<&ReportRow>, Option<&ReportRow>) {
    let tagged = |name: &str| {
        rows.iter()
            .find(|row| row.dimension_values.iter().any(|v| v == name))
    };
    let any_tagged = rows.iter().any(|row| {
        row.dimension_values
            .iter()
            .any(|v| v.starts_with("date_range_"))
    });
    if any_tagged {
        (tagged(CURRENT_PERIOD), tagged(PREVIOUS_PERIOD))
    } else {
        (rows.first(), rows.get(1))
    }
}

pub fn reduce_today_metrics(rows: &[ReportRow]) -> TodayMetrics {
    let (current, previous) = split_periods(rows);
    let read = |row: Option<&ReportRow>| {
        let row = row.cloned().unwrap_or_default();
        (
            row.metric_i64(0) as f64,
            row.metric_i64(1) as f64,
            avg_session_duration(row.metric_f64(2), row.metric_i64(3)),
            row.metric_i64(4) as f64,
        )
    };
    let (users, active, duration, transactions) = read(current);
    let (prev_users, prev_active, prev_duration, prev_transactions) = read(previous);

    TodayMetrics {
        total_users: PeriodComparison::new(users, prev_users),
        active_users: PeriodComparison::new(active, prev_active),
        avg_session_duration: PeriodComparison::new(duration, prev_duration),
        transactions: PeriodComparison::new(transactions, prev_transactions),
    }
}

/// Engagement is reported as a fraction; the dashboard shows percent.
pub fn reduce_engagement(rows: &[ReportRow]) -> EngagementRate {
    let (current, previous) = split_periods(rows);
    let percent = |row: Option<&ReportRow>| row.map(|r| r.metric_f64(0) * 100.0).unwrap_or(0.0);
    PeriodComparison::new(percent(current), percent(previous))
}

pub fn reduce(daily: Resolution, overall: Resolution, engagement: Resolution) -> OverviewReport {
    let sources = SectionSources {
        daily_users: daily.source(),
        today_metrics: overall.source(),
        engagement_rate: engagement.source(),
    };

    let daily_users = match daily {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_daily(&rows),
        Resolution::Fallback => Vec::new(),
    };
    let today_metrics = match overall {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_today_metrics(&rows),
        Resolution::Fallback => TodayMetrics::default(),
    };
    let engagement_rate = match engagement {
        Resolution::Primary(rows) | Resolution::Alternate(rows) => reduce_engagement(&rows),
        Resolution::Fallback => fixtures::engagement(),
    };

    OverviewReport {
        daily_users,
        today_metrics,
        engagement_rate,
        sources,
    }
}

pub async fn fetch(client: &dyn ReportClient, property_id: &str) -> OverviewReport {
    let daily_query = daily_query();
    let overall_query = overall_query();
    let engagement_query = engagement_query();

    let (daily, overall, engagement) = tokio::join!(
        fallback::resolve(client, property_id, &daily_query, None),
        fallback::resolve(client, property_id, &overall_query, None),
        fallback::resolve(client, property_id, &engagement_query, None),
    );
    reduce(daily, overall, engagement)
}
