//! Row reduction shared by the per-endpoint reports.

use serde::{Deserialize, Serialize};

use crate::report::ReportRow;

/// One slice of a breakdown: a label, its count and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedCategory {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// Sum of the first metric across all rows.
pub fn total(rows: &[ReportRow]) -> u64 {
    rows.iter().map(|row| row.metric_count(0)).sum()
}

/// Round half away from zero to `precision` decimal places.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// `count / total * 100`, rounded; `0` when the total is zero.
pub fn percentage(count: u64, total: u64, precision: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, precision)
}

/// Reduce rows into categories keyed by their first dimension.
///
/// Row order is preserved. `placeholder` replaces a missing label before
/// `format` runs.
pub fn reduce_rows<F>(
    rows: &[ReportRow],
    placeholder: &str,
    precision: u32,
    format: F,
) -> Vec<AggregatedCategory>
where
    F: Fn(&str) -> String,
{
    let total = total(rows);
    rows.iter()
        .map(|row| {
            let count = row.metric_count(0);
            AggregatedCategory {
                label: format(row.dimension(0).unwrap_or(placeholder)),
                count,
                percentage: percentage(count, total, precision),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceKind {
    /// Collapse a free-text device label onto the three dashboard buckets.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("mobile") || lower.contains("phone") {
            DeviceKind::Mobile
        } else if lower.contains("tablet") {
            DeviceKind::Tablet
        } else {
            DeviceKind::Desktop
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceKind::Desktop => "desktop",
            DeviceKind::Mobile => "mobile",
            DeviceKind::Tablet => "tablet",
        }
    }
}

/// Sum rows into device buckets, emitted in mobile, desktop, tablet order.
/// Empty buckets are dropped.
pub fn group_devices(rows: &[ReportRow], precision: u32) -> Vec<AggregatedCategory> {
    let mut buckets = [
        (DeviceKind::Mobile, 0u64),
        (DeviceKind::Desktop, 0u64),
        (DeviceKind::Tablet, 0u64),
    ];
    for row in rows {
        let kind = DeviceKind::classify(row.dimension(0).unwrap_or(""));
        if let Some(bucket) = buckets.iter_mut().find(|(k, _)| *k == kind) {
            bucket.1 += row.metric_count(0);
        }
    }

    let total: u64 = buckets.iter().map(|(_, count)| count).sum();
    buckets
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(kind, count)| AggregatedCategory {
            label: kind.as_str().to_string(),
            count: *count,
            percentage: percentage(*count, total, precision),
        })
        .collect()
}

/// `organic_search` → `Organic Search`. Words are split on underscores and
/// whitespace.
pub fn title_case(raw: &str) -> String {
    raw.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Relative change in percent; zero when there is no previous value.
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        (current - previous) / previous * 100.0
    }
}

pub fn avg_session_duration(engagement_seconds: f64, sessions: i64) -> f64 {
    if sessions > 0 {
        engagement_seconds / sessions as f64
    } else {
        0.0
    }
}
