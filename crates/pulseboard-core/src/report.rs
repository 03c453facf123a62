//! Report query model and the client abstraction.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// A date window in GA notation: `"YYYY-MM-DD"`, `"NdaysAgo"`, `"yesterday"`
/// or `"today"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    Metric { name: String, desc: bool },
    Dimension { name: String, desc: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<String>,
    pub metrics: Vec<String>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl ReportQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.date_ranges.push(DateRange::new(start, end));
        self
    }

    pub fn dimension(mut self, name: impl Into<String>) -> Self {
        self.dimensions.push(name.into());
        self
    }

    pub fn metric(mut self, name: impl Into<String>) -> Self {
        self.metrics.push(name.into());
        self
    }

    pub fn order_by_metric_desc(mut self, name: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy::Metric {
            name: name.into(),
            desc: true,
        });
        self
    }

    pub fn order_by_dimension(mut self, name: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy::Dimension {
            name: name.into(),
            desc: false,
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject queries the backend would refuse anyway.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.metrics.is_empty() {
            return Err(ReportError::Query(
                "a report needs at least one metric".to_string(),
            ));
        }
        if self.date_ranges.is_empty() {
            return Err(ReportError::Query(
                "a report needs at least one date range".to_string(),
            ));
        }
        if self.limit == Some(0) {
            return Err(ReportError::Query("limit must be positive".to_string()));
        }
        Ok(())
    }

    /// The first dimension, used in log lines to tell queries apart.
    pub fn primary_dimension(&self) -> &str {
        self.dimensions.first().map(String::as_str).unwrap_or("")
    }
}

/// One row of a report, positionally matched to the query's dimensions and
/// metrics. Values stay as the strings the service returned.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

impl ReportRow {
    pub fn new<D, M>(dimensions: D, metrics: M) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        M: IntoIterator,
        M::Item: Into<String>,
    {
        Self {
            dimension_values: dimensions.into_iter().map(Into::into).collect(),
            metric_values: metrics.into_iter().map(Into::into).collect(),
        }
    }

    pub fn dimension(&self, index: usize) -> Option<&str> {
        self.dimension_values
            .get(index)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Integer metric value; missing or unparsable values count as zero.
    ///
    /// Decimal strings are truncated, matching how counts are read elsewhere
    /// on the dashboard.
    pub fn metric_i64(&self, index: usize) -> i64 {
        let Some(raw) = self.metric_values.get(index) else {
            return 0;
        };
        let raw = raw.trim();
        raw.parse::<i64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(|v| v as i64))
            .unwrap_or(0)
    }

    /// Non-negative count variant of [`ReportRow::metric_i64`].
    pub fn metric_count(&self, index: usize) -> u64 {
        self.metric_i64(index).max(0) as u64
    }

    pub fn metric_f64(&self, index: usize) -> f64 {
        self.metric_values
            .get(index)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }
}

/// The single outbound dependency: run one report against one property.
///
/// Implementations own auth and transport. Callers must not assume any
/// retry happens behind this call.
#[async_trait::async_trait]
pub trait ReportClient: Send + Sync + 'static {
    async fn run_report(
        &self,
        property_id: &str,
        query: &ReportQuery,
    ) -> Result<Vec<ReportRow>, ReportError>;
}
