//! JSON bodies of the `properties/{id}:runReport` method.

use serde::{Deserialize, Serialize};

use pulseboard_core::report::{OrderBy, ReportQuery, ReportRow};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunReportRequest {
    pub date_ranges: Vec<DateRange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Named>,
    pub metrics: Vec<Named>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_bys: Vec<WireOrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WireOrderBy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricOrderBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<DimensionOrderBy>,
    pub desc: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricOrderBy {
    pub metric_name: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DimensionOrderBy {
    pub dimension_name: String,
}

impl From<&ReportQuery> for RunReportRequest {
    fn from(query: &ReportQuery) -> Self {
        let named = |names: &[String]| {
            names
                .iter()
                .map(|name| Named { name: name.clone() })
                .collect::<Vec<_>>()
        };

        let order_bys = match &query.order_by {
            Some(OrderBy::Metric { name, desc }) => vec![WireOrderBy {
                metric: Some(MetricOrderBy {
                    metric_name: name.clone(),
                }),
                dimension: None,
                desc: *desc,
            }],
            Some(OrderBy::Dimension { name, desc }) => vec![WireOrderBy {
                metric: None,
                dimension: Some(DimensionOrderBy {
                    dimension_name: name.clone(),
                }),
                desc: *desc,
            }],
            None => Vec::new(),
        };

        RunReportRequest {
            date_ranges: query
                .date_ranges
                .iter()
                .map(|r| DateRange {
                    start_date: r.start.clone(),
                    end_date: r.end.clone(),
                })
                .collect(),
            dimensions: named(&query.dimensions),
            metrics: named(&query.metrics),
            order_bys,
            limit: query.limit,
        }
    }
}

/// Only the parts of the response the dashboard reads. A report with no
/// data omits `rows` entirely.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub rows: Vec<WireRow>,
    #[serde(default)]
    pub row_count: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRow {
    #[serde(default)]
    pub dimension_values: Vec<WireValue>,
    #[serde(default)]
    pub metric_values: Vec<WireValue>,
}

#[derive(Debug, Deserialize)]
pub struct WireValue {
    #[serde(default)]
    pub value: Option<String>,
}

impl From<WireRow> for ReportRow {
    fn from(row: WireRow) -> Self {
        let values = |v: Vec<WireValue>| {
            v.into_iter()
                .map(|v| v.value.unwrap_or_default())
                .collect::<Vec<_>>()
        };
        ReportRow {
            dimension_values: values(row.dimension_values),
            metric_values: values(row.metric_values),
        }
    }
}

impl RunReportResponse {
    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows.into_iter().map(ReportRow::from).collect()
    }
}

/// Google API error envelope: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Best human-readable message from an error body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => match envelope.error.status {
            Some(status) => format!("{status}: {}", envelope.error.message),
            None => envelope.error.message,
        },
        _ => body.chars().take(200).collect(),
    }
}
