//! Primary → alternate → fixture resolution.
//!
//! Every endpoint resolves its rows through [`resolve`], which walks a fixed,
//! linear sequence of at most two live queries:
//!
//! ```text
//! PRIMARY ──rows──▶ Primary(rows)
//!    │ empty / error
//!    ▼
//! ALTERNATE (if defined) ──rows──▶ Alternate(rows)
//!    │ empty / error
//!    ▼
//! Fallback
//! ```
//!
//! Client errors never escape this module; they are logged and turned into
//! the next state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::report::{ReportClient, ReportQuery, ReportRow};

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Primary(Vec<ReportRow>),
    Alternate(Vec<ReportRow>),
    Fallback,
}

impl Resolution {
    pub fn source(&self) -> DataSource {
        match self {
            Resolution::Primary(_) | Resolution::Alternate(_) => DataSource::Live,
            Resolution::Fallback => DataSource::Fallback,
        }
    }
}

/// Tells callers whether a payload came from the analytics service or from
/// an embedded sample dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Live,
    Fallback,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::Live => "live",
            DataSource::Fallback => "fallback",
        }
    }

    /// Combine the sources of several sections: live only if all are live.
    pub fn merge(self, other: DataSource) -> DataSource {
        match (self, other) {
            (DataSource::Live, DataSource::Live) => DataSource::Live,
            _ => DataSource::Fallback,
        }
    }
}

/// Run one query; `None` when it failed or came back empty.
pub async fn fetch_rows(
    client: &dyn ReportClient,
    property_id: &str,
    query: &ReportQuery,
) -> Option<Vec<ReportRow>> {
    match client.run_report(property_id, query).await {
        Ok(rows) if rows.is_empty() => {
            info!(
                dimension = query.primary_dimension(),
                "Report returned no rows"
            );
            None
        }
        Ok(rows) => {
            debug!(
                dimension = query.primary_dimension(),
                rows = rows.len(),
                "Report returned rows"
            );
            Some(rows)
        }
        Err(e) => {
            warn!(
                dimension = query.primary_dimension(),
                kind = e.kind(),
                error = %e,
                "Report query failed"
            );
            None
        }
    }
}

pub async fn resolve(
    client: &dyn ReportClient,
    property_id: &str,
    primary: &ReportQuery,
    alternate: Option<&ReportQuery>,
) -> Resolution {
    if let Some(rows) = fetch_rows(client, property_id, primary).await {
        return Resolution::Primary(rows);
    }

    if let Some(alternate) = alternate {
        info!(
            from = primary.primary_dimension(),
            to = alternate.primary_dimension(),
            "Retrying report with alternate dimension"
        );
        if let Some(rows) = fetch_rows(client, property_id, alternate).await {
            return Resolution::Alternate(rows);
        }
    }

    warn!(
        dimension = primary.primary_dimension(),
        "Serving fallback dataset"
    );
    Resolution::Fallback
}
