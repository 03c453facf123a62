use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use pulseboard_core::reports::{acquisition, devices, geo, overview, pages, revenue};
use pulseboard_core::{DataSource, ReportClient};

use crate::{error::AppError, state::AppState};

use super::{property_id, DATA_SOURCE_HEADER};

const JSON_FILENAME: &str = "analytics-export.json";

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub format: String,
    #[serde(default)]
    pub metrics: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
    Json,
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            "json" => Ok(ExportFormat::Json),
            other => Err(AppError::BadRequest(format!(
                "unsupported format: {other}; expected csv, excel, pdf or json"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportSection {
    Overview,
    Devices,
    Countries,
    Sources,
    Pages,
    Revenue,
}

impl ExportSection {
    pub const ALL: [ExportSection; 6] = [
        ExportSection::Overview,
        ExportSection::Devices,
        ExportSection::Countries,
        ExportSection::Sources,
        ExportSection::Pages,
        ExportSection::Revenue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportSection::Overview => "overview",
            ExportSection::Devices => "devices",
            ExportSection::Countries => "countries",
            ExportSection::Sources => "sources",
            ExportSection::Pages => "pages",
            ExportSection::Revenue => "revenue",
        }
    }

    /// Parse the requested names. Duplicates collapse; an empty list selects
    /// every section.
    pub fn parse_list(names: &[String]) -> Result<Vec<ExportSection>, AppError> {
        if names.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        let mut sections = Vec::new();
        for name in names {
            let section = Self::ALL
                .into_iter()
                .find(|s| s.name() == name.trim())
                .ok_or_else(|| AppError::BadRequest(format!("unknown metric: {name}")))?;
            if !sections.contains(&section) {
                sections.push(section);
            }
        }
        Ok(sections)
    }

    async fn collect(
        self,
        client: &dyn ReportClient,
        property_id: &str,
    ) -> Result<(Value, DataSource), AppError> {
        let (value, source) = match self {
            ExportSection::Overview => {
                let report = overview::fetch(client, property_id).await;
                let source = report.sources.overall();
                (serde_json::to_value(report), source)
            }
            ExportSection::Devices => {
                let report = devices::fetch(client, property_id).await;
                (serde_json::to_value(report.devices), report.source)
            }
            ExportSection::Countries => {
                let report = geo::fetch(client, property_id).await;
                (serde_json::to_value(report.countries), report.source)
            }
            ExportSection::Sources => {
                let report = acquisition::fetch(client, property_id).await;
                (serde_json::to_value(report.sources), report.source)
            }
            ExportSection::Pages => {
                let report = pages::fetch(client, property_id).await;
                (serde_json::to_value(report.pages), report.source)
            }
            ExportSection::Revenue => {
                let report =
                    revenue::fetch(client, property_id, Utc::now().date_naive()).await;
                (serde_json::to_value(report.months), report.source)
            }
        };
        let value = value.map_err(|e| AppError::Internal(e.into()))?;
        Ok((value, source))
    }
}

/// `POST /api/analytics/export`: download the selected sections.
///
/// Only `json` is produced; `csv`, `excel` and `pdf` are accepted as known
/// formats but answer `501`.
#[tracing::instrument(skip_all)]
pub async fn export(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let format: ExportFormat = request.format.parse()?;
    let sections = ExportSection::parse_list(&request.metrics)?;
    if format != ExportFormat::Json {
        return Err(AppError::NotImplemented(format!(
            "{} export is not available; use json",
            request.format
        )));
    }
    tracing::info!(
        format = %request.format,
        sections = sections.len(),
        "Building analytics export"
    );

    let property_id = property_id(&state)?;

    let mut data = Map::new();
    let mut sources = Map::new();
    let mut overall = DataSource::Live;
    for section in sections {
        let (value, source) = section
            .collect(state.reports.as_ref(), &property_id)
            .await?;
        data.insert(section.name().to_string(), value);
        sources.insert(section.name().to_string(), json!(source));
        overall = overall.merge(source);
    }

    let body = json!({
        "generatedAt": Utc::now().to_rfc3339(),
        "data": data,
        "sources": sources,
    });
    let bytes = serde_json::to_vec_pretty(&body).map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{JSON_FILENAME}\""),
            ),
            (
                header::HeaderName::from_static(DATA_SOURCE_HEADER),
                overall.as_str().to_string(),
            ),
        ],
        bytes,
    )
        .into_response())
}
