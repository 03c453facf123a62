use std::sync::Arc;

use axum::{extract::State, response::Response};
use chrono::Utc;

use pulseboard_core::reports::revenue;

use crate::{error::AppError, state::AppState};

use super::{property_id, with_source};

/// `GET /api/analytics/revenue`: seven months of plan revenue.
///
/// The body is a bare array, so the data source is only in the header.
#[tracing::instrument(skip(state))]
pub async fn revenue(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let property_id = property_id(&state)?;
    let today = Utc::now().date_naive();
    let report = revenue::fetch(state.reports.as_ref(), &property_id, today).await;
    Ok(with_source(&report.months, report.source))
}
