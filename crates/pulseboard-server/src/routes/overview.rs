use std::sync::Arc;

use axum::{extract::State, response::Response};

use pulseboard_core::reports::overview;

use crate::{error::AppError, state::AppState};

use super::{property_id, with_source};

/// `GET /api/analytics`: daily users, period cards and engagement rate.
///
/// Sections resolve independently; `sources` in the body tags each one and
/// the header is `live` only when all three are.
#[tracing::instrument(skip(state))]
pub async fn overview(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let property_id = property_id(&state)?;
    let report = overview::fetch(state.reports.as_ref(), &property_id).await;
    Ok(with_source(&report, report.sources.overall()))
}
