use std::sync::Arc;

use axum::{extract::State, response::Response};

use pulseboard_core::reports::geo;

use crate::{error::AppError, state::AppState};

use super::{property_id, with_source};

/// `GET /api/analytics/geo`: users per country.
#[tracing::instrument(skip(state))]
pub async fn geo(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let property_id = property_id(&state)?;
    let report = geo::fetch(state.reports.as_ref(), &property_id).await;
    Ok(with_source(&report, report.source))
}
