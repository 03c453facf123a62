use std::sync::Arc;

use axum::{extract::State, response::Response};

use pulseboard_core::reports::acquisition;

use crate::{error::AppError, state::AppState};

use super::{property_id, with_source};

/// `GET /api/analytics/acquisition`: users per acquisition channel, top six.
#[tracing::instrument(skip(state))]
pub async fn acquisition(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let property_id = property_id(&state)?;
    let report = acquisition::fetch(state.reports.as_ref(), &property_id).await;
    Ok(with_source(&report, report.source))
}
