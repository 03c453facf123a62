pub mod acquisition;
pub mod devices;
pub mod export;
pub mod geo;
pub mod health;
pub mod overview;
pub mod pages;
pub mod revenue;

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use pulseboard_core::DataSource;

use crate::{error::AppError, state::AppState};

/// Response header naming where the payload came from: `live` or `fallback`.
pub const DATA_SOURCE_HEADER: &str = "x-data-source";

/// JSON response tagged with its data source.
pub fn with_source<T: Serialize>(body: T, source: DataSource) -> Response {
    ([(DATA_SOURCE_HEADER, source.as_str())], Json(body)).into_response()
}

/// Validate credentials before any query is issued and return the target
/// property.
pub fn property_id(state: &AppState) -> Result<String, AppError> {
    Ok(state.config.google.require()?.property_id)
}
