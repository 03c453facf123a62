use std::sync::Arc;

use pulseboard_core::{config::Config, ReportClient};

/// Shared application state injected into every Axum handler via
/// [`axum::extract::State`].
///
/// Nothing here is mutated after start-up; the only interior mutability is
/// the report client's own token cache.
pub struct AppState {
    /// Parsed configuration, loaded once at startup from environment variables.
    pub config: Arc<Config>,

    /// Outbound analytics client. Tests substitute a scripted implementation.
    pub reports: Arc<dyn ReportClient>,
}

impl AppState {
    pub fn new(config: Config, reports: Arc<dyn ReportClient>) -> Self {
        Self {
            config: Arc::new(config),
            reports,
        }
    }
}
