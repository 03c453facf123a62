use thiserror::Error;

/// Problems resolving process configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures surfaced by a [`ReportClient`](crate::report::ReportClient).
///
/// Aggregators treat every variant the same way (fall through to the next
/// data source); the split exists for logging and for adapter tests.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReportError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("invalid report query: {0}")]
    Query(String),

    #[error("transport error: {0}")]
    Transport(String),
}

impl ReportError {
    pub fn kind(&self) -> &'static str {
        match self {
            ReportError::Auth(_) => "auth",
            ReportError::Query(_) => "query",
            ReportError::Transport(_) => "transport",
        }
    }
}
