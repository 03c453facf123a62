use std::sync::Arc;

use reqwest::StatusCode;
use tracing::{debug, instrument};

use pulseboard_core::config::{Config, ServiceAccount};
use pulseboard_core::report::{ReportClient, ReportQuery, ReportRow};
use pulseboard_core::ReportError;

use crate::auth::{ServiceAccountTokens, TokenSource};
use crate::wire::{error_message, RunReportRequest, RunReportResponse};

/// [`ReportClient`] backed by the GA4 Data API.
#[derive(Clone)]
pub struct Ga4Client {
    http: reqwest::Client,
    api_base: String,
    tokens: Arc<dyn TokenSource>,
}

impl Ga4Client {
    pub fn from_config(config: &Config, account: &ServiceAccount) -> Result<Self, ReportError> {
        let tokens = ServiceAccountTokens::new(account, &config.ga_token_url, config.ga_timeout())?;
        let http = reqwest::Client::builder()
            .timeout(config.ga_timeout())
            .build()
            .map_err(|e| ReportError::Transport(format!("http client: {e}")))?;
        Ok(Self::new(http, &config.ga_api_base, Arc::new(tokens)))
    }

    pub fn new(http: reqwest::Client, api_base: &str, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    pub fn report_url(&self, property_id: &str) -> String {
        format!("{}/properties/{}:runReport", self.api_base, property_id)
    }
}

/// Map a non-success status to the error taxonomy callers log against.
pub fn status_error(status: StatusCode, body: &str) -> ReportError {
    let message = error_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ReportError::Auth(message),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => ReportError::Query(message),
        other => ReportError::Transport(format!("{other}: {message}")),
    }
}

#[async_trait::async_trait]
impl ReportClient for Ga4Client {
    #[instrument(skip(self, query), fields(dimension = query.primary_dimension()))]
    async fn run_report(
        &self,
        property_id: &str,
        query: &ReportQuery,
    ) -> Result<Vec<ReportRow>, ReportError> {
        query.validate()?;
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(self.report_url(property_id))
            .bearer_auth(token)
            .json(&RunReportRequest::from(query))
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        let report: RunReportResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Transport(format!("decoding report: {e}")))?;
        let rows = report.into_rows();
        debug!(rows = rows.len(), "runReport completed");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoToken;

    #[async_trait::async_trait]
    impl TokenSource for NoToken {
        async fn access_token(&self) -> Result<String, ReportError> {
            Err(ReportError::Auth("no credentials".into()))
        }
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_error(StatusCode::UNAUTHORIZED, "").kind(), "auth");
        assert_eq!(status_error(StatusCode::FORBIDDEN, "").kind(), "auth");
        assert_eq!(status_error(StatusCode::BAD_REQUEST, "").kind(), "query");
        assert_eq!(status_error(StatusCode::NOT_FOUND, "").kind(), "query");
        assert_eq!(
            status_error(StatusCode::SERVICE_UNAVAILABLE, "").kind(),
            "transport"
        );
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, "").kind(),
            "transport"
        );
    }

    #[test]
    fn query_error_carries_api_message() {
        let body = r#"{"error":{"code":400,"message":"Did you mean date?","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, body),
            ReportError::Query("INVALID_ARGUMENT: Did you mean date?".into())
        );
    }

    #[test]
    fn report_url_trims_trailing_slash() {
        let client = Ga4Client::new(
            reqwest::Client::new(),
            "https://analyticsdata.googleapis.com/v1beta/",
            Arc::new(NoToken),
        );
        assert_eq!(
            client.report_url("123456"),
            "https://analyticsdata.googleapis.com/v1beta/properties/123456:runReport"
        );
    }

    #[tokio::test]
    async fn invalid_query_is_rejected_before_auth() {
        let client = Ga4Client::new(reqwest::Client::new(), "http://unused", Arc::new(NoToken));
        let query = ReportQuery::new().dimension("country");
        let err = client.run_report("1", &query).await.expect_err("invalid");
        assert_eq!(err.kind(), "query");
    }

    #[tokio::test]
    async fn token_failure_surfaces_as_auth() {
        let client = Ga4Client::new(reqwest::Client::new(), "http://unused", Arc::new(NoToken));
        let query = ReportQuery::new()
            .date_range("7daysAgo", "today")
            .metric("sessions");
        let err = client.run_report("1", &query).await.expect_err("no token");
        assert_eq!(err, ReportError::Auth("no credentials".into()));
    }
}
