//! Service-account authentication.
//!
//! A self-signed RS256 assertion is exchanged for a bearer token at the
//! OAuth token endpoint. Tokens are cached until shortly before they expire.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use pulseboard_core::config::ServiceAccount;
use pulseboard_core::ReportError;

pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Something that can hand out a bearer token for the Data API.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync + 'static {
    async fn access_token(&self) -> Result<String, ReportError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(EXPIRY_BUFFER_SECS) < self.expires_at
    }
}

pub struct ServiceAccountTokens {
    client_email: String,
    key: EncodingKey,
    token_url: String,
    http: reqwest::Client,
    cache: RwLock<Option<CachedToken>>,
}

impl std::fmt::Debug for ServiceAccountTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountTokens")
            .field("client_email", &self.client_email)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountTokens {
    /// Parses the PEM key up front so a bad key fails at start-up rather
    /// than on the first request.
    pub fn new(
        account: &ServiceAccount,
        token_url: impl Into<String>,
        timeout: StdDuration,
    ) -> Result<Self, ReportError> {
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())
            .map_err(|e| ReportError::Auth(format!("invalid service account key: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::Transport(format!("http client: {e}")))?;

        Ok(Self {
            client_email: account.client_email.clone(),
            key,
            token_url: token_url.into(),
            http,
            cache: RwLock::new(None),
        })
    }

    pub fn assertion(&self, now: DateTime<Utc>) -> Result<String, ReportError> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: ANALYTICS_READONLY_SCOPE.to_string(),
            aud: self.token_url.clone(),
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(|e| ReportError::Auth(format!("signing assertion: {e}")))
    }

    async fn fetch_token(&self) -> Result<CachedToken, ReportError> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ReportError::Transport(format!("token request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Token exchange rejected");
            return Err(ReportError::Auth(format!(
                "token endpoint returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ReportError::Auth(format!("token response: {e}")))?;

        let expires_at = now + Duration::seconds(token.expires_in);
        debug!(expires_at = %expires_at, "Access token refreshed");
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[async_trait::async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self) -> Result<String, ReportError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_fresh(Utc::now()) {
                    return Ok(cached.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh(Utc::now()) {
                return Ok(cached.access_token.clone());
            }
        }
        let fresh = self.fetch_token().await?;
        let token = fresh.access_token.clone();
        *cache = Some(fresh);
        Ok(token)
    }
}
