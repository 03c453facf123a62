use std::time::Duration;

use crate::error::ConfigError;

pub const CLIENT_EMAIL_VAR: &str = "GOOGLE_CLIENT_EMAIL";
pub const PRIVATE_KEY_VAR: &str = "GOOGLE_PRIVATE_KEY";
pub const PROJECT_ID_VAR: &str = "GOOGLE_PROJECT_ID";
pub const PROPERTY_ID_VAR: &str = "GOOGLE_ANALYTICS_PROPERTY_ID";

pub const DEFAULT_API_BASE: &str = "https://analyticsdata.googleapis.com/v1beta";
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub google: GoogleConfig,
    pub ga_timeout_secs: u64,
    pub ga_api_base: String,
    pub ga_token_url: String,
}

/// Raw service-account settings as read from the environment.
///
/// Values are kept unvalidated so the server can report exactly which one is
/// missing; [`GoogleConfig::require`] turns them into a [`ServiceAccount`].
#[derive(Debug, Clone, Default)]
pub struct GoogleConfig {
    pub client_email: Option<String>,
    pub private_key: Option<String>,
    pub project_id: Option<String>,
    pub property_id: Option<String>,
}

/// Fully resolved credentials for one GA4 property.
#[derive(Clone, PartialEq)]
pub struct ServiceAccount {
    pub client_email: String,
    /// PEM with real newlines (escaped `\n` sequences already undone).
    pub private_key: String,
    pub project_id: String,
    pub property_id: String,
}

impl std::fmt::Debug for ServiceAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("project_id", &self.project_id)
            .field("property_id", &self.property_id)
            .finish()
    }
}

impl GoogleConfig {
    /// Validate that all four values are present and non-blank.
    ///
    /// The first missing variable (in declaration order) is reported.
    pub fn require(&self) -> Result<ServiceAccount, ConfigError> {
        let client_email = required(&self.client_email, CLIENT_EMAIL_VAR)?;
        let private_key = required(&self.private_key, PRIVATE_KEY_VAR)?;
        let project_id = required(&self.project_id, PROJECT_ID_VAR)?;
        let property_id = required(&self.property_id, PROPERTY_ID_VAR)?;

        Ok(ServiceAccount {
            client_email,
            private_key: unescape_private_key(&private_key),
            project_id,
            property_id,
        })
    }
}

fn required(value: &Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Keys pasted into `.env` files usually carry literal `\n` sequences.
pub fn unescape_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is worth a warning.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "Failed to parse .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PULSEBOARD_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid port: {e}")))?,
            None => 3000,
        };
        let ga_timeout_secs = match lookup("PULSEBOARD_GA_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid GA timeout: {e}")))?,
            None => 30,
        };

        Ok(Self {
            port,
            cors_origins: lookup("PULSEBOARD_CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            google: GoogleConfig {
                client_email: lookup(CLIENT_EMAIL_VAR),
                private_key: lookup(PRIVATE_KEY_VAR),
                project_id: lookup(PROJECT_ID_VAR),
                property_id: lookup(PROPERTY_ID_VAR),
            },
            ga_timeout_secs,
            ga_api_base: lookup("PULSEBOARD_GA_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            ga_token_url: lookup("PULSEBOARD_GA_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
        })
    }

    pub fn ga_timeout(&self) -> Duration {
        Duration::from_secs(self.ga_timeout_secs)
    }
}
