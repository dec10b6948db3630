//! Configuration types for the Trakt client.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::error::{TraktError, TraktResult};

/// Production API endpoint.
pub const PRODUCTION_ENDPOINT: &str = "https://api.trakt.tv";

/// Staging API endpoint.
pub const STAGING_ENDPOINT: &str = "https://api-staging.trakt.tv";

/// Production website.
pub const PRODUCTION_WEBSITE: &str = "https://trakt.tv";

/// Staging website.
pub const STAGING_WEBSITE: &str = "https://staging.trakt.tv";

/// Device-code verification page.
pub const VERIFICATION_URL: &str = "https://trakt.tv/activate";

/// API version sent on every request.
pub const API_VERSION: &str = "2";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-trakt/0.1.0";

/// Out-of-band redirect URI for installed applications.
pub const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Verification page with the user code pre-filled.
pub fn verification_url_with_code(user_code: &str) -> String {
    format!("{VERIFICATION_URL}/{user_code}")
}

/// Trakt client configuration.
#[derive(Clone)]
pub struct TraktConfig {
    /// API base URL.
    pub endpoint: String,
    /// OAuth application client id, also sent as the API key.
    pub client_id: String,
    pub(crate) client_secret: SecretString,
    pub redirect_uri: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl TraktConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> TraktConfigBuilder {
        TraktConfigBuilder::new()
    }

    /// Loads configuration from `TRAKT_*` environment variables.
    pub fn from_env() -> TraktResult<Self> {
        let client_id = std::env::var("TRAKT_CLIENT_ID").map_err(|_| {
            TraktError::configuration("TRAKT_CLIENT_ID environment variable not set")
        })?;
        let client_secret = std::env::var("TRAKT_CLIENT_SECRET").map_err(|_| {
            TraktError::configuration("TRAKT_CLIENT_SECRET environment variable not set")
        })?;

        let mut builder = TraktConfigBuilder::new()
            .client_id(client_id)
            .client_secret(client_secret);

        if let Ok(endpoint) = std::env::var("TRAKT_ENDPOINT") {
            builder = builder.endpoint(endpoint);
        }

        if let Ok(redirect_uri) = std::env::var("TRAKT_REDIRECT_URI") {
            builder = builder.redirect_uri(redirect_uri);
        }

        if let Ok(user_agent) = std::env::var("TRAKT_USER_AGENT") {
            builder = builder.user_agent(user_agent);
        }

        if let Ok(timeout_str) = std::env::var("TRAKT_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Whether the endpoint points at the staging environment.
    pub fn is_staging(&self) -> bool {
        self.endpoint.contains("staging")
    }

    /// Website matching the configured environment.
    pub fn website(&self) -> &'static str {
        if self.is_staging() {
            STAGING_WEBSITE
        } else {
            PRODUCTION_WEBSITE
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TraktResult<()> {
        if self.endpoint.is_empty() {
            return Err(TraktError::configuration("Endpoint cannot be empty"));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(TraktError::configuration(
                "Endpoint must start with http:// or https://",
            ));
        }

        url::Url::parse(&self.endpoint)
            .map_err(|e| TraktError::configuration(format!("Invalid endpoint: {e}")))?;

        if self.client_id.is_empty() {
            return Err(TraktError::configuration("Client id is required"));
        }

        if self.user_agent.is_empty() {
            return Err(TraktError::configuration("User-Agent cannot be empty"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for TraktConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraktConfig")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for TraktConfig.
#[derive(Default)]
pub struct TraktConfigBuilder {
    endpoint: Option<String>,
    client_id: Option<String>,
    client_secret: Option<SecretString>,
    redirect_uri: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TraktConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Targets the staging environment.
    pub fn staging(self) -> Self {
        self.endpoint(STAGING_ENDPOINT)
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(SecretString::new(client_secret.into()));
        self
    }

    pub fn redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> TraktResult<TraktConfig> {
        let config = TraktConfig {
            endpoint: self
                .endpoint
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| PRODUCTION_ENDPOINT.to_string()),
            client_id: self.client_id.unwrap_or_default(),
            client_secret: self
                .client_secret
                .unwrap_or_else(|| SecretString::new(String::new())),
            redirect_uri: self
                .redirect_uri
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder_defaults() {
        let config = TraktConfig::builder()
            .client_id("client_id")
            .client_secret("client_secret")
            .build()
            .unwrap();

        assert_eq!(config.endpoint, PRODUCTION_ENDPOINT);
        assert_eq!(config.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.client_secret(), "client_secret");
        assert!(!config.is_staging());
        assert_eq!(config.website(), PRODUCTION_WEBSITE);
    }

    #[test]
    fn test_staging_endpoint() {
        let config = TraktConfig::builder()
            .client_id("client_id")
            .staging()
            .build()
            .unwrap();

        assert!(config.is_staging());
        assert_eq!(config.website(), STAGING_WEBSITE);
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let config = TraktConfig::builder()
            .client_id("client_id")
            .endpoint("http://localhost:8080/")
            .build()
            .unwrap();

        assert_eq!(config.endpoint, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_endpoint() {
        let result = TraktConfig::builder()
            .client_id("client_id")
            .endpoint("api.trakt.tv")
            .build();

        assert!(matches!(result, Err(TraktError::Configuration { .. })));
    }

    #[test]
    fn test_missing_client_id() {
        assert!(TraktConfig::builder().build().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TraktConfig::builder()
            .client_id("client_id")
            .client_secret("super-secret")
            .build()
            .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_verification_url_with_code() {
        assert_eq!(
            verification_url_with_code("ABCD1234"),
            "https://trakt.tv/activate/ABCD1234"
        );
    }
}
