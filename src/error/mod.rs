//! Trakt Error Types
//!
//! Error hierarchy for the request pipeline and the OAuth lifecycle.

use std::time::Duration;
use thiserror::Error;

use crate::core::HttpResponse;

/// Raised when a protected call is made without a stored access token.
pub(crate) const MISSING_ACCESS_TOKEN: &str = "OAuth required: access_token is missing";
/// Raised when a refresh is attempted without a refresh token.
pub(crate) const MISSING_REFRESH_TOKEN: &str = "No refresh token found.";

/// Root error type for the Trakt integration.
#[derive(Error, Debug)]
pub enum TraktError {
    /// Malformed input value against a required format.
    #[error("{message}")]
    Validation { message: String },

    /// Unsupported filter name or multiplicity.
    #[error("{message}")]
    Filter { message: String },

    /// Missing or invalid parameter, token, or device code.
    #[error("{message}")]
    InvalidParameter { message: String },

    /// Stored access token is past its expiry.
    #[error("{message}")]
    ExpiredToken { message: String },

    /// 401 received during an OAuth exchange.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
        response: Box<HttpResponse>,
    },

    /// 429 received during an OAuth exchange.
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        message: String,
        response: Box<HttpResponse>,
    },

    /// Non-success HTTP status.
    #[error("{status}: {message}")]
    ApiResponse {
        status: u16,
        message: String,
        response: Box<HttpResponse>,
    },

    /// CSRF state mismatch during code exchange.
    #[error("Invalid CSRF (State): expected '{}', but received {state}", expected.as_deref().unwrap_or("undefined"))]
    InvalidCsrf {
        state: String,
        expected: Option<String>,
    },

    /// Device code deadline passed while polling.
    #[error("Polling expired")]
    PollingExpired,

    /// Device polling was cancelled by the caller or replaced by a newer poll.
    #[error("Polling cancelled")]
    PollingCancelled,

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Deserialization error: {message}")]
    Deserialization { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl TraktError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn filter(message: impl Into<String>) -> Self {
        Self::Filter {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub(crate) fn expired_token(message: impl Into<String>) -> Self {
        Self::ExpiredToken {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn deserialization(message: impl Into<String>) -> Self {
        Self::Deserialization {
            message: message.into(),
        }
    }

    /// Builds an API-response error from a non-success response.
    ///
    /// The message comes from the status table, falling back to the transport's status text.
    pub fn from_response(response: HttpResponse) -> Self {
        let message = response_code_message(response.status)
            .map(str::to_string)
            .unwrap_or_else(|| response.status_text.clone());

        Self::ApiResponse {
            status: response.status,
            message,
            response: Box::new(response),
        }
    }

    /// Get error code for telemetry.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "TRAKT_VALIDATION",
            Self::Filter { .. } => "TRAKT_FILTER",
            Self::InvalidParameter { .. } => "TRAKT_INVALID_PARAMETER",
            Self::ExpiredToken { .. } => "TRAKT_EXPIRED_TOKEN",
            Self::Unauthorized { .. } => "TRAKT_UNAUTHORIZED",
            Self::RateLimit { .. } => "TRAKT_RATE_LIMIT",
            Self::ApiResponse { .. } => "TRAKT_API_RESPONSE",
            Self::InvalidCsrf { .. } => "TRAKT_INVALID_CSRF",
            Self::PollingExpired => "TRAKT_POLLING_EXPIRED",
            Self::PollingCancelled => "TRAKT_POLLING_CANCELLED",
            Self::Network(_) => "TRAKT_NETWORK",
            Self::Deserialization { .. } => "TRAKT_DESERIALIZATION",
            Self::Configuration { .. } => "TRAKT_CONFIG",
        }
    }

    /// HTTP status of the wrapped response, if any.
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }

    /// The wrapped raw response, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            Self::Unauthorized { response, .. }
            | Self::RateLimit { response, .. }
            | Self::ApiResponse { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_retryable(),
            Self::RateLimit { .. } => true,
            Self::ApiResponse { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get retry-after duration if the server provided one.
    pub fn retry_after(&self) -> Option<Duration> {
        self.response()
            .and_then(|r| r.header(crate::core::headers::RETRY_AFTER))
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Check if error requires re-authentication.
    pub fn needs_reauth(&self) -> bool {
        match self {
            Self::ExpiredToken { .. } | Self::Unauthorized { .. } => true,
            Self::ApiResponse { status: 401, .. } => true,
            Self::InvalidParameter { message } => {
                message == MISSING_ACCESS_TOKEN || message == MISSING_REFRESH_TOKEN
            }
            _ => false,
        }
    }
}

/// Network/transport error.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Request timeout after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Failed to read response body: {message}")]
    BodyRead { message: String },
}

impl NetworkError {
    /// Check if error is retryable.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::BodyRead { .. })
    }
}

/// Result type for Trakt operations.
pub type TraktResult<T> = Result<T, TraktError>;

/// Human-readable message for a Trakt status code.
pub fn response_code_message(status: u16) -> Option<&'static str> {
    let message = match status {
        200 => "Success",
        201 => "Success - new resource created (POST)",
        204 => "Success - no content to return (DELETE)",
        400 => "Bad Request - request couldn't be parsed",
        401 => "Unauthorized - OAuth must be provided",
        403 => "Forbidden - invalid API key or unapproved app",
        404 => "Not Found - method exists, but no record found",
        405 => "Method Not Found - method doesn't exist",
        409 => "Conflict - resource already created",
        410 => "Expired - the tokens have expired, restart the process",
        412 => "Precondition Failed - use application/json content type",
        418 => "Denied - user explicitly denied this code",
        420 => "Account Limit Exceeded - list count, item count, etc",
        422 => "Unprocessable Entity - validation errors",
        423 => "Locked User Account - have the user contact support",
        426 => "VIP Only - user must upgrade to VIP",
        429 => "Rate Limit Exceeded",
        500 => "Server Error - please open a support ticket",
        502 => "Service Unavailable - Bad Gateway - server overloaded (try again in 30s)",
        503 => "Service Unavailable - server overloaded (try again in 30s)",
        504 => "Service Unavailable - Gateway Timeout - server overloaded (try again in 30s)",
        520 => "Service Unavailable - Cloudflare error",
        521 => "Service Unavailable - Web server is down - Cloudflare error",
        522 => "Service Unavailable - Cloudflare error",
        _ => return None,
    };
    Some(message)
}
