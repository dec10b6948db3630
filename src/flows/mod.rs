//! OAuth Flows
//!
//! Authentication lifecycle on top of [`TraktClient`](crate::TraktClient):
//!
//! - **Authorization Code**: redirect the user, then exchange the code with a CSRF check
//! - **Token**: refresh, import and revoke the stored authentication
//! - **Device Code**: acquire a device code and poll until the user approves it

pub mod authorization_code;
pub mod device;
pub mod token;

pub use authorization_code::{generate_state, AuthorizeRequest};
pub use device::{DevicePolling, PollingCancelHandle, PollingState};

use crate::core::headers;
use crate::error::TraktError;

/// Maps a 401 to an unauthorized error and a 429 to a rate-limit error.
///
/// The message is taken from `WWW-Authenticate` and `X-Ratelimit` respectively,
/// falling back to the status text. Every other error passes through.
pub(crate) fn handle_error(error: TraktError) -> TraktError {
    match error {
        TraktError::ApiResponse {
            status: 401,
            response,
            ..
        } => TraktError::Unauthorized {
            message: response
                .header(headers::WWW_AUTHENTICATE)
                .map_or_else(|| response.status_text.clone(), str::to_string),
            response,
        },
        TraktError::ApiResponse {
            status: 429,
            response,
            ..
        } => TraktError::RateLimit {
            message: response
                .header(headers::RATE_LIMIT)
                .map_or_else(|| response.status_text.clone(), str::to_string),
            response,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HttpResponse;
    use std::collections::HashMap;

    fn api_error(status: u16, headers: &[(&str, &str)]) -> TraktError {
        TraktError::from_response(HttpResponse {
            status,
            status_text: "Status Text".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
            ..Default::default()
        })
    }

    #[test]
    fn test_unauthorized_uses_www_authenticate() {
        let error = handle_error(api_error(
            401,
            &[("WWW-Authenticate", "Bearer error=\"invalid_token\"")],
        ));
        assert!(matches!(error, TraktError::Unauthorized { .. }));
        assert_eq!(error.to_string(), "Unauthorized: Bearer error=\"invalid_token\"");
        assert_eq!(error.status(), Some(401));
    }

    #[test]
    fn test_unauthorized_falls_back_to_status_text() {
        let error = handle_error(api_error(401, &[]));
        assert_eq!(error.to_string(), "Unauthorized: Status Text");
    }

    #[test]
    fn test_rate_limit_uses_header() {
        let error = handle_error(api_error(429, &[("X-Ratelimit", "{\"name\":\"UNAUTHED_API_GET_LIMIT\"}")]));
        assert!(matches!(error, TraktError::RateLimit { .. }));
        assert!(error.is_retryable());
        assert_eq!(
            error.to_string(),
            "Rate limit exceeded: {\"name\":\"UNAUTHED_API_GET_LIMIT\"}"
        );
    }

    #[test]
    fn test_other_errors_pass_through() {
        let error = handle_error(api_error(500, &[]));
        assert!(matches!(error, TraktError::ApiResponse { status: 500, .. }));

        let error = handle_error(TraktError::PollingExpired);
        assert!(matches!(error, TraktError::PollingExpired));
    }
}
