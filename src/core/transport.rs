//! HTTP Transport
//!
//! Injectable fetch-like interface plus the reqwest and mock implementations.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{NetworkError, TraktError, TraktResult};

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

/// Redirect handling for a single request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RedirectMode {
    #[default]
    Follow,
    /// Do not follow; a 3xx answer surfaces as an opaque redirect.
    Manual,
}

/// Credentials policy for a single request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CredentialsMode {
    Omit,
    #[default]
    SameOrigin,
    Include,
}

/// Per-call transport overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestInit {
    pub redirect: RedirectMode,
    pub credentials: CredentialsMode,
    pub timeout: Option<Duration>,
}

impl RequestInit {
    /// Manual redirect with credentials omitted, as used by the authorize redirect.
    pub fn manual_redirect() -> Self {
        Self {
            redirect: RedirectMode::Manual,
            credentials: CredentialsMode::Omit,
            timeout: None,
        }
    }
}

/// HTTP request definition.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub init: RequestInit,
}

impl HttpRequest {
    /// Case-insensitive request header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Kind of response the transport produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseType {
    #[default]
    Basic,
    /// Redirect answered under manual redirect mode; not introspected.
    OpaqueRedirect,
}

/// HTTP response definition.
#[derive(Clone, Debug, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub response_type: ResponseType,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// True for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_opaque_redirect(&self) -> bool {
        self.response_type == ResponseType::OpaqueRedirect
    }
}

/// HTTP transport interface (for dependency injection).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> TraktResult<HttpResponse>;
}

/// Default reqwest-based HTTP transport.
pub struct ReqwestHttpTransport {
    following: reqwest::Client,
    manual: reqwest::Client,
    default_timeout: Duration,
}

impl ReqwestHttpTransport {
    /// Create transport with the given default timeout.
    pub fn new(timeout: Duration) -> TraktResult<Self> {
        let build = |policy: reqwest::redirect::Policy| {
            reqwest::Client::builder()
                .timeout(timeout)
                .redirect(policy)
                .build()
                .map_err(|e| {
                    TraktError::configuration(format!("Failed to create HTTP client: {e}"))
                })
        };

        Ok(Self {
            following: build(reqwest::redirect::Policy::default())?,
            manual: build(reqwest::redirect::Policy::none())?,
            default_timeout: timeout,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestHttpTransport {
    async fn send(&self, request: HttpRequest) -> TraktResult<HttpResponse> {
        let timeout = request.init.timeout.unwrap_or(self.default_timeout);
        let manual = request.init.redirect == RedirectMode::Manual;
        let client = if manual { &self.manual } else { &self.following };

        let mut builder = match request.method {
            HttpMethod::Get => client.get(&request.url),
            HttpMethod::Post => client.post(&request.url),
            HttpMethod::Delete => client.delete(&request.url),
        };

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TraktError::Network(NetworkError::Timeout { timeout })
            } else {
                TraktError::Network(NetworkError::ConnectionFailed {
                    message: e.to_string(),
                })
            }
        })?;

        let status = response.status().as_u16();
        let status_text = response
            .status()
            .canonical_reason()
            .unwrap_or("")
            .to_string();

        let response_type = if manual && response.status().is_redirection() {
            ResponseType::OpaqueRedirect
        } else {
            ResponseType::Basic
        };

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        let body = response.text().await.map_err(|e| {
            TraktError::Network(NetworkError::BodyRead {
                message: e.to_string(),
            })
        })?;

        Ok(HttpResponse {
            status,
            status_text,
            response_type,
            headers,
            body,
        })
    }
}

/// Mock HTTP transport for testing.
///
/// Queued responses are served in the order they were queued.
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    request_history: Mutex<Vec<HttpRequest>>,
    default_response: Mutex<Option<HttpResponse>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to return.
    pub fn queue_response(&self, response: HttpResponse) -> &Self {
        lock(&self.responses).push_back(response);
        self
    }

    /// Queue a JSON response.
    pub fn queue_json_response<T: serde::Serialize>(&self, status: u16, body: &T) -> &Self {
        self.queue_response(Self::json_response(status, body))
    }

    /// Queue a bodiless response with the given status.
    pub fn queue_status(&self, status: u16) -> &Self {
        self.queue_response(HttpResponse {
            status,
            status_text: Self::status_text(status).to_string(),
            ..Default::default()
        })
    }

    /// Build a JSON response without queueing it.
    pub fn json_response<T: serde::Serialize>(status: u16, body: &T) -> HttpResponse {
        HttpResponse {
            status,
            status_text: Self::status_text(status).to_string(),
            response_type: ResponseType::Basic,
            headers: [("content-type".to_string(), "application/json".to_string())]
                .into_iter()
                .collect(),
            body: serde_json::to_string(body).unwrap_or_default(),
        }
    }

    fn status_text(status: u16) -> &'static str {
        reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Error")
    }

    /// Set default response when queue is empty.
    pub fn set_default_response(&self, response: HttpResponse) -> &Self {
        *lock(&self.default_response) = Some(response);
        self
    }

    /// Get request history.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.request_history).clone()
    }

    pub fn get_last_request(&self) -> Option<HttpRequest> {
        lock(&self.request_history).last().cloned()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.request_history).len()
    }

    pub fn clear_history(&self) {
        lock(&self.request_history).clear();
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> TraktResult<HttpResponse> {
        lock(&self.request_history).push(request);

        let response = lock(&self.responses)
            .pop_front()
            .or_else(|| lock(&self.default_response).clone());

        response.ok_or_else(|| {
            TraktError::Network(NetworkError::ConnectionFailed {
                message: "No mock response available".to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: HashMap::new(),
            body: None,
            init: RequestInit::default(),
        }
    }

    #[tokio::test]
    async fn test_mock_transport_serves_in_queue_order() {
        let transport = MockHttpTransport::new();
        transport
            .queue_json_response(200, &serde_json::json!({"n": 1}))
            .queue_status(400);

        let first = transport.send(request("https://a")).await.unwrap();
        let second = transport.send(request("https://b")).await.unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(first.body, r#"{"n":1}"#);
        assert_eq!(second.status, 400);
        assert_eq!(second.status_text, "Bad Request");

        let history = transport.get_requests();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].url, "https://b");
    }

    #[tokio::test]
    async fn test_mock_transport_falls_back_to_default() {
        let transport = MockHttpTransport::new();
        assert!(matches!(
            transport.send(request("https://a")).await,
            Err(TraktError::Network(NetworkError::ConnectionFailed { .. }))
        ));

        transport.set_default_response(HttpResponse {
            status: 204,
            ..Default::default()
        });
        assert_eq!(transport.send(request("https://a")).await.unwrap().status, 204);
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_response_header_lookup_is_case_insensitive() {
        let response = MockHttpTransport::json_response(200, &serde_json::json!({}));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert!(response.has_header("CONTENT-TYPE"));
        assert!(!response.has_header("x-pagination-page"));
        assert!(response.is_ok());
    }

    #[test]
    fn test_response_header_lookup_with_canonical_keys() {
        let response = HttpResponse {
            status: 200,
            headers: HashMap::from([
                ("X-Pagination-Page".to_string(), "4".to_string()),
                ("WWW-Authenticate".to_string(), "Bearer".to_string()),
            ]),
            ..Default::default()
        };
        assert_eq!(response.header("x-pagination-page"), Some("4"));
        assert_eq!(response.header("www-authenticate"), Some("Bearer"));
    }

    #[test]
    fn test_http_method_as_str() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
        assert_eq!(HttpMethod::Post.as_str(), "POST");
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}
