//! Trakt Client
//!
//! Authenticated request executor and the shared state the OAuth flows mutate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::instrument;
use url::Url;

use crate::auth::{now_millis, AuthStore, TraktClientAuthentication, TraktDeviceAuthentication};
use crate::cache::ResponseCache;
use crate::config::{TraktConfig, API_VERSION};
use crate::core::headers;
use crate::core::{HttpRequest, HttpTransport, RequestInit, ReqwestHttpTransport};
use crate::endpoints;
use crate::error::{TraktError, TraktResult, MISSING_ACCESS_TOKEN};
use crate::flows::device::PollingSession;
use crate::response::{parse_response, EnrichedResponse};
use crate::template::{build_request, ApiTemplate, AuthRequirement, RequestParams};

pub(crate) struct ClientInner {
    pub(crate) config: TraktConfig,
    pub(crate) transport: Arc<dyn HttpTransport>,
    pub(crate) auth: AuthStore,
    /// Live device-poll timer, at most one per client.
    pub(crate) polling: Mutex<Option<Arc<PollingSession>>>,
    /// Device code being polled or last acquired.
    pub(crate) poll: Mutex<Option<TraktDeviceAuthentication>>,
    pub(crate) cache: Option<Arc<dyn ResponseCache>>,
}

/// Trakt API client.
///
/// Cheap to clone; clones share authentication state, the poll session and the cache.
#[derive(Clone)]
pub struct TraktClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TraktClient {
    /// Create a client with the reqwest transport.
    pub fn new(config: TraktConfig) -> TraktResult<Self> {
        TraktClientBuilder::new(config).build()
    }

    pub fn builder(config: TraktConfig) -> TraktClientBuilder {
        TraktClientBuilder::new(config)
    }

    /// Create a client from `TRAKT_*` environment variables.
    pub fn from_env() -> TraktResult<Self> {
        Self::new(TraktConfig::from_env()?)
    }

    pub fn config(&self) -> &TraktConfig {
        &self.inner.config
    }

    /// Whether the configured endpoint is a staging environment.
    pub fn is_staging(&self) -> bool {
        self.inner.config.is_staging()
    }

    pub fn redirect_uri(&self) -> &str {
        &self.inner.config.redirect_uri
    }

    /// Current authentication state.
    pub fn auth(&self) -> TraktClientAuthentication {
        self.inner.auth.snapshot()
    }

    /// Replaces the authentication state with `f(current)` in one step.
    pub fn update_auth<F>(&self, f: F) -> TraktClientAuthentication
    where
        F: FnOnce(&TraktClientAuthentication) -> TraktClientAuthentication,
    {
        self.inner.auth.update(f)
    }

    /// Observe every replacement of the authentication state.
    pub fn subscribe_auth(&self) -> watch::Receiver<TraktClientAuthentication> {
        self.inner.auth.subscribe()
    }

    /// Headers for a call, enforcing the token presence and expiry contract.
    pub fn build_headers(&self, template: &ApiTemplate) -> TraktResult<HashMap<String, String>> {
        let config = &self.inner.config;
        let mut request_headers = HashMap::from([
            (headers::USER_AGENT.to_string(), config.user_agent.clone()),
            (
                headers::CONTENT_TYPE.to_string(),
                headers::CONTENT_TYPE_JSON.to_string(),
            ),
            (headers::TRAKT_API_VERSION.to_string(), API_VERSION.to_string()),
            (headers::TRAKT_API_KEY.to_string(), config.client_id.clone()),
        ]);

        let auth = self.auth();
        match (template.opts.auth, &auth.access_token) {
            (AuthRequirement::Required, None) => {
                return Err(TraktError::invalid_parameter(MISSING_ACCESS_TOKEN));
            }
            (requirement, Some(token)) if requirement.is_requested() => {
                if !auth.expires.is_some_and(|e| e > now_millis()) {
                    return Err(TraktError::expired_token(
                        "OAuth required: access_token has expired",
                    ));
                }
                request_headers.insert(
                    headers::AUTHORIZATION.to_string(),
                    format!("Bearer {token}"),
                );
            }
            _ => {}
        }

        Ok(request_headers)
    }

    /// Resolves the URL of a call without issuing it.
    pub fn resolve(&self, template: &ApiTemplate, params: &RequestParams) -> TraktResult<Url> {
        build_request(template, params, &self.inner.config.endpoint).map(|built| built.url)
    }

    fn prepare(
        &self,
        template: &ApiTemplate,
        params: &RequestParams,
        init: Option<RequestInit>,
    ) -> TraktResult<HttpRequest> {
        let headers = self.build_headers(template)?;
        let built = build_request(template, params, &self.inner.config.endpoint)?;

        let mut init = init.unwrap_or_default();
        if init.timeout.is_none() {
            init.timeout = Some(self.inner.config.timeout);
        }

        Ok(HttpRequest {
            method: template.method,
            url: built.url.into(),
            headers,
            body: built.body,
            init,
        })
    }

    /// Issues a call and enriches its response.
    #[instrument(skip_all, fields(method = template.method.as_str(), template = template.url))]
    pub async fn call(
        &self,
        template: &ApiTemplate,
        params: &RequestParams,
        init: Option<RequestInit>,
    ) -> TraktResult<EnrichedResponse> {
        let request = self.prepare(template, params, init)?;
        tracing::debug!(url = %request.url, "Sending request");

        let response = self.inner.transport.send(request).await?;
        parse_response(response, Some(template))
    }

    /// Issues a call to a registered endpoint by logical name.
    pub async fn call_endpoint(
        &self,
        name: &str,
        params: &RequestParams,
        init: Option<RequestInit>,
    ) -> TraktResult<EnrichedResponse> {
        let template = endpoints::registry()
            .get(name)
            .ok_or_else(|| TraktError::invalid_parameter(format!("Unknown endpoint: '{name}'")))?;
        self.call(template, params, init).await
    }

    /// Issues a call through the configured cache.
    ///
    /// Without a cache this is a plain call. Failed calls evict their key.
    pub async fn call_cached(
        &self,
        template: &ApiTemplate,
        params: &RequestParams,
        init: Option<RequestInit>,
    ) -> TraktResult<EnrichedResponse> {
        let Some(cache) = self.inner.cache.clone() else {
            return self.call(template, params, init).await;
        };

        let built = build_request(template, params, &self.inner.config.endpoint)?;
        let key = format!(
            "{} {} {}",
            template.method.as_str(),
            built.url,
            built.body.unwrap_or_default()
        );

        if let Some(hit) = cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(hit);
        }

        match self.call(template, params, init).await {
            Ok(response) => {
                cache.set(&key, response.clone());
                Ok(response)
            }
            Err(e) => {
                cache.delete(&key);
                Err(e)
            }
        }
    }

    /// Empties the configured cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.clear();
        }
    }
}

impl std::fmt::Debug for TraktClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraktClient")
            .field("config", &self.inner.config)
            .field("auth", &self.auth())
            .field("polling", &self.is_polling())
            .finish()
    }
}

/// Builder for TraktClient.
pub struct TraktClientBuilder {
    config: TraktConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: TraktClientAuthentication,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl TraktClientBuilder {
    pub fn new(config: TraktConfig) -> Self {
        Self {
            config,
            transport: None,
            auth: TraktClientAuthentication::default(),
            cache: None,
        }
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the initial authentication state.
    pub fn authentication(mut self, auth: TraktClientAuthentication) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the response cache used by cached calls.
    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> TraktResult<TraktClient> {
        self.config.validate()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestHttpTransport::new(self.config.timeout)?),
        };

        Ok(TraktClient {
            inner: Arc::new(ClientInner {
                config: self.config,
                transport,
                auth: AuthStore::new(self.auth),
                polling: Mutex::new(None),
                poll: Mutex::new(None),
                cache: self.cache,
            }),
        })
    }
}
