//! Authorization Code Flow
//!
//! Sends the user to the Trakt consent page, then exchanges the returned code
//! for tokens after checking the CSRF state.

use rand::Rng;
use tracing::instrument;

use super::token::Grant;
use crate::auth::TraktClientAuthentication;
use crate::client::TraktClient;
use crate::core::{CredentialsMode, RedirectMode, RequestInit};
use crate::endpoints::authentication;
use crate::error::{TraktError, TraktResult};
use crate::response::EnrichedResponse;
use crate::template::RequestParams;

/// Options for the authorization redirect. Every field falls back to a client default.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthorizeRequest {
    /// Redirect mode for the consent request, manual by default.
    pub redirect: Option<RedirectMode>,
    /// Overrides the configured redirect URI.
    pub redirect_uri: Option<String>,
    /// CSRF state; a random one is generated when absent.
    pub state: Option<String>,
    /// Show the sign-up page instead of the sign-in page.
    pub signup: Option<bool>,
    /// Force the user to sign in again (`login`).
    pub prompt: Option<String>,
}

impl AuthorizeRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_redirect(mut self, redirect: RedirectMode) -> Self {
        self.redirect = Some(redirect);
        self
    }

    pub fn with_signup(mut self, signup: bool) -> Self {
        self.signup = Some(signup);
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

/// Random CSRF state: 8 random bytes, hex encoded.
pub fn generate_state() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    hex::encode(bytes)
}

impl TraktClient {
    /// Stores the CSRF state and builds the authorize call parameters.
    fn authorize_params(&self, request: &AuthorizeRequest) -> RequestParams {
        let state = request.state.clone().unwrap_or_else(generate_state);
        let auth = self.update_auth(|auth| TraktClientAuthentication {
            state: Some(state),
            ..auth.clone()
        });

        let redirect_uri = request
            .redirect_uri
            .clone()
            .unwrap_or_else(|| self.redirect_uri().to_string());

        let mut params = RequestParams::new()
            .param("response_type", "code")
            .param("client_id", self.config().client_id.clone())
            .param("redirect_uri", redirect_uri)
            .param("state", auth.state.unwrap_or_default());
        if let Some(signup) = request.signup {
            params.set("signup", signup);
        }
        if let Some(prompt) = &request.prompt {
            params.set("prompt", prompt.clone());
        }
        params
    }

    /// Issues the consent request without following redirects.
    ///
    /// The returned response is usually an opaque redirect to the consent page.
    /// Exchange the code the user comes back with through
    /// [`exchange_code_for_token`](Self::exchange_code_for_token).
    #[instrument(skip_all)]
    pub async fn redirect_to_authentication(
        &self,
        request: AuthorizeRequest,
    ) -> TraktResult<EnrichedResponse> {
        let params = self.authorize_params(&request);
        let init = RequestInit {
            redirect: request.redirect.unwrap_or(RedirectMode::Manual),
            credentials: CredentialsMode::Omit,
            ..RequestInit::default()
        };
        self.call(&authentication::AUTHORIZE, &params, Some(init)).await
    }

    /// Consent page URL for the user to open.
    pub fn redirect_to_authentication_url(&self, request: AuthorizeRequest) -> TraktResult<String> {
        let params = self.authorize_params(&request);
        self.resolve(&authentication::AUTHORIZE, &params)
            .map(String::from)
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// A supplied `state` must match the one stored by the redirect, otherwise no call is made.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> TraktResult<TraktClientAuthentication> {
        if let Some(state) = state.filter(|s| !s.is_empty()) {
            let expected = self.auth().state;
            if expected.as_deref() != Some(state) {
                return Err(TraktError::InvalidCsrf {
                    state: state.to_string(),
                    expected,
                });
            }
        }
        self.exchange(Grant::Code(code.to_string())).await
    }
}
