//! Token lifecycle: exchange, refresh, import and revoke.

use tracing::instrument;

use super::handle_error;
use crate::auth::{now_millis, parse_auth_response, TraktAuthentication, TraktClientAuthentication};
use crate::client::TraktClient;
use crate::endpoints::authentication;
use crate::error::{TraktError, TraktResult, MISSING_REFRESH_TOKEN};
use crate::template::RequestParams;

/// What is traded for a new token pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Grant {
    Code(String),
    Refresh(String),
}

impl Grant {
    fn grant_type(&self) -> &'static str {
        match self {
            Self::Code(_) => "authorization_code",
            Self::Refresh(_) => "refresh_token",
        }
    }
}

impl TraktClient {
    /// Posts the grant to the token endpoint and stores the resulting tokens.
    #[instrument(skip_all, fields(grant_type = grant.grant_type()))]
    pub(crate) async fn exchange(&self, grant: Grant) -> TraktResult<TraktClientAuthentication> {
        let config = self.config();
        let params = RequestParams::new()
            .param("client_id", config.client_id.clone())
            .param("client_secret", config.client_secret().to_string())
            .param("redirect_uri", config.redirect_uri.clone())
            .param("grant_type", grant.grant_type());

        let (template, params) = match grant {
            Grant::Code(code) => (&authentication::TOKEN_CODE, params.param("code", code)),
            Grant::Refresh(token) => (
                &authentication::TOKEN_REFRESH,
                params.param("refresh_token", token),
            ),
        };

        let response = self
            .call(template, &params, None)
            .await
            .map_err(handle_error)?;
        let body: TraktAuthentication = response.json()?;

        Ok(self.update_auth(|auth| parse_auth_response(&body, auth)))
    }

    /// Trades a refresh token for a new token pair.
    ///
    /// Uses the stored refresh token when `refresh_token` is `None`.
    pub async fn refresh_token(
        &self,
        refresh_token: Option<&str>,
    ) -> TraktResult<TraktClientAuthentication> {
        let token = match refresh_token {
            Some(token) => Some(token.to_string()),
            None => self.auth().refresh_token,
        }
        .filter(|token| !token.is_empty())
        .ok_or_else(|| TraktError::invalid_parameter(MISSING_REFRESH_TOKEN))?;

        self.exchange(Grant::Refresh(token)).await
    }

    /// Restores a previously persisted authentication.
    ///
    /// An already expired record is refreshed with its own refresh token instead of being stored.
    pub async fn import_authentication(
        &self,
        auth: TraktClientAuthentication,
    ) -> TraktResult<TraktClientAuthentication> {
        if auth.is_expired_at(now_millis()) {
            tracing::debug!("Imported authentication expired, refreshing");
            return self.refresh_token(auth.refresh_token.as_deref()).await;
        }
        Ok(self.inner.auth.replace(auth))
    }

    /// Revokes the access token and clears the stored authentication.
    ///
    /// Expired tokens are not sent to the server; local state is cleared either way.
    #[instrument(skip_all)]
    pub async fn revoke_authentication(&self) -> TraktResult<()> {
        let auth = self.auth();
        let token = auth
            .access_token
            .clone()
            .ok_or_else(|| TraktError::invalid_parameter("No access token found."))?;

        if auth.expires.is_some_and(|expires| expires > now_millis()) {
            let config = self.config();
            let params = RequestParams::new()
                .param("token", token)
                .param("client_id", config.client_id.clone())
                .param("client_secret", config.client_secret().to_string());
            self.call(&authentication::REVOKE, &params, None).await?;
        }

        self.inner.auth.replace(TraktClientAuthentication::default());
        Ok(())
    }
}
