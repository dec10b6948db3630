//! Authentication State
//!
//! Token payloads returned by the OAuth endpoints and the client-owned
//! authentication record with its atomic store.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Current epoch time in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Authentication record owned by the client.
///
/// `expires` and `created` are absolute epoch milliseconds.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktClientAuthentication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    /// CSRF state of the pending authorization redirect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TraktClientAuthentication {
    /// True when a token is present and its expiry is still ahead of `now`.
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.access_token.is_some() && self.expires.is_some_and(|e| e > now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_millis())
    }

    /// True when `expires` is set and already past.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires.is_some_and(|e| e < now)
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "[REDACTED]"
    } else {
        "None"
    }
}

impl fmt::Debug for TraktClientAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraktClientAuthentication")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires", &self.expires)
            .field("created", &self.created)
            .field("state", &self.state)
            .finish()
    }
}

/// Token payload from `/oauth/token` and `/oauth/device/token`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktAuthentication {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    /// Issue time in epoch seconds.
    pub created_at: i64,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl fmt::Debug for TraktAuthentication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraktAuthentication")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("refresh_token", &"[REDACTED]")
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Device-code poll session descriptor from `/oauth/device/code`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktDeviceAuthentication {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    /// Seconds from poll start until the code expires.
    pub expires_in: u64,
    /// Seconds between poll attempts.
    pub interval: f64,
}

/// Merges a token payload into the authentication record, keeping unrelated fields.
pub fn parse_auth_response(
    response: &TraktAuthentication,
    auth: &TraktClientAuthentication,
) -> TraktClientAuthentication {
    TraktClientAuthentication {
        access_token: Some(response.access_token.clone()),
        refresh_token: Some(response.refresh_token.clone()),
        created: Some(response.created_at * 1000),
        expires: Some((response.created_at + response.expires_in) * 1000),
        ..auth.clone()
    }
}

/// Single-writer store for the authentication record.
///
/// Every change replaces the whole record in one step; subscribers see each replacement.
#[derive(Debug)]
pub struct AuthStore {
    sender: watch::Sender<TraktClientAuthentication>,
}

impl AuthStore {
    pub fn new(initial: TraktClientAuthentication) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Copy of the current record.
    pub fn snapshot(&self) -> TraktClientAuthentication {
        self.sender.borrow().clone()
    }

    /// Applies `f` to the current record and stores the result atomically.
    pub fn update<F>(&self, f: F) -> TraktClientAuthentication
    where
        F: FnOnce(&TraktClientAuthentication) -> TraktClientAuthentication,
    {
        let mut next = TraktClientAuthentication::default();
        self.sender.send_modify(|current| {
            *current = f(current);
            next = current.clone();
        });
        next
    }

    pub fn replace(&self, auth: TraktClientAuthentication) -> TraktClientAuthentication {
        self.update(|_| auth)
    }

    pub fn subscribe(&self) -> watch::Receiver<TraktClientAuthentication> {
        self.sender.subscribe()
    }
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(TraktClientAuthentication::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> TraktAuthentication {
        TraktAuthentication {
            access_token: "access-123".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 7200,
            refresh_token: "refresh-456".to_string(),
            scope: "public".to_string(),
            created_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_parse_auth_response_computes_absolute_expiry() {
        let previous = TraktClientAuthentication {
            state: Some("state".to_string()),
            ..Default::default()
        };
        let auth = parse_auth_response(&token(), &previous);

        assert_eq!(auth.access_token.as_deref(), Some("access-123"));
        assert_eq!(auth.refresh_token.as_deref(), Some("refresh-456"));
        assert_eq!(auth.created, Some(1_700_000_000_000));
        assert_eq!(auth.expires, Some(1_700_007_200_000));
        assert_eq!(auth.state.as_deref(), Some("state"));
    }

    #[test]
    fn test_validity() {
        let auth = parse_auth_response(&token(), &TraktClientAuthentication::default());
        assert!(auth.is_valid_at(1_700_000_000_000));
        assert!(!auth.is_valid_at(1_700_007_200_000));
        assert!(auth.is_expired_at(1_700_007_200_001));
        assert!(!TraktClientAuthentication::default().is_valid());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let auth = parse_auth_response(&token(), &TraktClientAuthentication::default());
        let debug = format!("{auth:?} {:?}", token());
        assert!(!debug.contains("access-123"));
        assert!(!debug.contains("refresh-456"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_token_payload_deserializes() {
        let payload: TraktAuthentication = serde_json::from_str(
            r#"{"access_token":"a","token_type":"bearer","expires_in":7776000,"refresh_token":"r","scope":"public","created_at":1487889741}"#,
        )
        .unwrap();
        assert_eq!(payload.expires_in, 7_776_000);

        let device: TraktDeviceAuthentication = serde_json::from_str(
            r#"{"device_code":"d","user_code":"5055CC52","verification_url":"https://trakt.tv/activate","expires_in":600,"interval":5}"#,
        )
        .unwrap();
        assert_eq!(device.interval, 5.0);
    }

    #[tokio::test]
    async fn test_store_update_notifies_subscribers() {
        let store = AuthStore::default();
        let mut receiver = store.subscribe();

        let next = store.update(|current| TraktClientAuthentication {
            access_token: Some("token".to_string()),
            ..current.clone()
        });

        assert_eq!(next.access_token.as_deref(), Some("token"));
        receiver.changed().await.unwrap();
        assert_eq!(receiver.borrow().access_token.as_deref(), Some("token"));
        assert_eq!(store.snapshot(), next);
    }
}
