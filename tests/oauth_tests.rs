//! OAuth lifecycle tests over the reqwest transport.

use integrations_trakt::{
    AuthorizeRequest, PollingState, TraktClient, TraktClientAuthentication, TraktConfig,
    TraktDeviceAuthentication, TraktError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

async fn setup() -> (MockServer, TraktClient) {
    let server = MockServer::start().await;
    let config = TraktConfig::builder()
        .endpoint(server.uri())
        .client_id("client_id")
        .client_secret("client_secret")
        .redirect_uri(REDIRECT_URI)
        .build()
        .expect("valid config");
    let client = TraktClient::new(config).expect("client");
    (server, client)
}

fn token_body() -> Value {
    json!({
        "access_token": "access_token",
        "refresh_token": "refresh_token",
        "expires_in": 7_776_000,
        "created_at": 1_706_783_400,
        "token_type": "bearer",
        "scope": "public",
    })
}

fn expected_auth(state: Option<&str>) -> TraktClientAuthentication {
    TraktClientAuthentication {
        access_token: Some("access_token".to_string()),
        refresh_token: Some("refresh_token".to_string()),
        expires: Some((1_706_783_400 + 7_776_000) * 1000),
        created: Some(1_706_783_400_000),
        state: state.map(str::to_string),
    }
}

#[tokio::test]
async fn test_authorization_code_flow() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/oauth/authorize"))
        .and(query_param("response_type", "code"))
        .and(query_param("client_id", "client_id"))
        .and(query_param("redirect_uri", REDIRECT_URI))
        .and(query_param("state", "0e44c45dd73fb296"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "https://trakt.tv/auth/signin"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(json!({
            "client_id": "client_id",
            "client_secret": "client_secret",
            "redirect_uri": REDIRECT_URI,
            "grant_type": "authorization_code",
            "code": "redirect_code",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .redirect_to_authentication(AuthorizeRequest::new().with_state("0e44c45dd73fb296"))
        .await
        .unwrap();
    assert!(response.inner.is_opaque_redirect());

    let auth = client
        .exchange_code_for_token("redirect_code", Some("0e44c45dd73fb296"))
        .await
        .unwrap();
    assert_eq!(auth, expected_auth(Some("0e44c45dd73fb296")));
}

#[tokio::test]
async fn test_invalid_csrf_makes_no_call() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(0)
        .mount(&server)
        .await;

    client
        .redirect_to_authentication_url(AuthorizeRequest::new().with_state("expected"))
        .unwrap();
    let error = client
        .exchange_code_for_token("redirect_code", Some("forged"))
        .await
        .unwrap_err();

    assert!(matches!(error, TraktError::InvalidCsrf { .. }));
    assert!(!error.needs_reauth());
}

#[tokio::test]
async fn test_refresh_unauthorized_uses_www_authenticate() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("www-authenticate", r#"Bearer error="invalid_grant""#),
        )
        .mount(&server)
        .await;

    let error = client.refresh_token(Some("stale")).await.unwrap_err();
    assert!(matches!(error, TraktError::Unauthorized { .. }));
    assert_eq!(error.to_string(), r#"Unauthorized: Bearer error="invalid_grant""#);
    assert_eq!(client.auth(), TraktClientAuthentication::default());
}

#[tokio::test]
async fn test_import_then_revoke() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth/revoke"))
        .and(body_json(json!({
            "token": "imported_token",
            "client_id": "client_id",
            "client_secret": "client_secret",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let now = chrono::Utc::now().timestamp_millis();
    let imported = TraktClientAuthentication {
        access_token: Some("imported_token".to_string()),
        refresh_token: Some("imported_refresh".to_string()),
        expires: Some(now + 60_000),
        created: Some(now),
        state: None,
    };
    assert_eq!(client.import_authentication(imported.clone()).await.unwrap(), imported);

    client.revoke_authentication().await.unwrap();
    assert_eq!(client.auth(), TraktClientAuthentication::default());
}

#[tokio::test]
async fn test_device_flow() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/oauth/device/code"))
        .and(body_json(json!({ "client_id": "client_id" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "device_code": "device_code",
            "user_code": "5055CC52",
            "verification_url": "https://trakt.tv/activate",
            "expires_in": 600,
            "interval": 0.01,
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(400))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .and(body_json(json!({
            "client_id": "client_id",
            "client_secret": "client_secret",
            "code": "device_code",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let device: TraktDeviceAuthentication = client.get_device_code().await.unwrap();
    assert_eq!(device.user_code, "5055CC52");

    let polling = client.poll_with_device_code(None).unwrap();
    let auth = tokio::time::timeout(Duration::from_secs(5), polling)
        .await
        .expect("polling settled")
        .unwrap();

    assert_eq!(auth, expected_auth(None));
    assert!(!client.is_polling());
    assert_eq!(client.polling_state(), PollingState::Idle);
}

#[tokio::test]
async fn test_device_polling_cancelled_by_handle() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/oauth/device/token"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let polling = client
        .poll_with_device_code(Some(TraktDeviceAuthentication {
            device_code: "device_code".to_string(),
            user_code: "5055CC52".to_string(),
            verification_url: "https://trakt.tv/activate".to_string(),
            expires_in: 600,
            interval: 0.01,
        }))
        .unwrap();

    let handle = polling.cancel_handle();
    let waiter = tokio::spawn(polling);
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.cancel();
    handle.cancel();

    let outcome = waiter.await.unwrap();
    assert!(matches!(outcome, Err(TraktError::PollingCancelled)));
    assert!(handle.is_cancelled());
    assert!(!client.is_polling());
}
