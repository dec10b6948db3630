//! End-to-end tests of the request pipeline against a mock HTTP server.

use integrations_trakt::core::{RedirectMode, RequestInit};
use integrations_trakt::endpoints::{self, calendars, common, movies, sync};
use integrations_trakt::response::{RateLimit, ResponsePagination, ResponseSort};
use integrations_trakt::types::{TraktCalendarShow, TraktGenre, TraktTrendingMovie};
use integrations_trakt::{
    RequestParams, TraktClient, TraktClientAuthentication, TraktConfig, TraktError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, TraktClient) {
    let server = MockServer::start().await;
    let config = TraktConfig::builder()
        .endpoint(server.uri())
        .client_id("client_id")
        .client_secret("client_secret")
        .user_agent("integration-tests")
        .build()
        .expect("valid config");
    let client = TraktClient::new(config).expect("client");
    (server, client)
}

fn valid_auth() -> TraktClientAuthentication {
    let now = chrono::Utc::now().timestamp_millis();
    TraktClientAuthentication {
        access_token: Some("access_token".to_string()),
        refresh_token: Some("refresh_token".to_string()),
        expires: Some(now + 3_600_000),
        created: Some(now),
        state: None,
    }
}

#[tokio::test]
async fn test_trending_movies_with_filters_and_headers() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/movies/trending"))
        .and(query_param("genres", "action,adventure"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .and(query_param("extended", "full"))
        .and(header("trakt-api-key", "client_id"))
        .and(header("trakt-api-version", "2"))
        .and(header("user-agent", "integration-tests"))
        .and(header("content-type", "application/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-pagination-item-count", "120")
                .insert_header("x-pagination-page-count", "12")
                .insert_header("x-pagination-limit", "10")
                .insert_header("x-pagination-page", "2")
                .insert_header("x-sort-by", "rank")
                .insert_header("x-sort-how", "asc")
                .set_body_json(json!([{
                    "watchers": 21,
                    "movie": { "title": "TRON: Legacy", "year": 2010, "ids": { "trakt": 1 } }
                }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = RequestParams::new()
        .filter("genres", json!(["action", "adventure"]))
        .page(2)
        .limit(10)
        .extended("full");
    let response = client.call(&movies::TRENDING, &params, None).await.unwrap();

    assert_eq!(
        response.pagination,
        Some(ResponsePagination {
            item_count: Some(120),
            page_count: 12,
            limit: Some(10),
            page: 2,
        })
    );
    assert_eq!(
        response.sort,
        Some(ResponseSort {
            by: Some("rank".to_string()),
            how: Some("asc".to_string()),
        })
    );
    assert_eq!(response.vip, None);

    let items: Vec<TraktTrendingMovie> = response.json().unwrap();
    assert_eq!(items[0].movie.title, "TRON: Legacy");
}

#[tokio::test]
async fn test_paginated_endpoint_defaults_pagination() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = client
        .call(&common::NETWORKS, &RequestParams::new(), None)
        .await
        .unwrap();
    assert_eq!(response.pagination, Some(ResponsePagination::default()));
    assert_eq!(response.limit, None);
}

#[tokio::test]
async fn test_call_endpoint_by_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/genres/movies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "name": "Action", "slug": "action" }])),
        )
        .mount(&server)
        .await;

    let response = client
        .call_endpoint("genres", &RequestParams::new().param("type", "movies"), None)
        .await
        .unwrap();
    let genres: Vec<TraktGenre> = response.json().unwrap();
    assert_eq!(genres[0].slug, "action");
    assert!(endpoints::registry().get("genres").is_some());
}

#[tokio::test]
async fn test_authenticated_calendar() {
    let (server, client) = setup().await;
    client.update_auth(|_| valid_auth());

    Mock::given(method("GET"))
        .and(path("/calendars/my/shows/2024-02-01/7"))
        .and(header("authorization", "Bearer access_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-start-date", "2024-02-01T00:00:00Z")
                .insert_header("x-end-date", "2024-02-08T00:00:00Z")
                .set_body_json(json!([{
                    "first_aired": "2024-02-02T01:00:00.000Z",
                    "episode": { "season": 7, "number": 4, "title": "Hitler", "ids": { "trakt": 443 } },
                    "show": { "title": "True Blood", "year": 2008, "ids": { "trakt": 5 } }
                }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    // 2024-02-01T10:30:00Z as epoch millis.
    let params = RequestParams::new()
        .param("start_date", 1_706_783_400_000_i64)
        .param("days", 7);
    let response = client.call(&calendars::MY_SHOWS, &params, None).await.unwrap();

    let interval = response.interval.clone().unwrap();
    assert_eq!(interval.start.as_deref(), Some("2024-02-01T00:00:00Z"));
    let shows: Vec<TraktCalendarShow> = response.json().unwrap();
    assert_eq!(shows[0].episode.number, 4);
}

#[tokio::test]
async fn test_post_body_is_json() {
    let (server, client) = setup().await;
    client.update_auth(|_| valid_auth());

    let movies = json!([{ "ids": { "trakt": 1 }, "watched_at": "2024-02-01T10:00:00.000Z" }]);
    Mock::given(method("POST"))
        .and(path("/sync/history"))
        .and(body_json(json!({ "movies": movies })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "added": { "movies": 1 } })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .call(&sync::ADD_HISTORY, &RequestParams::new().param("movies", movies), None)
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_error_status_carries_response() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/movies/unknown-movie"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let error = client
        .call(&movies::SUMMARY, &RequestParams::new().param("id", "unknown-movie"), None)
        .await
        .unwrap_err();

    assert!(matches!(error, TraktError::ApiResponse { status: 404, .. }));
    assert_eq!(error.to_string(), "404: Not Found - method exists, but no record found");
}

#[tokio::test]
async fn test_rate_limit_metadata() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/networks"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "x-ratelimit",
                    r#"{"name":"UNAUTHED_API_GET_LIMIT","period":300,"limit":1000,"remaining":999,"until":"2024-02-01T10:05:00Z"}"#,
                )
                .insert_header("retry-after", "30")
                .set_body_json(json!([])),
        )
        .mount(&server)
        .await;

    let response = client
        .call(&common::NETWORKS, &RequestParams::new(), None)
        .await
        .unwrap();
    let limit = response.limit.unwrap();
    assert_eq!(
        limit.rate,
        Some(RateLimit {
            name: "UNAUTHED_API_GET_LIMIT".to_string(),
            period: 300,
            limit: 1000,
            remaining: 999,
            until: "2024-02-01T10:05:00Z".to_string(),
        })
    );
    assert_eq!(limit.retry, Some(30));
}

#[tokio::test]
async fn test_manual_redirect_is_opaque() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/certifications/movies"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", "https://trakt.tv/auth/signin"),
        )
        .mount(&server)
        .await;

    let response = client
        .call(
            &common::CERTIFICATIONS,
            &RequestParams::new().param("type", "movies"),
            Some(RequestInit {
                redirect: RedirectMode::Manual,
                ..RequestInit::default()
            }),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 302);
    assert!(response.inner.is_opaque_redirect());
    assert_eq!(response.header("location"), Some("https://trakt.tv/auth/signin"));
}
