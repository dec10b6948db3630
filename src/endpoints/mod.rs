//! Endpoint Registry
//!
//! Declarative templates for the Trakt API, addressable by logical name
//! (`"movies.trending"`, `"authentication.oauth.token.code"`, ...).

pub mod authentication;
pub mod calendars;
pub mod checkin;
pub mod common;
pub mod movies;
pub mod search;
pub mod shows;
pub mod sync;
pub mod users;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::template::ApiTemplate;

/// Name to template lookup over every declared endpoint.
#[derive(Debug)]
pub struct EndpointRegistry {
    templates: HashMap<&'static str, &'static ApiTemplate>,
}

impl EndpointRegistry {
    fn new() -> Self {
        let groups: [&[(&'static str, &'static ApiTemplate)]; 9] = [
            authentication::ENDPOINTS,
            calendars::ENDPOINTS,
            checkin::ENDPOINTS,
            common::ENDPOINTS,
            movies::ENDPOINTS,
            search::ENDPOINTS,
            shows::ENDPOINTS,
            sync::ENDPOINTS,
            users::ENDPOINTS,
        ];

        let templates = groups
            .into_iter()
            .flat_map(|group| group.iter().copied())
            .collect();
        Self { templates }
    }

    pub fn get(&self, name: &str) -> Option<&'static ApiTemplate> {
        self.templates.get(name).copied()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.templates.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

static REGISTRY: LazyLock<EndpointRegistry> = LazyLock::new(EndpointRegistry::new);

/// The process-wide endpoint registry.
pub fn registry() -> &'static EndpointRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HttpMethod;
    use crate::template::{build_request, AuthRequirement, RequestParams};
    use serde_json::json;

    const ENDPOINT: &str = "https://api.trakt.tv";

    #[test]
    fn test_registry_has_no_duplicate_names() {
        let declared: usize = [
            authentication::ENDPOINTS.len(),
            calendars::ENDPOINTS.len(),
            checkin::ENDPOINTS.len(),
            common::ENDPOINTS.len(),
            movies::ENDPOINTS.len(),
            search::ENDPOINTS.len(),
            shows::ENDPOINTS.len(),
            sync::ENDPOINTS.len(),
            users::ENDPOINTS.len(),
        ]
        .iter()
        .sum();
        assert_eq!(registry().len(), declared);
        assert!(!registry().is_empty());
    }

    #[test]
    fn test_registry_lookup() {
        let template = registry().get("authentication.oauth.token.code").unwrap();
        assert_eq!(template.method, HttpMethod::Post);
        assert_eq!(template.url, "/oauth/token");
        assert!(std::ptr::eq(template, &authentication::TOKEN_CODE));
        assert!(registry().get("movies.unknown").is_none());
        assert!(registry().names().contains(&"calendars.my.shows.get"));
    }

    #[test]
    fn test_every_template_path_is_absolute() {
        for name in registry().names() {
            let template = registry().get(name).unwrap();
            assert!(template.url.starts_with('/'), "{name}");
        }
    }

    #[test]
    fn test_calendar_requires_auth_and_shortens_date() {
        let template = &calendars::MY_SHOWS;
        assert_eq!(template.opts.auth, AuthRequirement::Required);

        let params = RequestParams::new()
            .param("start_date", "2024-02-01T10:30:00.000Z")
            .param("days", 7);
        let built = build_request(template, &params, ENDPOINT).unwrap();
        assert_eq!(
            built.url.as_str(),
            "https://api.trakt.tv/calendars/my/shows/2024-02-01/7"
        );
    }

    #[test]
    fn test_calendar_rejects_malformed_date() {
        let params = RequestParams::new().param("start_date", "01/02/2024");
        let error = build_request(&calendars::ALL_MOVIES, &params, ENDPOINT).unwrap_err();
        assert!(error.to_string().starts_with("Invalid 'start_date' format, found '01/02/2024'"));
    }

    #[test]
    fn test_authorize_url() {
        let params = RequestParams::new()
            .param("response_type", "code")
            .param("client_id", "client_id")
            .param("redirect_uri", "urn:ietf:wg:oauth:2.0:oob")
            .param("state", "abc");
        let built = build_request(&authentication::AUTHORIZE, &params, "https://trakt.tv").unwrap();
        assert_eq!(
            built.url.as_str(),
            "https://trakt.tv/oauth/authorize?response_type=code&client_id=client_id&redirect_uri=urn%3Aietf%3Awg%3Aoauth%3A2.0%3Aoob&state=abc"
        );
        assert_eq!(built.body, None);
    }

    #[test]
    fn test_scrobble_requires_progress() {
        let params = RequestParams::new().param("movie", json!({ "ids": { "trakt": 1 } }));
        let error = build_request(&checkin::SCROBBLE_START, &params, ENDPOINT).unwrap_err();
        assert_eq!(error.to_string(), "Missing mandatory body parameter: 'progress'");
    }

    #[test]
    fn test_movies_trending_rejects_show_filter() {
        let params = RequestParams::new().filter("network_ids", "53");
        let error = build_request(&movies::TRENDING, &params, ENDPOINT).unwrap_err();
        assert_eq!(error.to_string(), "Filter is not supported: 'network_ids'");
    }

    #[test]
    fn test_search_text_url() {
        let params = RequestParams::new()
            .param("type", "movie,show")
            .param("query", "tron")
            .page(2);
        let built = build_request(&search::TEXT, &params, ENDPOINT).unwrap();
        assert_eq!(
            built.url.as_str(),
            "https://api.trakt.tv/search/movie,show?query=tron&page=2"
        );
    }
}
