//! Response Enricher
//!
//! Status checking and header metadata extraction for API responses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::headers;
use crate::core::HttpResponse;
use crate::error::{TraktError, TraktResult};
use crate::template::ApiTemplate;

/// Pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePagination {
    pub item_count: Option<u64>,
    pub page_count: u64,
    pub limit: Option<u64>,
    pub page: u64,
}

impl Default for ResponsePagination {
    fn default() -> Self {
        Self {
            item_count: None,
            page_count: 1,
            limit: None,
            page: 1,
        }
    }
}

/// Requested or applied sort.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSort {
    pub by: Option<String>,
    pub how: Option<String>,
}

/// Date window of a calendar response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseInterval {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// VIP upgrade hints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseVip {
    pub url: Option<String>,
    pub user: Option<String>,
    pub limit: Option<String>,
}

/// Parsed `X-Ratelimit` header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    pub name: String,
    pub period: u64,
    pub limit: u64,
    pub remaining: u64,
    pub until: String,
}

/// Rate-limit metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseLimit {
    pub rate: Option<RateLimit>,
    /// Seconds to wait, from `Retry-After`.
    pub retry: Option<u64>,
}

/// A raw response plus metadata parsed from its headers.
#[derive(Clone, Debug)]
pub struct EnrichedResponse {
    pub inner: HttpResponse,
    pub pagination: Option<ResponsePagination>,
    pub sort: Option<ResponseSort>,
    pub applied_sort: Option<ResponseSort>,
    pub interval: Option<ResponseInterval>,
    pub vip: Option<ResponseVip>,
    pub limit: Option<ResponseLimit>,
}

impl EnrichedResponse {
    pub fn status(&self) -> u16 {
        self.inner.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header(name)
    }

    pub fn text(&self) -> &str {
        &self.inner.body
    }

    /// Deserializes the body.
    pub fn json<T: DeserializeOwned>(&self) -> TraktResult<T> {
        serde_json::from_str(&self.inner.body)
            .map_err(|e| TraktError::deserialization(e.to_string()))
    }

    pub fn into_inner(self) -> HttpResponse {
        self.inner
    }
}

/// Passes opaque redirects and 2xx responses, otherwise fails with an API-response error.
pub fn ensure_response_ok(response: HttpResponse) -> TraktResult<HttpResponse> {
    if response.is_opaque_redirect() {
        return Ok(response);
    }
    if !response.is_ok() || response.status >= 400 {
        return Err(TraktError::from_response(response));
    }
    Ok(response)
}

fn header_string(response: &HttpResponse, name: &str) -> Option<String> {
    response.header(name).map(str::to_string)
}

fn header_number(response: &HttpResponse, name: &str) -> Option<u64> {
    response.header(name).and_then(|v| v.trim().parse().ok())
}

fn any_header(response: &HttpResponse, names: &[&str]) -> bool {
    names.iter().any(|name| response.has_header(name))
}

fn parse_pagination(response: &HttpResponse, seeded: bool) -> Option<ResponsePagination> {
    let present = any_header(
        response,
        &[
            headers::PAGINATION_ITEM_COUNT,
            headers::PAGINATION_PAGE_COUNT,
            headers::PAGINATION_LIMIT,
            headers::PAGINATION_PAGE,
        ],
    );
    if !present && !seeded {
        return None;
    }

    let mut pagination = ResponsePagination::default();
    if let Some(item_count) = header_number(response, headers::PAGINATION_ITEM_COUNT) {
        pagination.item_count = Some(item_count);
    }
    if let Some(page_count) = header_number(response, headers::PAGINATION_PAGE_COUNT) {
        pagination.page_count = page_count;
    }
    if let Some(limit) = header_number(response, headers::PAGINATION_LIMIT) {
        pagination.limit = Some(limit);
    }
    if let Some(page) = header_number(response, headers::PAGINATION_PAGE) {
        pagination.page = page;
    }
    Some(pagination)
}

fn parse_sort(response: &HttpResponse, by: &str, how: &str) -> Option<ResponseSort> {
    any_header(response, &[by, how]).then(|| ResponseSort {
        by: header_string(response, by),
        how: header_string(response, how),
    })
}

fn parse_limit(response: &HttpResponse) -> Option<ResponseLimit> {
    if !any_header(response, &[headers::RATE_LIMIT, headers::RETRY_AFTER]) {
        return None;
    }

    let rate = response
        .header(headers::RATE_LIMIT)
        .and_then(|raw| match serde_json::from_str::<RateLimit>(raw) {
            Ok(rate) => Some(rate),
            Err(e) => {
                tracing::warn!(header = raw, error = %e, "Failed to parse rate limit");
                None
            }
        });

    Some(ResponseLimit {
        rate,
        retry: header_number(response, headers::RETRY_AFTER),
    })
}

/// Checks the status and attaches header metadata.
///
/// Pagination is seeded with defaults when the template declares pagination support.
pub fn parse_response(
    response: HttpResponse,
    template: Option<&ApiTemplate>,
) -> TraktResult<EnrichedResponse> {
    let response = ensure_response_ok(response)?;
    let seeded = template.is_some_and(|t| t.opts.pagination);

    let enriched = EnrichedResponse {
        pagination: parse_pagination(&response, seeded),
        sort: parse_sort(&response, headers::SORT_BY, headers::SORT_HOW),
        applied_sort: parse_sort(
            &response,
            headers::APPLIED_SORT_BY,
            headers::APPLIED_SORT_HOW,
        ),
        interval: any_header(&response, &[headers::START_DATE, headers::END_DATE]).then(|| {
            ResponseInterval {
                start: header_string(&response, headers::START_DATE),
                end: header_string(&response, headers::END_DATE),
            }
        }),
        vip: any_header(
            &response,
            &[headers::UPGRADE_URL, headers::VIP_USER, headers::ACCOUNT_LIMIT],
        )
        .then(|| ResponseVip {
            url: header_string(&response, headers::UPGRADE_URL),
            user: header_string(&response, headers::VIP_USER),
            limit: header_string(&response, headers::ACCOUNT_LIMIT),
        }),
        limit: parse_limit(&response),
        inner: response,
    };

    tracing::debug!(
        status = enriched.inner.status,
        paginated = enriched.pagination.is_some(),
        "Parsed response"
    );

    Ok(enriched)
}
