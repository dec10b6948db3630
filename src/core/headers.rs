//! Header names sent to and read from the Trakt API.

pub const TRAKT_API_KEY: &str = "trakt-api-key";
pub const TRAKT_API_VERSION: &str = "trakt-api-version";
pub const CONTENT_TYPE: &str = "content-type";
pub const USER_AGENT: &str = "user-agent";
pub const AUTHORIZATION: &str = "authorization";
pub const WWW_AUTHENTICATE: &str = "www-authenticate";

pub const CONTENT_TYPE_JSON: &str = "application/json";

// Pagination
pub const PAGINATION_ITEM_COUNT: &str = "x-pagination-item-count";
pub const PAGINATION_PAGE_COUNT: &str = "x-pagination-page-count";
pub const PAGINATION_LIMIT: &str = "x-pagination-limit";
pub const PAGINATION_PAGE: &str = "x-pagination-page";

// Sorting
pub const SORT_BY: &str = "x-sort-by";
pub const SORT_HOW: &str = "x-sort-how";
pub const APPLIED_SORT_BY: &str = "x-applied-sort-by";
pub const APPLIED_SORT_HOW: &str = "x-applied-sort-how";

// Date interval
pub const START_DATE: &str = "x-start-date";
pub const END_DATE: &str = "x-end-date";

// VIP
pub const UPGRADE_URL: &str = "x-upgrade-url";
pub const VIP_USER: &str = "x-vip-user";
pub const ACCOUNT_LIMIT: &str = "x-account-limit";

// Rate limiting
pub const RATE_LIMIT: &str = "x-ratelimit";
pub const RETRY_AFTER: &str = "retry-after";
