//! Filter Validator
//!
//! Known query filters and the per-filter value rules applied before a filter
//! is written to the query string.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

use crate::error::{TraktError, TraktResult};

/// A query filter understood by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraktApiFilter {
    Query,
    Years,
    Genres,
    Languages,
    Countries,
    Runtimes,
    StudioIds,
    Certifications,
    Networks,
    NetworkIds,
    Status,
    Ratings,
    Votes,
    TmdbRatings,
    TmdbVotes,
    ImdbRatings,
    ImdbVotes,
    RtMeters,
    RtUserMeters,
    Metascores,
}

/// Filters accepted by most movie and show listings.
pub const COMMON_FILTERS: &[TraktApiFilter] = &[
    TraktApiFilter::Query,
    TraktApiFilter::Years,
    TraktApiFilter::Genres,
    TraktApiFilter::Languages,
    TraktApiFilter::Countries,
    TraktApiFilter::Runtimes,
    TraktApiFilter::StudioIds,
];

/// Rating and vote range filters.
pub const RATING_FILTERS: &[TraktApiFilter] = &[
    TraktApiFilter::Ratings,
    TraktApiFilter::Votes,
    TraktApiFilter::TmdbRatings,
    TraktApiFilter::TmdbVotes,
    TraktApiFilter::ImdbRatings,
    TraktApiFilter::ImdbVotes,
    TraktApiFilter::RtMeters,
    TraktApiFilter::RtUserMeters,
    TraktApiFilter::Metascores,
];

/// Filters accepted by movie listings.
pub const MOVIE_FILTERS: &[TraktApiFilter] = &[
    TraktApiFilter::Query,
    TraktApiFilter::Years,
    TraktApiFilter::Genres,
    TraktApiFilter::Languages,
    TraktApiFilter::Countries,
    TraktApiFilter::Runtimes,
    TraktApiFilter::StudioIds,
    TraktApiFilter::Certifications,
    TraktApiFilter::Ratings,
    TraktApiFilter::Votes,
    TraktApiFilter::TmdbRatings,
    TraktApiFilter::TmdbVotes,
    TraktApiFilter::ImdbRatings,
    TraktApiFilter::ImdbVotes,
    TraktApiFilter::RtMeters,
    TraktApiFilter::RtUserMeters,
    TraktApiFilter::Metascores,
];

/// Filters accepted by show listings.
pub const SHOW_FILTERS: &[TraktApiFilter] = &[
    TraktApiFilter::Query,
    TraktApiFilter::Years,
    TraktApiFilter::Genres,
    TraktApiFilter::Languages,
    TraktApiFilter::Countries,
    TraktApiFilter::Runtimes,
    TraktApiFilter::StudioIds,
    TraktApiFilter::Certifications,
    TraktApiFilter::Networks,
    TraktApiFilter::NetworkIds,
    TraktApiFilter::Status,
    TraktApiFilter::Ratings,
    TraktApiFilter::Votes,
    TraktApiFilter::TmdbRatings,
    TraktApiFilter::TmdbVotes,
    TraktApiFilter::ImdbRatings,
    TraktApiFilter::ImdbVotes,
];

/// Accepted values of the `status` filter.
pub const SHOW_STATUSES: &[&str] = &[
    "returning series",
    "continuing",
    "in production",
    "planned",
    "upcoming",
    "pilot",
    "canceled",
    "ended",
];

static YEARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-\d{4})?$").expect("valid years pattern"));

impl TraktApiFilter {
    /// Every known filter.
    pub const ALL: &'static [TraktApiFilter] = &[
        Self::Query,
        Self::Years,
        Self::Genres,
        Self::Languages,
        Self::Countries,
        Self::Runtimes,
        Self::StudioIds,
        Self::Certifications,
        Self::Networks,
        Self::NetworkIds,
        Self::Status,
        Self::Ratings,
        Self::Votes,
        Self::TmdbRatings,
        Self::TmdbVotes,
        Self::ImdbRatings,
        Self::ImdbVotes,
        Self::RtMeters,
        Self::RtUserMeters,
        Self::Metascores,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Years => "years",
            Self::Genres => "genres",
            Self::Languages => "languages",
            Self::Countries => "countries",
            Self::Runtimes => "runtimes",
            Self::StudioIds => "studio_ids",
            Self::Certifications => "certifications",
            Self::Networks => "networks",
            Self::NetworkIds => "network_ids",
            Self::Status => "status",
            Self::Ratings => "ratings",
            Self::Votes => "votes",
            Self::TmdbRatings => "tmdb_ratings",
            Self::TmdbVotes => "tmdb_votes",
            Self::ImdbRatings => "imdb_ratings",
            Self::ImdbVotes => "imdb_votes",
            Self::RtMeters => "rt_meters",
            Self::RtUserMeters => "rt_user_meters",
            Self::Metascores => "metascores",
        }
    }

    /// Looks up a filter by its query-string name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }

    /// Whether the filter accepts a list of values.
    pub fn is_multi_valued(&self) -> bool {
        matches!(
            self,
            Self::Genres
                | Self::Languages
                | Self::Countries
                | Self::StudioIds
                | Self::Certifications
                | Self::Networks
                | Self::NetworkIds
                | Self::Status
        )
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Query => is_text(value),
            Self::Years => match value {
                Value::Number(n) => n.is_u64(),
                Value::String(s) => YEARS.is_match(s),
                _ => false,
            },
            Self::Genres
            | Self::Languages
            | Self::Countries
            | Self::Certifications
            | Self::Networks => is_text(value),
            Self::StudioIds | Self::NetworkIds => match value {
                Value::Number(n) => n.is_u64(),
                Value::String(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
                _ => false,
            },
            Self::Status => value
                .as_str()
                .is_some_and(|s| SHOW_STATUSES.contains(&s.to_lowercase().as_str())),
            Self::Runtimes => in_range(value, 0.0, f64::MAX, true),
            Self::Ratings | Self::RtMeters | Self::RtUserMeters | Self::Metascores => {
                in_range(value, 0.0, 100.0, true)
            }
            Self::Votes | Self::TmdbVotes => in_range(value, 0.0, 100_000.0, true),
            Self::ImdbVotes => in_range(value, 0.0, 3_000_000.0, true),
            Self::TmdbRatings | Self::ImdbRatings => in_range(value, 0.0, 10.0, false),
        }
    }
}

impl fmt::Display for TraktApiFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_text(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Accepts a number or a `min-max` / single-value string within `[min, max]`.
fn in_range(value: &Value, min: f64, max: f64, integer: bool) -> bool {
    let parse = |s: &str| -> Option<f64> {
        let s = s.trim();
        if integer {
            s.parse::<u64>().ok().map(|n| n as f64)
        } else {
            s.parse::<f64>().ok()
        }
    };

    let bounds = match value {
        Value::Number(n) => {
            if integer && !n.is_u64() {
                return false;
            }
            n.as_f64().map(|v| (v, v))
        }
        Value::String(s) => match s.split_once('-') {
            Some((lo, hi)) => parse(lo).zip(parse(hi)),
            None => parse(s).map(|v| (v, v)),
        },
        _ => None,
    };

    matches!(bounds, Some((lo, hi)) if lo >= min && hi <= max && lo <= hi)
}

/// Validates filter values against the per-filter rules.
pub struct TraktApiFilterValidator;

impl TraktApiFilterValidator {
    /// Returns `Ok(false)` when the value breaks the filter's rule.
    ///
    /// An array given to a single-valued filter, or when `allow_array` is false,
    /// is a validation error.
    pub fn validate(filter: TraktApiFilter, value: &Value, allow_array: bool) -> TraktResult<bool> {
        match value {
            Value::Array(values) => {
                if !allow_array || !filter.is_multi_valued() {
                    return Err(TraktError::validation(format!(
                        "Filter '{filter}' doesn't support multiple values."
                    )));
                }
                Ok(!values.is_empty() && values.iter().all(|v| filter.accepts(v)))
            }
            Value::String(s) if filter.is_multi_valued() && s.contains(',') => {
                Ok(s.split(',').all(|part| {
                    filter.accepts(&Value::String(part.trim().to_string()))
                }))
            }
            _ => Ok(filter.accepts(value)),
        }
    }
}
