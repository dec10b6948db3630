//! Response Types
//!
//! Serde shapes of the bodies returned by the registered endpoints. Fields only
//! present in extended responses are optional.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Identifiers across providers. Only `trakt` is always present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktIds {
    pub trakt: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktMovie {
    pub title: String,
    pub year: Option<u32>,
    pub ids: TraktIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktShow {
    pub title: String,
    pub year: Option<u32>,
    pub ids: TraktIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_aired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub votes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aired_episodes: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktEpisode {
    pub season: u32,
    pub number: u32,
    pub title: Option<String>,
    pub ids: TraktIds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_abs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_aired: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_type: Option<String>,
}

/// Genre, by slug.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktGenre {
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktCertification {
    pub name: String,
    pub slug: String,
    pub description: String,
}

/// Countries and languages share the `{name, code}` shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktCountry {
    pub name: String,
    pub code: String,
}

pub type TraktLanguage = TraktCountry;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktNetworkIds {
    pub trakt: u64,
    pub tmdb: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktNetwork {
    pub name: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,
    pub ids: TraktNetworkIds,
}

/// Certifications are grouped by country code.
pub type TraktCertifications = HashMap<String, Vec<TraktCertification>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktCalendarShow {
    pub first_aired: String,
    pub episode: TraktEpisode,
    pub show: TraktShow,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktCalendarMovie {
    /// `YYYY-MM-DD`
    pub released: String,
    pub movie: TraktMovie,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktTrendingMovie {
    pub watchers: u64,
    pub movie: TraktMovie,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktTrendingShow {
    pub watchers: u64,
    pub show: TraktShow,
}

/// Result kind of a search hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraktSearchType {
    Movie,
    Show,
    Episode,
    Person,
    List,
}

/// One search hit. The populated entity fields depend on `type`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktSearchResult {
    #[serde(rename = "type")]
    pub kind: TraktSearchType,
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<TraktMovie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<TraktShow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<TraktEpisode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Value>,
}

/// Timestamps of the latest change per activity, keyed by field name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktLastActivities {
    pub all: String,
    #[serde(default)]
    pub movies: HashMap<String, String>,
    #[serde(default)]
    pub episodes: HashMap<String, String>,
    #[serde(default)]
    pub shows: HashMap<String, String>,
    #[serde(default)]
    pub seasons: HashMap<String, String>,
    /// Sections not modelled above.
    #[serde(flatten)]
    pub other: HashMap<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktHistoryItem {
    pub id: u64,
    pub watched_at: String,
    pub action: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<TraktMovie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<TraktShow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<TraktEpisode>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktUserIds {
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraktUser {
    pub username: String,
    pub private: bool,
    pub name: Option<String>,
    pub vip: Option<bool>,
    pub vip_ep: Option<bool>,
    pub ids: TraktUserIds,
}

/// Body of `/users/settings`. Sections other than `user` are kept raw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktUserSettings {
    pub user: TraktUser,
    #[serde(default)]
    pub account: Value,
    #[serde(default)]
    pub connections: Value,
    #[serde(default)]
    pub sharing_text: Value,
    #[serde(default)]
    pub limits: Value,
}

/// Body of a successful check-in or scrobble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraktCheckinResponse {
    pub id: u64,
    pub action: Option<String>,
    pub watched_at: Option<String>,
    pub progress: Option<f64>,
    #[serde(default)]
    pub sharing: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<TraktMovie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show: Option<TraktShow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<TraktEpisode>,
}
