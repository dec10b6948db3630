//! Parameter Templates
//!
//! Declarative per-operation configuration and the call parameters matched
//! against it.

mod builder;
pub mod validators;

pub use builder::{build_request, BuiltRequest};

use serde_json::{Map, Value};
use std::fmt;

use crate::core::HttpMethod;
use crate::error::TraktResult;
use crate::filters::TraktApiFilter;

/// Whether an operation needs a bearer token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthRequirement {
    #[default]
    None,
    /// Token is attached when present, and must then be unexpired.
    Optional,
    Required,
}

impl AuthRequirement {
    pub fn is_requested(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// A declared path, query, or body parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            required: true,
        }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            required: false,
        }
    }
}

/// Declared path and query parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Parameters {
    pub path: &'static [Param],
    pub query: &'static [Param],
}

impl Parameters {
    pub const NONE: Parameters = Parameters {
        path: &[],
        query: &[],
    };
}

/// Response shape variants the API can return.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TraktApiExtended {
    Full,
    Metadata,
    Episodes,
    NoSeasons,
    GuestStars,
    Vip,
    Images,
    Comments,
}

impl TraktApiExtended {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Metadata => "metadata",
            Self::Episodes => "episodes",
            Self::NoSeasons => "noseasons",
            Self::GuestStars => "guest_stars",
            Self::Vip => "vip",
            Self::Images => "images",
            Self::Comments => "comments",
        }
    }
}

impl fmt::Display for TraktApiExtended {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TraktApiExtended> for String {
    fn from(value: TraktApiExtended) -> Self {
        value.as_str().to_string()
    }
}

/// Template options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TemplateOptions {
    pub auth: AuthRequirement,
    pub pagination: bool,
    pub extended: &'static [TraktApiExtended],
    pub filters: &'static [TraktApiFilter],
    pub parameters: Parameters,
}

impl TemplateOptions {
    pub const NONE: TemplateOptions = TemplateOptions {
        auth: AuthRequirement::None,
        pagination: false,
        extended: &[],
        filters: &[],
        parameters: Parameters::NONE,
    };
}

/// Hook run before URL construction; may reject the parameters.
pub type ValidateHook = fn(&RequestParams) -> TraktResult<()>;

/// Hook normalizing parameter values before URL construction.
pub type TransformHook = fn(RequestParams) -> RequestParams;

/// Immutable configuration for one API operation.
#[derive(Clone, Copy, Debug)]
pub struct ApiTemplate {
    pub method: HttpMethod,
    /// URL pattern relative to the endpoint, with `:name` placeholders.
    pub url: &'static str,
    pub opts: TemplateOptions,
    pub body: &'static [Param],
    pub validate: Option<ValidateHook>,
    pub transform: Option<TransformHook>,
}

impl ApiTemplate {
    /// Template with no options, body or hooks.
    pub const fn new(method: HttpMethod, url: &'static str) -> Self {
        Self {
            method,
            url,
            opts: TemplateOptions::NONE,
            body: &[],
            validate: None,
            transform: None,
        }
    }

    /// Path portion of the URL pattern.
    pub fn path(&self) -> &'static str {
        match self.url.split_once('?') {
            Some((path, _)) => path,
            None => self.url,
        }
    }
}

/// Requested page and page size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Parameters for one call: a flat value bag plus filters, pagination and extended modes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestParams {
    pub values: Map<String, Value>,
    /// Filters in insertion order.
    pub filters: Vec<(String, Value)>,
    pub pagination: Option<Pagination>,
    pub extended: Option<Vec<String>>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a path, query or body value.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn filter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination.get_or_insert_with(Pagination::default).limit = Some(limit);
        self
    }

    /// Adds a requested extended mode.
    pub fn extended(mut self, mode: impl Into<String>) -> Self {
        self.extended.get_or_insert_with(Vec::new).push(mode.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Value rendered as a query/path string; empty strings, nulls and empty arrays are absent.
    pub fn string_value(&self, name: &str) -> Option<String> {
        self.values.get(name).and_then(value_to_string)
    }
}

/// Renders a parameter value for a URL, joining arrays with commas.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(values) => {
            let parts: Vec<String> = values.iter().filter_map(value_to_string).collect();
            (!parts.is_empty()).then(|| parts.join(","))
        }
        Value::Object(_) => Some(value.to_string()),
    }
}
