//! Reference-data endpoints: certifications, countries, genres, languages and networks.

use crate::core::HttpMethod;
use crate::template::{ApiTemplate, Param, Parameters, TemplateOptions};

const BY_TYPE: TemplateOptions = TemplateOptions {
    parameters: Parameters {
        path: &[Param::required("type")],
        query: &[],
    },
    ..TemplateOptions::NONE
};

/// `GET /certifications/:type` (`movies` or `shows`).
pub static CERTIFICATIONS: ApiTemplate = ApiTemplate {
    opts: BY_TYPE,
    ..ApiTemplate::new(HttpMethod::Get, "/certifications/:type")
};

pub static COUNTRIES: ApiTemplate = ApiTemplate {
    opts: BY_TYPE,
    ..ApiTemplate::new(HttpMethod::Get, "/countries/:type")
};

pub static GENRES: ApiTemplate = ApiTemplate {
    opts: BY_TYPE,
    ..ApiTemplate::new(HttpMethod::Get, "/genres/:type")
};

pub static LANGUAGES: ApiTemplate = ApiTemplate {
    opts: BY_TYPE,
    ..ApiTemplate::new(HttpMethod::Get, "/languages/:type")
};

/// `GET /networks`, optionally paginated.
pub static NETWORKS: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        pagination: true,
        ..TemplateOptions::NONE
    },
    ..ApiTemplate::new(HttpMethod::Get, "/networks")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("certifications", &CERTIFICATIONS),
    ("countries", &COUNTRIES),
    ("genres", &GENRES),
    ("languages", &LANGUAGES),
    ("networks", &NETWORKS),
];
