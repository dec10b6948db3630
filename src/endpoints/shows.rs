use crate::core::HttpMethod;
use crate::filters::SHOW_FILTERS;
use crate::template::{
    ApiTemplate, Param, Parameters, TemplateOptions, TraktApiExtended,
};

const LISTING: TemplateOptions = TemplateOptions {
    pagination: true,
    extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
    filters: SHOW_FILTERS,
    ..TemplateOptions::NONE
};

/// `GET /shows/trending`
pub static TRENDING: ApiTemplate = ApiTemplate {
    opts: LISTING,
    ..ApiTemplate::new(HttpMethod::Get, "/shows/trending")
};

/// `GET /shows/popular`
pub static POPULAR: ApiTemplate = ApiTemplate {
    opts: LISTING,
    ..ApiTemplate::new(HttpMethod::Get, "/shows/popular")
};

/// `GET /shows/:id`
pub static SUMMARY: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
        parameters: Parameters {
            path: &[Param::required("id")],
            query: &[],
        },
        ..TemplateOptions::NONE
    },
    ..ApiTemplate::new(HttpMethod::Get, "/shows/:id")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("shows.trending", &TRENDING),
    ("shows.popular", &POPULAR),
    ("shows.summary", &SUMMARY),
];
