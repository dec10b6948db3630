use crate::core::HttpMethod;
use crate::filters::MOVIE_FILTERS;
use crate::template::{
    ApiTemplate, Param, Parameters, TemplateOptions, TraktApiExtended,
};

const LISTING: TemplateOptions = TemplateOptions {
    pagination: true,
    extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
    filters: MOVIE_FILTERS,
    ..TemplateOptions::NONE
};

/// `GET /movies/trending`
pub static TRENDING: ApiTemplate = ApiTemplate {
    opts: LISTING,
    ..ApiTemplate::new(HttpMethod::Get, "/movies/trending")
};

/// `GET /movies/popular`
pub static POPULAR: ApiTemplate = ApiTemplate {
    opts: LISTING,
    ..ApiTemplate::new(HttpMethod::Get, "/movies/popular")
};

/// `GET /movies/:id` by Trakt id, slug or IMDB id.
pub static SUMMARY: ApiTemplate = ApiTemplate {
    opts: TemplateOptions {
        extended: &[TraktApiExtended::Full, TraktApiExtended::Images],
        parameters: Parameters {
            path: &[Param::required("id")],
            query: &[],
        },
        ..TemplateOptions::NONE
    },
    ..ApiTemplate::new(HttpMethod::Get, "/movies/:id")
};

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("movies.trending", &TRENDING),
    ("movies.popular", &POPULAR),
    ("movies.summary", &SUMMARY),
];
