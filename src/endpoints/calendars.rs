//! Calendar endpoints.
//!
//! `start_date` defaults to today and `days` to 7 (33 at most). The `my`
//! calendars are user specific and need a token.

use crate::core::HttpMethod;
use crate::filters::COMMON_FILTERS;
use crate::template::validators::{transform_start_date_short, validate_start_date_short};
use crate::template::{
    ApiTemplate, AuthRequirement, Param, Parameters, TemplateOptions, TraktApiExtended,
};

const OPTS: TemplateOptions = TemplateOptions {
    auth: AuthRequirement::None,
    pagination: false,
    extended: &[TraktApiExtended::Full],
    filters: COMMON_FILTERS,
    parameters: Parameters {
        path: &[Param::optional("start_date"), Param::optional("days")],
        query: &[],
    },
};

const MY_OPTS: TemplateOptions = TemplateOptions {
    auth: AuthRequirement::Required,
    ..OPTS
};

const fn calendar(url: &'static str, opts: TemplateOptions) -> ApiTemplate {
    ApiTemplate {
        method: HttpMethod::Get,
        url,
        opts,
        body: &[],
        validate: Some(validate_start_date_short),
        transform: Some(transform_start_date_short),
    }
}

pub static MY_SHOWS: ApiTemplate = calendar("/calendars/my/shows/:start_date/:days", MY_OPTS);
pub static MY_NEW_SHOWS: ApiTemplate =
    calendar("/calendars/my/shows/new/:start_date/:days", MY_OPTS);
pub static MY_SEASON_PREMIERES: ApiTemplate =
    calendar("/calendars/my/shows/premieres/:start_date/:days", MY_OPTS);
pub static MY_FINALES: ApiTemplate =
    calendar("/calendars/my/shows/finales/:start_date/:days", MY_OPTS);
pub static MY_MOVIES: ApiTemplate = calendar("/calendars/my/movies/:start_date/:days", MY_OPTS);
pub static MY_DVD: ApiTemplate = calendar("/calendars/my/dvd/:start_date/:days", MY_OPTS);

pub static ALL_SHOWS: ApiTemplate = calendar("/calendars/all/shows/:start_date/:days", OPTS);
pub static ALL_NEW_SHOWS: ApiTemplate =
    calendar("/calendars/all/shows/new/:start_date/:days", OPTS);
pub static ALL_SEASON_PREMIERES: ApiTemplate =
    calendar("/calendars/all/shows/premieres/:start_date/:days", OPTS);
pub static ALL_FINALES: ApiTemplate = calendar("/calendars/all/finales/:start_date/:days", OPTS);
pub static ALL_MOVIES: ApiTemplate = calendar("/calendars/all/movies/:start_date/:days", OPTS);
pub static ALL_DVD: ApiTemplate = calendar("/calendars/all/dvd/:start_date/:days", OPTS);

pub(super) static ENDPOINTS: &[(&str, &ApiTemplate)] = &[
    ("calendars.my.shows.get", &MY_SHOWS),
    ("calendars.my.shows.new", &MY_NEW_SHOWS),
    ("calendars.my.shows.premieres", &MY_SEASON_PREMIERES),
    ("calendars.my.shows.finales", &MY_FINALES),
    ("calendars.my.movies", &MY_MOVIES),
    ("calendars.my.dvd", &MY_DVD),
    ("calendars.all.shows.get", &ALL_SHOWS),
    ("calendars.all.shows.new", &ALL_NEW_SHOWS),
    ("calendars.all.shows.premieres", &ALL_SEASON_PREMIERES),
    ("calendars.all.shows.finales", &ALL_FINALES),
    ("calendars.all.movies", &ALL_MOVIES),
    ("calendars.all.dvd", &ALL_DVD),
];
